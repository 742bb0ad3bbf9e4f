use thiserror::Error;

/// Everything the projection engine can reject.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// An amount, rate, horizon or age outside its valid domain.
    #[error("invalid {field}: {reason}")]
    InvalidDomainInput { field: &'static str, reason: String },

    /// A step produced NaN or infinity.
    #[error("numeric overflow while computing {step}")]
    NumericOverflow { step: &'static str },
}

impl ProjectionError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidDomainInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::NumericOverflow { .. })
    }
}
