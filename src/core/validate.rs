use super::error::ProjectionError;

pub const MAX_RATE_PERCENT: f64 = 100.0;
pub const MAX_HORIZON_YEARS: u32 = 100;
pub const MAX_AGE: u32 = 120;

pub fn amount(field: &'static str, value: f64) -> Result<f64, ProjectionError> {
    if !value.is_finite() {
        return Err(ProjectionError::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ProjectionError::invalid(field, "must be >= 0"));
    }
    Ok(value)
}

/// Decimal rate (0.01 = 1%) as consumed by the formula library.
pub fn decimal_rate(field: &'static str, value: f64) -> Result<f64, ProjectionError> {
    if !value.is_finite() {
        return Err(ProjectionError::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ProjectionError::invalid(field, "must be >= 0"));
    }
    Ok(value)
}

/// Percentage rate (12 = 12%) as supplied by callers.
pub fn percent_rate(field: &'static str, value: f64) -> Result<f64, ProjectionError> {
    if !value.is_finite() {
        return Err(ProjectionError::invalid(field, "must be a finite number"));
    }
    if !(0.0..=MAX_RATE_PERCENT).contains(&value) {
        return Err(ProjectionError::invalid(
            field,
            format!("must be between 0 and {MAX_RATE_PERCENT}"),
        ));
    }
    Ok(value)
}

pub fn horizon_years(field: &'static str, years: i64) -> Result<u32, ProjectionError> {
    if years < 1 {
        return Err(ProjectionError::invalid(field, "must be >= 1 year"));
    }
    if years > i64::from(MAX_HORIZON_YEARS) {
        return Err(ProjectionError::invalid(
            field,
            format!("must be <= {MAX_HORIZON_YEARS} years"),
        ));
    }
    Ok(years as u32)
}

pub fn months(field: &'static str, months: u32) -> Result<u32, ProjectionError> {
    if months == 0 {
        return Err(ProjectionError::invalid(field, "must be > 0 months"));
    }
    Ok(months)
}

pub fn age(field: &'static str, age: u32) -> Result<u32, ProjectionError> {
    if age > MAX_AGE {
        return Err(ProjectionError::invalid(field, format!("must be <= {MAX_AGE}")));
    }
    Ok(age)
}

/// `later` must be strictly after `earlier`; returns the gap in years.
pub fn age_order(
    field: &'static str,
    earlier: u32,
    later: u32,
    reason: &str,
) -> Result<u32, ProjectionError> {
    if later <= earlier {
        return Err(ProjectionError::invalid(field, reason));
    }
    Ok(later - earlier)
}

pub fn finite(step: &'static str, value: f64) -> Result<f64, ProjectionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProjectionError::NumericOverflow { step })
    }
}

/// A finished monetary result: finite and non-negative.
pub fn monetary(step: &'static str, value: f64) -> Result<f64, ProjectionError> {
    let value = finite(step, value)?;
    if value < 0.0 {
        return Err(ProjectionError::NumericOverflow { step });
    }
    Ok(value)
}
