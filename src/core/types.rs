use serde::Serialize;

use super::error::ProjectionError;
use super::validate;

/// What the caller already knows about the cash flow.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Plan {
    MonthlyContribution(f64),
    TargetAmount(f64),
    /// Today's monthly spending that retirement has to fund.
    MonthlyExpense(f64),
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct AgeSpan {
    pub start: u32,
    pub end: u32,
}

/// One calculation request. Rates are percentages (12.0 = 12%).
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionInput {
    pub principal: f64,
    pub plan: Plan,
    pub annual_return_rate: f64,
    pub annual_inflation_rate: f64,
    pub horizon_years: i64,
    pub ages: Option<AgeSpan>,
}

impl ProjectionInput {
    pub fn sip(monthly_contribution: f64, annual_return_rate: f64, years: i64) -> Self {
        Self {
            principal: 0.0,
            plan: Plan::MonthlyContribution(monthly_contribution),
            annual_return_rate,
            annual_inflation_rate: 0.0,
            horizon_years: years,
            ages: None,
        }
    }

    pub fn goal(
        current_amount: f64,
        target_amount: f64,
        years: i64,
        inflation_rate: f64,
        expected_return: f64,
    ) -> Self {
        Self {
            principal: current_amount,
            plan: Plan::TargetAmount(target_amount),
            annual_return_rate: expected_return,
            annual_inflation_rate: inflation_rate,
            horizon_years: years,
            ages: None,
        }
    }

    /// Horizon runs from `current_age` to `retirement_age`; rates come from
    /// the assumptions. Current savings go in through [`Self::with_principal`].
    pub fn retirement(
        current_age: u32,
        retirement_age: u32,
        current_monthly_expense: f64,
        assumptions: &RetirementAssumptions,
    ) -> Self {
        Self {
            principal: 0.0,
            plan: Plan::MonthlyExpense(current_monthly_expense),
            annual_return_rate: assumptions.pre_retirement_return,
            annual_inflation_rate: assumptions.inflation_rate,
            horizon_years: i64::from(retirement_age) - i64::from(current_age),
            ages: Some(AgeSpan {
                start: current_age,
                end: retirement_age,
            }),
        }
    }

    pub fn with_principal(mut self, principal: f64) -> Self {
        self.principal = principal;
        self
    }

    pub fn with_inflation(mut self, annual_inflation_rate: f64) -> Self {
        self.annual_inflation_rate = annual_inflation_rate;
        self
    }

    /// Checks the fields shared by every scenario and returns the horizon
    /// in whole years.
    pub(crate) fn validated_horizon(&self) -> Result<u32, ProjectionError> {
        validate::amount("principal", self.principal)?;
        validate::percent_rate("annualReturnRate", self.annual_return_rate)?;
        validate::percent_rate("annualInflationRate", self.annual_inflation_rate)?;

        if let Some(ages) = self.ages {
            validate::age("horizonStartAge", ages.start)?;
            validate::age("horizonEndAge", ages.end)?;
            let span = validate::age_order(
                "horizonEndAge",
                ages.start,
                ages.end,
                "horizon end age must be greater than start age",
            )?;
            if i64::from(span) != self.horizon_years {
                return Err(ProjectionError::invalid(
                    "horizonYears",
                    "must equal horizon end age minus start age",
                ));
            }
        }

        validate::horizon_years("horizonYears", self.horizon_years)
    }
}

/// Unrounded projection output shared by every scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub future_value: f64,
    pub required_monthly_contribution: f64,
    pub total_contributed: f64,
    pub total_growth: f64,
}

impl ProjectionResult {
    /// Growth is floored at zero; every other field must already be a valid
    /// monetary amount.
    pub(crate) fn new(
        future_value: f64,
        required_monthly_contribution: f64,
        total_contributed: f64,
    ) -> Result<Self, ProjectionError> {
        let future_value = validate::monetary("future value", future_value)?;
        let required_monthly_contribution =
            validate::monetary("monthly contribution", required_monthly_contribution)?;
        let total_contributed = validate::monetary("total contributed", total_contributed)?;
        Ok(Self {
            future_value,
            required_monthly_contribution,
            total_contributed,
            total_growth: (future_value - total_contributed).max(0.0),
        })
    }

    pub fn rounded(&self) -> Self {
        Self {
            future_value: round_currency(self.future_value),
            required_monthly_contribution: round_currency(self.required_monthly_contribution),
            total_contributed: round_currency(self.total_contributed),
            total_growth: round_currency(self.total_growth),
        }
    }
}

/// Nearest whole currency unit. Only applied when presenting results.
pub fn round_currency(value: f64) -> f64 {
    value.round()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SipProjection {
    pub total_investment: f64,
    pub estimated_returns: f64,
    pub total_value: f64,
    /// `total_value` in today's money; equals it when inflation is zero.
    pub inflation_adjusted_value: f64,
    #[serde(skip)]
    pub projection: ProjectionResult,
}

impl SipProjection {
    pub fn rounded(&self) -> Self {
        Self {
            total_investment: round_currency(self.total_investment),
            estimated_returns: round_currency(self.estimated_returns),
            total_value: round_currency(self.total_value),
            inflation_adjusted_value: round_currency(self.inflation_adjusted_value),
            projection: self.projection.rounded(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementPlan {
    pub years_to_retirement: u32,
    pub years_in_retirement: u32,
    pub future_monthly_expense: f64,
    pub corpus_required: f64,
    /// Current savings grown at the pre-retirement return.
    pub savings_at_retirement: f64,
    pub monthly_sip: f64,
    #[serde(flatten)]
    pub projection: ProjectionResult,
}

impl RetirementPlan {
    pub fn rounded(&self) -> Self {
        Self {
            future_monthly_expense: round_currency(self.future_monthly_expense),
            corpus_required: round_currency(self.corpus_required),
            savings_at_retirement: round_currency(self.savings_at_retirement),
            monthly_sip: round_currency(self.monthly_sip),
            projection: self.projection.rounded(),
            ..*self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPlan {
    pub inflation_adjusted_target: f64,
    pub monthly_sip: f64,
    pub goal_met: bool,
    /// Share of the inflation-adjusted target already saved, 0 to 100.
    pub progress_percent: f64,
    #[serde(flatten)]
    pub projection: ProjectionResult,
}

impl GoalPlan {
    pub fn rounded(&self) -> Self {
        Self {
            inflation_adjusted_target: round_currency(self.inflation_adjusted_target),
            monthly_sip: round_currency(self.monthly_sip),
            progress_percent: self.progress_percent.round(),
            projection: self.projection.rounded(),
            ..*self
        }
    }
}

/// Whatever scenario [`super::project`] dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "scenario", rename_all = "camelCase")]
pub enum ScenarioReport {
    Sip(SipProjection),
    Retirement(RetirementPlan),
    Goal(GoalPlan),
}

impl ScenarioReport {
    pub fn projection(&self) -> &ProjectionResult {
        match self {
            ScenarioReport::Sip(report) => &report.projection,
            ScenarioReport::Retirement(report) => &report.projection,
            ScenarioReport::Goal(report) => &report.projection,
        }
    }
}

/// Fixed planning assumptions for retirement; rates are percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetirementAssumptions {
    pub inflation_rate: f64,
    pub pre_retirement_return: f64,
    pub post_retirement_return: f64,
    pub life_expectancy: u32,
}

impl Default for RetirementAssumptions {
    fn default() -> Self {
        Self {
            inflation_rate: 6.0,
            pre_retirement_return: 12.0,
            post_retirement_return: 8.0,
            life_expectancy: 85,
        }
    }
}

impl RetirementAssumptions {
    pub fn validate(&self) -> Result<(), ProjectionError> {
        validate::percent_rate("inflationRate", self.inflation_rate)?;
        validate::percent_rate("preRetirementReturn", self.pre_retirement_return)?;
        validate::percent_rate("postRetirementReturn", self.post_retirement_return)?;
        validate::age("lifeExpectancy", self.life_expectancy)?;
        Ok(())
    }
}
