//! Time-value-of-money formulas.
//!
//! Every rate here is a decimal (0.12 for 12%). Inputs are validated before
//! any arithmetic and every result is checked for finiteness, so callers get
//! either a usable number or a [`ProjectionError`]. Nothing is rounded.

use super::error::ProjectionError;
use super::validate;

const MONTHS_PER_YEAR: u32 = 12;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Compounding {
    Annual,
    Monthly,
}

impl Compounding {
    fn periodic(self, annual_rate: f64, years: u32) -> (f64, u32) {
        match self {
            Compounding::Annual => (annual_rate, years),
            Compounding::Monthly => (
                annual_rate / f64::from(MONTHS_PER_YEAR),
                years.saturating_mul(MONTHS_PER_YEAR),
            ),
        }
    }
}

pub fn monthly_rate(annual_rate: f64) -> f64 {
    annual_rate / f64::from(MONTHS_PER_YEAR)
}

pub fn months_in(years: u32) -> u32 {
    years.saturating_mul(MONTHS_PER_YEAR)
}

/// `(1 + rate)^periods`, rejecting overflow.
fn growth_factor(step: &'static str, rate: f64, periods: u32) -> Result<f64, ProjectionError> {
    let periods = i32::try_from(periods).map_err(|_| ProjectionError::NumericOverflow { step })?;
    validate::finite(step, (1.0 + rate).powi(periods))
}

pub fn future_value_of_lump_sum(
    principal: f64,
    annual_rate: f64,
    years: u32,
    compounding: Compounding,
) -> Result<f64, ProjectionError> {
    let principal = validate::amount("principal", principal)?;
    let annual_rate = validate::decimal_rate("annualRate", annual_rate)?;
    if annual_rate == 0.0 {
        return Ok(principal);
    }

    let (rate, periods) = compounding.periodic(annual_rate, years);
    let factor = growth_factor("lump sum growth", rate, periods)?;
    validate::monetary("lump sum future value", principal * factor)
}

/// Annuity-due: each contribution lands at the start of its month.
pub fn future_value_of_annuity(
    monthly_contribution: f64,
    monthly_rate: f64,
    months: u32,
) -> Result<f64, ProjectionError> {
    let contribution = validate::amount("monthlyContribution", monthly_contribution)?;
    let rate = validate::decimal_rate("monthlyRate", monthly_rate)?;
    if rate == 0.0 {
        return Ok(contribution * f64::from(months));
    }

    let factor = growth_factor("annuity growth", rate, months)?;
    validate::monetary(
        "annuity future value",
        contribution * ((factor - 1.0) / rate) * (1.0 + rate),
    )
}

/// Monthly contribution whose annuity-due future value equals `target`.
pub fn required_annuity_contribution(
    target_future_value: f64,
    monthly_rate: f64,
    months: u32,
) -> Result<f64, ProjectionError> {
    let target = validate::amount("targetFutureValue", target_future_value)?;
    let rate = validate::decimal_rate("monthlyRate", monthly_rate)?;
    let months = validate::months("months", months)?;
    if rate == 0.0 {
        return Ok(target / f64::from(months));
    }

    let factor = growth_factor("annuity growth", rate, months)?;
    let annuity_factor = validate::finite("annuity factor", ((factor - 1.0) / rate) * (1.0 + rate))?;
    if annuity_factor <= 0.0 {
        return Err(ProjectionError::NumericOverflow {
            step: "annuity factor",
        });
    }
    validate::monetary("required contribution", target / annuity_factor)
}

pub fn inflation_adjusted_target(
    nominal_amount: f64,
    annual_inflation_rate: f64,
    years: u32,
) -> Result<f64, ProjectionError> {
    let amount = validate::amount("nominalAmount", nominal_amount)?;
    let inflation = validate::decimal_rate("annualInflationRate", annual_inflation_rate)?;
    if inflation == 0.0 {
        return Ok(amount);
    }

    let factor = growth_factor("inflation growth", inflation, years)?;
    validate::monetary("inflation adjusted target", amount * factor)
}

/// Today's purchasing power of an amount received `years` from now.
pub fn real_value(
    future_amount: f64,
    annual_inflation_rate: f64,
    years: u32,
) -> Result<f64, ProjectionError> {
    let amount = validate::amount("futureAmount", future_amount)?;
    let inflation = validate::decimal_rate("annualInflationRate", annual_inflation_rate)?;
    if inflation == 0.0 {
        return Ok(amount);
    }

    let factor = growth_factor("inflation growth", inflation, years)?;
    validate::monetary("real value", amount / factor)
}

/// Ordinary annuity: each withdrawal lands at the end of its month.
pub fn present_value_of_annuity(
    monthly_withdrawal: f64,
    monthly_rate: f64,
    months: u32,
) -> Result<f64, ProjectionError> {
    let withdrawal = validate::amount("monthlyWithdrawal", monthly_withdrawal)?;
    let rate = validate::decimal_rate("monthlyRate", monthly_rate)?;
    if rate == 0.0 {
        return Ok(withdrawal * f64::from(months));
    }

    let factor = growth_factor("discount growth", rate, months)?;
    validate::monetary(
        "annuity present value",
        withdrawal * (1.0 - factor.recip()) / rate,
    )
}
