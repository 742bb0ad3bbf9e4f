//! Aggregation of brokerage holdings into the dashboard summary.
//!
//! Holdings are supplied by the caller; prices are whatever the caller last
//! observed.

use serde::{Deserialize, Serialize};

use super::error::ProjectionError;
use super::types::round_currency;
use super::validate;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub quantity: f64,
    pub average_price: f64,
    pub last_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub symbol: String,
    pub invested: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    pub profit_loss_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_investment: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    pub profit_loss_percentage: f64,
    pub holdings: Vec<HoldingValuation>,
}

fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

pub fn value_holding(holding: &Holding) -> Result<HoldingValuation, ProjectionError> {
    let quantity = validate::amount("quantity", holding.quantity)?;
    let average_price = validate::amount("averagePrice", holding.average_price)?;
    let last_price = validate::amount("lastPrice", holding.last_price)?;

    let invested = validate::finite("holding investment", quantity * average_price)?;
    let current_value = validate::finite("holding value", quantity * last_price)?;
    let profit_loss = current_value - invested;

    Ok(HoldingValuation {
        symbol: holding.symbol.clone(),
        invested,
        current_value,
        profit_loss,
        profit_loss_percentage: percentage_of(profit_loss, invested),
    })
}

pub fn summarize(holdings: &[Holding]) -> Result<PortfolioSummary, ProjectionError> {
    let holdings = holdings
        .iter()
        .map(value_holding)
        .collect::<Result<Vec<_>, _>>()?;

    let total_investment =
        validate::finite("total investment", holdings.iter().map(|h| h.invested).sum())?;
    let current_value =
        validate::finite("current value", holdings.iter().map(|h| h.current_value).sum())?;
    let profit_loss = current_value - total_investment;

    Ok(PortfolioSummary {
        total_investment,
        current_value,
        profit_loss,
        profit_loss_percentage: percentage_of(profit_loss, total_investment),
        holdings,
    })
}

impl PortfolioSummary {
    /// Money rounded to whole units, percentages to two decimals.
    pub fn rounded(&self) -> Self {
        let pct = |v: f64| (v * 100.0).round() / 100.0;
        Self {
            total_investment: round_currency(self.total_investment),
            current_value: round_currency(self.current_value),
            profit_loss: round_currency(self.profit_loss),
            profit_loss_percentage: pct(self.profit_loss_percentage),
            holdings: self
                .holdings
                .iter()
                .map(|h| HoldingValuation {
                    symbol: h.symbol.clone(),
                    invested: round_currency(h.invested),
                    current_value: round_currency(h.current_value),
                    profit_loss: round_currency(h.profit_loss),
                    profit_loss_percentage: pct(h.profit_loss_percentage),
                })
                .collect(),
        }
    }
}
