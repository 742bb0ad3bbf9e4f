mod error;
pub mod formulas;
mod goals;
mod portfolio;
mod scenarios;
mod types;
pub mod validate;

pub use error::ProjectionError;
pub use goals::{GoalKind, GoalProfile, resolve_target_and_years};
pub use portfolio::{Holding, HoldingValuation, PortfolioSummary, summarize};
pub use scenarios::{plan_goal, plan_retirement, project, project_sip};
pub use types::{
    AgeSpan, GoalPlan, Plan, ProjectionInput, ProjectionResult, RetirementAssumptions,
    RetirementPlan, ScenarioReport, SipProjection, round_currency,
};
