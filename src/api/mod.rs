use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::core::{
    GoalKind, GoalPlan, GoalProfile, Holding, Plan, PortfolioSummary, ProjectionError,
    ProjectionInput, RetirementAssumptions, RetirementPlan, SipProjection, plan_goal,
    plan_retirement, project_sip, resolve_target_and_years, summarize,
};

const DEFAULT_SIP_MONTHLY: f64 = 5_000.0;
const DEFAULT_SIP_YEARS: i64 = 10;
const DEFAULT_EXPECTED_RETURN: f64 = 12.0;
const DEFAULT_GOAL_INFLATION: f64 = 6.0;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub assumptions: RetirementAssumptions,
}

#[derive(Debug, Clone, Copy)]
struct AppState {
    assumptions: RetirementAssumptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SipPayload {
    #[serde(alias = "monthlyContribution")]
    monthly_investment: Option<f64>,
    years: Option<i64>,
    expected_return: Option<f64>,
    initial_investment: Option<f64>,
    inflation_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RetirementPayload {
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    #[serde(alias = "currentMonthlyExpense")]
    monthly_expense: Option<f64>,
    current_savings: Option<f64>,
    inflation_rate: Option<f64>,
    pre_retirement_return: Option<f64>,
    post_retirement_return: Option<f64>,
    life_expectancy: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GoalPayload {
    #[serde(alias = "type")]
    goal_type: Option<GoalKind>,
    current_amount: Option<f64>,
    target_amount: Option<f64>,
    years: Option<i64>,
    inflation_rate: Option<f64>,
    expected_return: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PortfolioPayload {
    holdings: Vec<Holding>,
}

#[derive(Debug)]
struct GoalRequest {
    goal_type: Option<GoalKind>,
    input: ProjectionInput,
}

#[derive(Debug)]
struct RetirementRequest {
    input: ProjectionInput,
    assumptions: RetirementAssumptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InputEcho {
    principal: f64,
    annual_return_rate: f64,
    annual_inflation_rate: f64,
    horizon_years: i64,
}

impl From<&ProjectionInput> for InputEcho {
    fn from(input: &ProjectionInput) -> Self {
        Self {
            principal: input.principal,
            annual_return_rate: input.annual_return_rate,
            annual_inflation_rate: input.annual_inflation_rate,
            horizon_years: input.horizon_years,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SipResponse {
    monthly_investment: f64,
    inputs: InputEcho,
    result: SipProjection,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetirementResponse {
    current_age: u32,
    retirement_age: u32,
    monthly_expense: f64,
    life_expectancy: u32,
    post_retirement_return: f64,
    inputs: InputEcho,
    result: RetirementPlan,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoalResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    goal: Option<GoalProfile>,
    target_amount: f64,
    inputs: InputEcho,
    result: GoalPlan,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn sip_request_from_payload(payload: SipPayload) -> ProjectionInput {
    ProjectionInput::sip(
        payload.monthly_investment.unwrap_or(DEFAULT_SIP_MONTHLY),
        payload.expected_return.unwrap_or(DEFAULT_EXPECTED_RETURN),
        payload.years.unwrap_or(DEFAULT_SIP_YEARS),
    )
    .with_principal(payload.initial_investment.unwrap_or(0.0))
    .with_inflation(payload.inflation_rate.unwrap_or(0.0))
}

fn retirement_request_from_payload(
    payload: RetirementPayload,
    defaults: RetirementAssumptions,
) -> Result<RetirementRequest, String> {
    let Some(current_age) = payload.current_age else {
        return Err("currentAge is required".to_string());
    };
    let Some(retirement_age) = payload.retirement_age else {
        return Err("retirementAge is required".to_string());
    };
    let Some(monthly_expense) = payload.monthly_expense else {
        return Err("monthlyExpense is required".to_string());
    };

    let mut assumptions = defaults;
    if let Some(v) = payload.inflation_rate {
        assumptions.inflation_rate = v;
    }
    if let Some(v) = payload.pre_retirement_return {
        assumptions.pre_retirement_return = v;
    }
    if let Some(v) = payload.post_retirement_return {
        assumptions.post_retirement_return = v;
    }
    if let Some(v) = payload.life_expectancy {
        assumptions.life_expectancy = v;
    }

    Ok(RetirementRequest {
        input: ProjectionInput::retirement(
            current_age,
            retirement_age,
            monthly_expense,
            &assumptions,
        )
        .with_principal(payload.current_savings.unwrap_or(0.0)),
        assumptions,
    })
}

fn goal_request_from_payload(payload: GoalPayload) -> GoalRequest {
    let (target, years) =
        resolve_target_and_years(payload.goal_type, payload.target_amount, payload.years);

    GoalRequest {
        goal_type: payload.goal_type,
        input: ProjectionInput::goal(
            payload.current_amount.unwrap_or(0.0),
            target,
            years,
            payload.inflation_rate.unwrap_or(DEFAULT_GOAL_INFLATION),
            payload.expected_return.unwrap_or(DEFAULT_EXPECTED_RETURN),
        ),
    }
}

fn projection_error_status(err: &ProjectionError) -> StatusCode {
    match err {
        ProjectionError::InvalidDomainInput { .. } => StatusCode::BAD_REQUEST,
        ProjectionError::NumericOverflow { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn build_sip_response(payload: SipPayload) -> Result<SipResponse, ProjectionError> {
    let input = sip_request_from_payload(payload);
    let result = project_sip(&input)?;
    Ok(SipResponse {
        monthly_investment: result.projection.required_monthly_contribution,
        inputs: InputEcho::from(&input),
        result: result.rounded(),
    })
}

fn build_retirement_response(
    request: RetirementRequest,
) -> Result<RetirementResponse, ProjectionError> {
    let result = plan_retirement(&request.input, &request.assumptions)?;
    let ages = request.input.ages.unwrap_or_default();
    let monthly_expense = match request.input.plan {
        Plan::MonthlyExpense(expense) => expense,
        _ => 0.0,
    };
    Ok(RetirementResponse {
        current_age: ages.start,
        retirement_age: ages.end,
        monthly_expense,
        life_expectancy: request.assumptions.life_expectancy,
        post_retirement_return: request.assumptions.post_retirement_return,
        inputs: InputEcho::from(&request.input),
        result: result.rounded(),
    })
}

fn build_goal_response(request: GoalRequest) -> Result<GoalResponse, ProjectionError> {
    let result = plan_goal(&request.input)?;
    let target_amount = match request.input.plan {
        Plan::TargetAmount(target) => target,
        _ => 0.0,
    };
    Ok(GoalResponse {
        goal: request.goal_type.map(GoalKind::profile),
        target_amount,
        inputs: InputEcho::from(&request.input),
        result: result.rounded(),
    })
}

pub fn router(assumptions: RetirementAssumptions) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/sip", get(sip_get_handler).post(sip_post_handler))
        .route(
            "/api/retirement",
            get(retirement_get_handler).post(retirement_post_handler),
        )
        .route("/api/goal", get(goal_get_handler).post(goal_post_handler))
        .route("/api/goals", get(goals_handler))
        .route("/api/portfolio/summary", post(portfolio_handler))
        .fallback(not_found_handler)
        .with_state(AppState { assumptions })
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(config: ServerConfig) -> std::io::Result<()> {
    let addr = SocketAddr::new(config.bind, config.port);
    let app = router(config.assumptions);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "wealthplan HTTP API listening");
    tracing::info!(
        inflation = config.assumptions.inflation_rate,
        pre_retirement_return = config.assumptions.pre_retirement_return,
        post_retirement_return = config.assumptions.post_retirement_return,
        life_expectancy = config.assumptions.life_expectancy,
        "retirement assumptions"
    );

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn sip_get_handler(Query(payload): Query<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

async fn sip_post_handler(Json(payload): Json<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

fn sip_handler_impl(payload: SipPayload) -> Response {
    tracing::debug!(?payload, "sip projection");
    match build_sip_response(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => projection_error_response(&err),
    }
}

async fn retirement_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<RetirementPayload>,
) -> Response {
    retirement_handler_impl(state, payload)
}

async fn retirement_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<RetirementPayload>,
) -> Response {
    retirement_handler_impl(state, payload)
}

fn retirement_handler_impl(state: AppState, payload: RetirementPayload) -> Response {
    tracing::debug!(?payload, "retirement plan");
    let request = match retirement_request_from_payload(payload, state.assumptions) {
        Ok(request) => request,
        Err(msg) => {
            tracing::warn!(error = %msg, "rejected retirement request");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };
    match build_retirement_response(request) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => projection_error_response(&err),
    }
}

async fn goal_get_handler(Query(payload): Query<GoalPayload>) -> Response {
    goal_handler_impl(payload)
}

async fn goal_post_handler(Json(payload): Json<GoalPayload>) -> Response {
    goal_handler_impl(payload)
}

fn goal_handler_impl(payload: GoalPayload) -> Response {
    tracing::debug!(?payload, "goal plan");
    match build_goal_response(goal_request_from_payload(payload)) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => projection_error_response(&err),
    }
}

async fn goals_handler() -> Response {
    json_response(StatusCode::OK, GoalKind::catalog())
}

async fn portfolio_handler(Json(payload): Json<PortfolioPayload>) -> Response {
    tracing::debug!(holdings = payload.holdings.len(), "portfolio summary");
    match summarize(&payload.holdings) {
        Ok(summary) => json_response(StatusCode::OK, PortfolioSummary::rounded(&summary)),
        Err(err) => projection_error_response(&err),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn projection_error_response(err: &ProjectionError) -> Response {
    tracing::warn!(error = %err, "projection rejected");
    error_response(projection_error_status(err), &err.to_string())
}
