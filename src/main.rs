use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::net::IpAddr;
use tracing_subscriber::EnvFilter;

use wealthplan::api::{ServerConfig, run_http_server};
use wealthplan::core::{
    GoalKind, ProjectionInput, RetirementAssumptions, plan_goal, plan_retirement, project_sip,
    resolve_target_and_years,
};

const DEFAULT_LOG_FILTER: &str = "wealthplan=info,tower_http=info";

#[derive(Parser, Debug)]
#[command(
    name = "wealthplan",
    about = "SIP, retirement and goal projections (CLI and HTTP API)"
)]
struct Cli {
    #[command(flatten)]
    assumptions: AssumptionArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct AssumptionArgs {
    #[arg(
        long,
        global = true,
        default_value_t = 6.0,
        help = "Annual inflation for retirement planning in percent"
    )]
    inflation: f64,
    #[arg(
        long,
        global = true,
        default_value_t = 12.0,
        help = "Expected annual return before retirement in percent"
    )]
    pre_retirement_return: f64,
    #[arg(
        long,
        global = true,
        default_value_t = 8.0,
        help = "Expected annual return after retirement in percent"
    )]
    post_retirement_return: f64,
    #[arg(long, global = true, default_value_t = 85)]
    life_expectancy: u32,
}

impl From<&AssumptionArgs> for RetirementAssumptions {
    fn from(args: &AssumptionArgs) -> Self {
        Self {
            inflation_rate: args.inflation,
            pre_retirement_return: args.pre_retirement_return,
            post_retirement_return: args.post_retirement_return,
            life_expectancy: args.life_expectancy,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve(ServeArgs),
    /// Project the value of a monthly SIP
    Sip(SipArgs),
    /// Corpus and monthly SIP needed to retire
    Retirement(RetirementArgs),
    /// Monthly SIP needed to reach a goal
    Goal(GoalArgs),
    /// List goal types and their defaults
    Goals,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "WEALTHPLAN_BIND", default_value = "0.0.0.0")]
    bind: IpAddr,
    #[arg(long, env = "WEALTHPLAN_PORT", default_value_t = 8080)]
    port: u16,
}

#[derive(Args, Debug)]
struct SipArgs {
    #[arg(long, default_value_t = 5000.0)]
    monthly_investment: f64,
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    years: i64,
    #[arg(long, default_value_t = 12.0, help = "Expected annual return in percent")]
    expected_return: f64,
    #[arg(long, default_value_t = 0.0)]
    initial_investment: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Annual inflation in percent, used for the value in today's money"
    )]
    inflation_rate: f64,
}

#[derive(Args, Debug)]
struct RetirementArgs {
    #[arg(long)]
    current_age: u32,
    #[arg(long)]
    retirement_age: u32,
    #[arg(long, help = "Current monthly expense in today's money")]
    monthly_expense: f64,
    #[arg(long, default_value_t = 0.0, help = "Savings already set aside for retirement")]
    current_savings: f64,
}

#[derive(Args, Debug)]
struct GoalArgs {
    #[arg(long, help = "Goal type, e.g. home, car, education")]
    goal_type: Option<GoalKind>,
    #[arg(long, default_value_t = 0.0)]
    current_amount: f64,
    #[arg(long, help = "Defaults to the goal type's typical amount")]
    target_amount: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    years: Option<i64>,
    #[arg(long, default_value_t = 6.0)]
    inflation_rate: f64,
    #[arg(long, default_value_t = 12.0)]
    expected_return: f64,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn run_sip(args: SipArgs) -> Result<(), String> {
    let input = ProjectionInput::sip(args.monthly_investment, args.expected_return, args.years)
        .with_principal(args.initial_investment)
        .with_inflation(args.inflation_rate);
    let result = project_sip(&input).map_err(|e| e.to_string())?;
    print_json(&result.rounded())
}

fn run_retirement(args: RetirementArgs, assumptions: RetirementAssumptions) -> Result<(), String> {
    let input = ProjectionInput::retirement(
        args.current_age,
        args.retirement_age,
        args.monthly_expense,
        &assumptions,
    )
    .with_principal(args.current_savings);
    let result = plan_retirement(&input, &assumptions).map_err(|e| e.to_string())?;
    print_json(&result.rounded())
}

fn run_goal(args: GoalArgs) -> Result<(), String> {
    let (target, years) = resolve_target_and_years(args.goal_type, args.target_amount, args.years);
    let input = ProjectionInput::goal(
        args.current_amount,
        target,
        years,
        args.inflation_rate,
        args.expected_return,
    );
    let result = plan_goal(&input).map_err(|e| e.to_string())?;
    print_json(&result.rounded())
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let assumptions = RetirementAssumptions::from(&cli.assumptions);

    if let Err(e) = assumptions.validate() {
        eprintln!("Invalid retirement assumptions: {e}");
        std::process::exit(1);
    }

    let outcome = match cli.command {
        Command::Serve(args) => {
            let config = ServerConfig {
                bind: args.bind,
                port: args.port,
                assumptions,
            };
            run_http_server(config).await.map_err(|e| {
                tracing::error!(error = %e, "server error");
                format!("Server error: {e}")
            })
        }
        Command::Sip(args) => run_sip(args),
        Command::Retirement(args) => run_retirement(args, assumptions),
        Command::Goal(args) => run_goal(args),
        Command::Goals => print_json(&GoalKind::catalog()),
    };

    if let Err(e) = outcome {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
