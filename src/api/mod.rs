use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    Allocation, DEFAULT_SCENARIOS, DISCLAIMER, INVESTMENT_TIPS, MonthlySample, ProjectionInput,
    ProjectionSummary, RiskLevel, ScenarioFan, StrategyOutcome, YearlyCheckpoint, allocation,
    compare_strategies, project, scenario_fan, summarize, yearly_checkpoints,
};
use crate::error::{AppError, InputError};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const DEFAULT_INITIAL: f64 = 10_000_000.0;
const DEFAULT_MONTHLY: f64 = 1_000_000.0;
const DEFAULT_YEARS: u32 = 10;
const DEFAULT_EXPECTED_RETURN: f64 = 10.0;
const DEFAULT_VOLATILITY: f64 = 15.0;

const YEARS_RANGE: (u32, u32) = (1, 40);
const EXPECTED_RETURN_RANGE: (f64, f64) = (0.0, 30.0);
const VOLATILITY_RANGE: (f64, f64) = (1.0, 30.0);
const SCENARIOS_RANGE: (u32, u32) = (1, 100);
const SLIDER_STEP: f64 = 0.5;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliRiskLevel {
    Low,
    Medium,
    High,
}

impl From<CliRiskLevel> for RiskLevel {
    fn from(value: CliRiskLevel) -> Self {
        match value {
            CliRiskLevel::Low => RiskLevel::Low,
            CliRiskLevel::Medium => RiskLevel::Medium,
            CliRiskLevel::High => RiskLevel::High,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiRiskLevel {
    #[serde(alias = "Low", alias = "conservative")]
    Low,
    #[serde(alias = "Medium", alias = "moderate", alias = "balanced")]
    Medium,
    #[serde(alias = "High", alias = "aggressive")]
    High,
}

impl From<ApiRiskLevel> for CliRiskLevel {
    fn from(value: ApiRiskLevel) -> Self {
        match value {
            ApiRiskLevel::Low => CliRiskLevel::Low,
            ApiRiskLevel::Medium => CliRiskLevel::Medium,
            ApiRiskLevel::High => CliRiskLevel::High,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    initial: Option<f64>,
    monthly: Option<f64>,
    years: Option<u32>,
    expected_return: Option<f64>,
    risk_level: Option<ApiRiskLevel>,
    volatility_enabled: Option<bool>,
    volatility: Option<f64>,
    scenarios: Option<u32>,
    seed: Option<u64>,
    start_date: Option<NaiveDate>,
}

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    about = "Periodic investment growth projector (monthly compounding, optional volatility)"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the dashboard and the JSON projection API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Print a single projection report
    Project(ProjectArgs),
}

#[derive(Args, Debug, Clone)]
struct ProjectArgs {
    #[arg(long, default_value_t = DEFAULT_INITIAL, help = "Initial capital")]
    initial: f64,
    #[arg(long, default_value_t = DEFAULT_MONTHLY, help = "Contribution added every month")]
    monthly: f64,
    #[arg(long, default_value_t = DEFAULT_YEARS, help = "Horizon in years (1-40)")]
    years: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_EXPECTED_RETURN,
        help = "Expected annual return in percent (0-30)"
    )]
    expected_return: f64,
    #[arg(long, value_enum, default_value_t = CliRiskLevel::Medium)]
    risk: CliRiskLevel,
    #[arg(
        long,
        help = "Annual volatility in percent (1-30); omit for a deterministic projection"
    )]
    volatility: Option<f64>,
    #[arg(
        long,
        default_value_t = DEFAULT_SCENARIOS,
        help = "Number of scenario paths drawn when volatility is set"
    )]
    scenarios: u32,
    #[arg(long, help = "Seed for the random source; random when omitted")]
    seed: Option<u64>,
    #[arg(long, help = "First month of the projection (YYYY-MM-DD); defaults to today")]
    start_date: Option<NaiveDate>,
    #[arg(long, help = "Print the full JSON report instead of tables")]
    json: bool,
}

#[derive(Debug)]
struct ProjectRequest {
    input: ProjectionInput,
    risk_level: RiskLevel,
    scenarios: u32,
    seed: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RiskResponse {
    level: RiskLevel,
    label: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    input: ProjectionInput,
    seed: u64,
    summary: ProjectionSummary,
    allocation: Allocation,
    series: Vec<MonthlySample>,
    yearly: Vec<YearlyCheckpoint>,
    risk: RiskResponse,
    tips: &'static [&'static str],
    disclaimer: &'static str,
    scenarios: Option<ScenarioFan>,
    strategies: Vec<StrategyOutcome>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Serve { port } => Ok(run_http_server(port).await?),
        Command::Project(args) => {
            let json = args.json;
            let request = build_request(args)?;
            let report = build_report(&request)?;
            let output = if json {
                serde_json::to_string_pretty(&report)?
            } else {
                render_text(&report)?
            };
            println!("{output}");
            Ok(())
        }
    }
}

fn check_range<T>(field: &'static str, value: T, (min, max): (T, T)) -> Result<(), InputError>
where
    T: PartialOrd + Copy + Into<f64>,
{
    if value < min || value > max {
        return Err(InputError::OutOfRange {
            field,
            min: min.into(),
            max: max.into(),
            value: value.into(),
        });
    }
    Ok(())
}

fn check_step(field: &'static str, value: f64, step: f64) -> Result<(), InputError> {
    if (value / step).fract() != 0.0 {
        return Err(InputError::OffStep { field, step, value });
    }
    Ok(())
}

fn build_request(args: ProjectArgs) -> Result<ProjectRequest, InputError> {
    for (field, value) in [("initial", args.initial), ("monthly", args.monthly)] {
        if !value.is_finite() || value < 0.0 {
            return Err(InputError::NegativeAmount { field, value });
        }
    }

    check_range("years", args.years, YEARS_RANGE)?;
    if args.expected_return.is_nan() {
        return Err(InputError::InvalidReturn(args.expected_return));
    }
    check_range("expected return", args.expected_return, EXPECTED_RETURN_RANGE)?;
    check_step("expected return", args.expected_return, SLIDER_STEP)?;

    if let Some(volatility) = args.volatility {
        if volatility.is_nan() {
            return Err(InputError::InvalidVolatility(volatility));
        }
        check_range("volatility", volatility, VOLATILITY_RANGE)?;
        check_step("volatility", volatility, SLIDER_STEP)?;
    }
    check_range("scenarios", args.scenarios, SCENARIOS_RANGE)?;

    let input = ProjectionInput {
        initial: args.initial,
        monthly: args.monthly,
        years: args.years,
        annual_return_pct: args.expected_return,
        volatility_pct: args.volatility.unwrap_or(0.0),
        start_date: args
            .start_date
            .unwrap_or_else(|| Local::now().date_naive()),
    };
    input.validate()?;

    Ok(ProjectRequest {
        input,
        risk_level: args.risk.into(),
        scenarios: args.scenarios,
        // Keep generated seeds within 53 bits so the dashboard can echo them back exactly.
        seed: args.seed.unwrap_or_else(|| rand::random::<u64>() >> 11),
    })
}

fn build_report(request: &ProjectRequest) -> Result<ProjectResponse, InputError> {
    let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
    let series = project(&request.input, &mut rng)?;
    let summary = summarize(&series);
    let yearly = yearly_checkpoints(&series);

    let scenarios = if request.input.is_stochastic() {
        Some(scenario_fan(&request.input, request.scenarios, &mut rng)?)
    } else {
        None
    };
    let strategies = compare_strategies(&request.input)?;

    Ok(ProjectResponse {
        input: request.input.clone(),
        seed: request.seed,
        allocation: allocation(&summary),
        summary,
        series: series.samples,
        yearly,
        risk: RiskResponse {
            level: request.risk_level,
            label: request.risk_level.label(),
            description: request.risk_level.description(),
        },
        tips: &INVESTMENT_TIPS,
        disclaimer: DISCLAIMER,
        scenarios,
        strategies,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "projection dashboard listening");
    info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(query: Result<Query<ProjectPayload>, QueryRejection>) -> Response {
    match query {
        Ok(Query(payload)) => project_handler_impl(payload).await,
        Err(rejection) => malformed_payload(&rejection.body_text()),
    }
}

async fn project_post_handler(body: Result<Json<ProjectPayload>, JsonRejection>) -> Response {
    match body {
        Ok(Json(payload)) => project_handler_impl(payload).await,
        Err(rejection) => malformed_payload(&rejection.body_text()),
    }
}

fn malformed_payload(msg: &str) -> Response {
    warn!(error = msg, "malformed projection payload");
    error_response(StatusCode::BAD_REQUEST, msg)
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let outcome = build_request(args_from_payload(payload)).and_then(|request| {
        debug!(input = ?request.input, seed = request.seed, "projecting");
        build_report(&request)
    });

    match outcome {
        Ok(report) => {
            info!(
                months = report.series.len(),
                seed = report.seed,
                stochastic = report.scenarios.is_some(),
                "projection served"
            );
            json_response(StatusCode::OK, report)
        }
        Err(err) => {
            warn!(error = %err, "rejected projection request");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn args_from_json(json: &str) -> Result<ProjectArgs, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(args_from_payload(payload))
}

fn args_from_payload(payload: ProjectPayload) -> ProjectArgs {
    let mut args = default_args_for_api();

    if let Some(v) = payload.initial {
        args.initial = v;
    }
    if let Some(v) = payload.monthly {
        args.monthly = v;
    }
    if let Some(v) = payload.years {
        args.years = v;
    }
    if let Some(v) = payload.expected_return {
        args.expected_return = v;
    }
    if let Some(v) = payload.risk_level {
        args.risk = v.into();
    }
    if let Some(v) = payload.scenarios {
        args.scenarios = v;
    }
    if let Some(v) = payload.seed {
        args.seed = Some(v);
    }
    if let Some(v) = payload.start_date {
        args.start_date = Some(v);
    }

    // A bare volatility value switches the toggle on.
    args.volatility = match (payload.volatility_enabled, payload.volatility) {
        (Some(false), _) => None,
        (Some(true), v) => Some(v.unwrap_or(DEFAULT_VOLATILITY)),
        (None, v) => v,
    };

    args
}

fn default_args_for_api() -> ProjectArgs {
    ProjectArgs {
        initial: DEFAULT_INITIAL,
        monthly: DEFAULT_MONTHLY,
        years: DEFAULT_YEARS,
        expected_return: DEFAULT_EXPECTED_RETURN,
        risk: CliRiskLevel::Medium,
        volatility: None,
        scenarios: DEFAULT_SCENARIOS,
        seed: None,
        start_date: None,
        json: false,
    }
}

fn format_amount(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn format_roi(roi_pct: Option<f64>) -> String {
    roi_pct.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}%"))
}

fn render_text(report: &ProjectResponse) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let input = &report.input;

    let mode = if input.is_stochastic() {
        format!("volatility {:.1}%", input.volatility_pct)
    } else {
        "deterministic".to_string()
    };
    writeln!(
        out,
        "Plan: {} initial + {} monthly for {} years at {:.1}% ({mode}), seed {}",
        format_amount(input.initial),
        format_amount(input.monthly),
        input.years,
        input.annual_return_pct,
        report.seed,
    )?;
    writeln!(
        out,
        "Total contributed : {}",
        format_amount(report.summary.total_contributed)
    )?;
    writeln!(
        out,
        "Final balance     : {}",
        format_amount(report.summary.final_balance)
    )?;
    writeln!(
        out,
        "Profit            : {} ({})",
        format_amount(report.summary.profit),
        format_roi(report.summary.roi_pct)
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "Risk level {}: {}",
        report.risk.label, report.risk.description
    )?;

    writeln!(out)?;
    writeln!(
        out,
        "{:>4}  {:>20}  {:>20}  {:>20}  {:>9}",
        "Year", "Contributed", "Balance", "Profit", "Return"
    )?;
    for row in &report.yearly {
        writeln!(
            out,
            "{:>4}  {:>20}  {:>20}  {:>20}  {:>9}",
            row.year,
            format_amount(row.contributed),
            format_amount(row.balance),
            format_amount(row.profit),
            format_roi(row.roi_pct)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Strategies:")?;
    for strategy in &report.strategies {
        writeln!(
            out,
            "  {:<13} {:>5.1}%  final {:>20}  profit {:>20}  ROI {:>9}",
            strategy.name,
            strategy.annual_return_pct,
            format_amount(strategy.final_balance),
            format_amount(strategy.profit),
            format_roi(strategy.roi_pct)
        )?;
    }

    if let Some(fan) = &report.scenarios {
        writeln!(out)?;
        writeln!(
            out,
            "Scenarios ({}): min {}  mean {}  max {}",
            fan.paths.len(),
            format_amount(fan.final_min),
            format_amount(fan.final_mean),
            format_amount(fan.final_max)
        )?;
    }

    writeln!(out)?;
    write!(out, "{}", report.disclaimer)?;
    Ok(out)
}
