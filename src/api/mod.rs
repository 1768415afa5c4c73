use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    AxisRange, FutureValueDetail, GrowthBreakdown, Inputs, Mode, YearPoint, compute_axis_range,
    future_value_detail, growth_breakdown, project,
};
use crate::survey::SurveyStore;

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

/// Hard caps mirrored from the web form.
const MAX_PORTFOLIO_VALUE: f64 = 10_000_000.0;
const MAX_ANNUAL_SPENDING: f64 = 10_000_000.0;
const MAX_YEARS: u32 = 50;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliViewMode {
    Savings,
    Spending,
}

impl From<CliViewMode> for Mode {
    fn from(value: CliViewMode) -> Self {
        match value {
            CliViewMode::Savings => Mode::Accumulation,
            CliViewMode::Spending => Mode::Decumulation,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiViewMode {
    #[serde(alias = "grow", alias = "save", alias = "accumulation")]
    Savings,
    #[serde(alias = "spend", alias = "decumulation")]
    Spending,
}

impl From<ApiViewMode> for CliViewMode {
    fn from(value: ApiViewMode) -> Self {
        match value {
            ApiViewMode::Savings => CliViewMode::Savings,
            ApiViewMode::Spending => CliViewMode::Spending,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
enum ResponseMode {
    Savings,
    Spending,
}

impl From<Mode> for ResponseMode {
    fn from(value: Mode) -> Self {
        match value {
            Mode::Accumulation => ResponseMode::Savings,
            Mode::Decumulation => ResponseMode::Spending,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    portfolio_value: Option<f64>,
    annual_fee_percent: Option<f64>,
    years: Option<u32>,
    portfolio_growth: Option<f64>,
    view_mode: Option<ApiViewMode>,
    annual_spending: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VotePayload {
    #[serde(alias = "optionId", alias = "selectedOption")]
    option: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "flatfee",
    about = "Flat-fee vs. percent-fee savings calculator with an embedded web front end"
)]
struct Cli {
    #[arg(long, default_value_t = 1_000_000.0, help = "Starting portfolio value")]
    portfolio_value: f64,
    #[arg(
        long,
        default_value_t = 1.0,
        help = "Current advisory fee in percent of assets"
    )]
    annual_fee_percent: f64,
    #[arg(long, default_value_t = 5, help = "Projection horizon in years")]
    years: u32,
    #[arg(
        long,
        default_value_t = 8.0,
        help = "Expected annual portfolio growth in percent"
    )]
    portfolio_growth: f64,
    #[arg(
        long,
        value_enum,
        default_value_t = CliViewMode::Savings,
        help = "savings grows the portfolio; spending draws it down"
    )]
    view_mode: CliViewMode,
    #[arg(
        long,
        default_value_t = 40_000.0,
        help = "Annual withdrawal in spending mode"
    )]
    annual_spending: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    mode: ResponseMode,
    portfolio_value: f64,
    annual_fee_percent: f64,
    portfolio_growth: f64,
    years: u32,
    annual_spending: f64,
    chart_data: Vec<YearPoint>,
    axis: AxisRange,
    annual_fee_dollars: f64,
    first_year_savings: f64,
    total_savings: f64,
    spending_power_years: f64,
    breakdown: GrowthBreakdown,
    detail: FutureValueDetail,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<Inputs, String> {
    if !cli.portfolio_value.is_finite() || cli.portfolio_value < 0.0 {
        return Err("--portfolio-value must be >= 0".to_string());
    }

    if cli.portfolio_value > MAX_PORTFOLIO_VALUE {
        return Err(format!(
            "--portfolio-value must be <= {MAX_PORTFOLIO_VALUE}"
        ));
    }

    if !(0.0..=100.0).contains(&cli.annual_fee_percent) {
        return Err("--annual-fee-percent must be between 0 and 100".to_string());
    }

    if !cli.portfolio_growth.is_finite() || !(-100.0..=100.0).contains(&cli.portfolio_growth) {
        return Err("--portfolio-growth must be between -100 and 100".to_string());
    }

    if cli.years > MAX_YEARS {
        return Err(format!("--years must be <= {MAX_YEARS}"));
    }

    if !cli.annual_spending.is_finite() || cli.annual_spending < 0.0 {
        return Err("--annual-spending must be >= 0".to_string());
    }

    if cli.annual_spending > MAX_ANNUAL_SPENDING {
        return Err(format!(
            "--annual-spending must be <= {MAX_ANNUAL_SPENDING}"
        ));
    }

    Ok(Inputs {
        portfolio_value: cli.portfolio_value,
        annual_fee_rate: cli.annual_fee_percent / 100.0,
        growth_rate: cli.portfolio_growth / 100.0,
        years: cli.years,
        mode: cli.view_mode.into(),
        annual_spending: cli.annual_spending,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let survey = Arc::new(SurveyStore::new());
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route(
            "/api/survey-response",
            get(survey_get_handler).post(survey_post_handler),
        )
        .fallback(not_found_handler)
        .with_state(survey);

    let listener = TcpListener::bind(addr).await?;
    println!("Flat-fee calculator listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

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

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

fn project_handler_impl(payload: ProjectPayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    json_response(StatusCode::OK, build_project_response(&inputs))
}

async fn survey_get_handler(State(survey): State<Arc<SurveyStore>>) -> Response {
    json_response(StatusCode::OK, survey.snapshot())
}

async fn survey_post_handler(
    State(survey): State<Arc<SurveyStore>>,
    Json(payload): Json<VotePayload>,
) -> Response {
    let Some(option) = payload.option else {
        return error_response(StatusCode::BAD_REQUEST, "Missing survey option");
    };

    match survey.record_vote(&option) {
        Ok(snapshot) => json_response(StatusCode::OK, snapshot),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
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

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<Inputs, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

fn inputs_from_payload(payload: ProjectPayload) -> Result<Inputs, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.portfolio_value {
        cli.portfolio_value = v;
    }
    if let Some(v) = payload.annual_fee_percent {
        cli.annual_fee_percent = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.portfolio_growth {
        cli.portfolio_growth = v;
    }
    if let Some(v) = payload.view_mode {
        cli.view_mode = v.into();
    }
    if let Some(v) = payload.annual_spending {
        cli.annual_spending = v;
    }

    build_inputs(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        portfolio_value: 1_000_000.0,
        annual_fee_percent: 1.0,
        years: 5,
        portfolio_growth: 8.0,
        view_mode: CliViewMode::Savings,
        annual_spending: 40_000.0,
    }
}

fn build_project_response(inputs: &Inputs) -> ProjectResponse {
    let result = project(inputs);
    let axis = compute_axis_range(&result.points, inputs.mode, inputs.portfolio_value);

    ProjectResponse {
        mode: inputs.mode.into(),
        portfolio_value: inputs.portfolio_value,
        annual_fee_percent: inputs.annual_fee_rate * 100.0,
        portfolio_growth: inputs.growth_rate * 100.0,
        years: inputs.years,
        annual_spending: inputs.annual_spending,
        axis,
        annual_fee_dollars: result.annual_fee_dollars,
        first_year_savings: result.first_year_savings,
        total_savings: result.total_savings,
        spending_power_years: result.spending_power_years,
        breakdown: growth_breakdown(inputs),
        detail: future_value_detail(inputs),
        chart_data: result.points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_cli() -> Cli {
        default_cli_for_api()
    }

    #[test]
    fn build_inputs_converts_percents_to_rates() {
        let inputs = build_inputs(sample_cli()).expect("valid inputs");
        assert_approx(inputs.annual_fee_rate, 0.01);
        assert_approx(inputs.growth_rate, 0.08);
        assert_eq!(inputs.mode, Mode::Accumulation);
    }

    #[test]
    fn build_inputs_rejects_oversized_portfolio() {
        let mut cli = sample_cli();
        cli.portfolio_value = 10_000_001.0;

        let err = build_inputs(cli).expect_err("must reject oversized portfolio");
        assert!(err.contains("--portfolio-value"));
    }

    #[test]
    fn build_inputs_rejects_non_finite_values() {
        let mut cli = sample_cli();
        cli.portfolio_value = f64::NAN;
        let err = build_inputs(cli).expect_err("must reject NaN");
        assert!(err.contains("--portfolio-value"));

        let mut cli = sample_cli();
        cli.portfolio_growth = f64::INFINITY;
        let err = build_inputs(cli).expect_err("must reject infinity");
        assert!(err.contains("--portfolio-growth"));
    }

    #[test]
    fn build_inputs_rejects_fee_out_of_range() {
        let mut cli = sample_cli();
        cli.annual_fee_percent = 101.0;
        let err = build_inputs(cli).expect_err("must reject fee > 100");
        assert!(err.contains("--annual-fee-percent"));

        let mut cli = sample_cli();
        cli.annual_fee_percent = -0.5;
        let err = build_inputs(cli).expect_err("must reject negative fee");
        assert!(err.contains("--annual-fee-percent"));
    }

    #[test]
    fn build_inputs_rejects_horizon_beyond_policy_cap() {
        let mut cli = sample_cli();
        cli.years = 51;
        let err = build_inputs(cli).expect_err("must reject years > 50");
        assert!(err.contains("--years"));
    }

    #[test]
    fn inputs_from_json_parses_web_keys() {
        let json = r#"{
          "portfolioValue": 2000000,
          "annualFeePercent": 1.25,
          "years": 20,
          "portfolioGrowth": 6.5,
          "viewMode": "spending",
          "annualSpending": 55000
        }"#;
        let inputs = inputs_from_json(json).expect("json should parse");

        assert_approx(inputs.portfolio_value, 2_000_000.0);
        assert_approx(inputs.annual_fee_rate, 0.0125);
        assert_eq!(inputs.years, 20);
        assert_approx(inputs.growth_rate, 0.065);
        assert_eq!(inputs.mode, Mode::Decumulation);
        assert_approx(inputs.annual_spending, 55_000.0);
    }

    #[test]
    fn inputs_from_json_accepts_mode_aliases() {
        for (alias, expected) in [
            ("grow", Mode::Accumulation),
            ("save", Mode::Accumulation),
            ("accumulation", Mode::Accumulation),
            ("spend", Mode::Decumulation),
            ("decumulation", Mode::Decumulation),
        ] {
            let json = format!(r#"{{ "viewMode": "{alias}" }}"#);
            let inputs = inputs_from_json(&json).expect("alias should parse");
            assert_eq!(inputs.mode, expected, "alias {alias}");
        }
    }

    #[test]
    fn inputs_from_json_falls_back_to_defaults() {
        let inputs = inputs_from_json("{}").expect("empty payload uses defaults");
        assert_approx(inputs.portfolio_value, 1_000_000.0);
        assert_approx(inputs.annual_fee_rate, 0.01);
        assert_eq!(inputs.years, 5);
        assert_eq!(inputs.mode, Mode::Accumulation);
    }

    #[test]
    fn project_response_serialization_contains_expected_fields() {
        let inputs = build_inputs(sample_cli()).expect("valid inputs");
        let response = build_project_response(&inputs);
        let json = serde_json::to_string(&response).expect("response should serialize");

        assert!(json.contains("\"mode\":\"savings\""));
        assert!(json.contains("\"chartData\""));
        assert!(json.contains("\"percentFeePortfolio\""));
        assert!(json.contains("\"flatFeePortfolio\""));
        assert!(json.contains("\"axis\""));
        assert!(json.contains("\"ticks\""));
        assert!(json.contains("\"firstYearSavings\""));
        assert!(json.contains("\"totalSavings\""));
        assert!(json.contains("\"lostToFees\""));
        assert!(json.contains("\"flatFeeFv\""));
    }

    #[test]
    fn project_response_echoes_percent_inputs() {
        let mut cli = sample_cli();
        cli.annual_fee_percent = 1.25;
        cli.portfolio_growth = 6.5;

        let inputs = build_inputs(cli).expect("valid inputs");
        let response = build_project_response(&inputs);
        assert_approx(response.annual_fee_percent, 1.25);
        assert_approx(response.portfolio_growth, 6.5);
    }

    #[test]
    fn vote_payload_accepts_legacy_key_aliases() {
        for json in [
            r#"{"option": "invest"}"#,
            r#"{"optionId": "invest"}"#,
            r#"{"selectedOption": "invest"}"#,
        ] {
            let payload: VotePayload = serde_json::from_str(json).expect("payload should parse");
            assert_eq!(payload.option.as_deref(), Some("invest"), "payload {json}");
        }
    }
}
