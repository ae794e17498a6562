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
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    Comparison, InvalidInputError, MAX_ANNUAL_RATE, SimulationInput, run_comparison,
    validate_input,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Parser, Debug)]
#[command(
    name = "rentbuy",
    about = "Compare buying a home with a mortgage against renting and investing the difference"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one comparison and print a monthly table with a summary
    Compare(CompareArgs),
    /// Serve the web form and the JSON API
    Serve {
        #[arg(long, env = "RENTBUY_PORT", default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct CompareArgs {
    #[arg(long, default_value_t = 500_000.0)]
    pub home_price: f64,
    #[arg(
        long,
        default_value_t = 20.0,
        help = "Down payment as a percent of the home price"
    )]
    pub down_payment_percent: f64,
    #[arg(long, default_value_t = 4.0, help = "Annual mortgage rate in percent")]
    pub mortgage_rate: f64,
    #[arg(long, default_value_t = 360)]
    pub loan_term_months: u32,
    #[arg(
        long,
        default_value_t = 0,
        help = "Interest-only months at the start of the loan"
    )]
    pub grace_period_months: u32,
    #[arg(long, default_value_t = 1_800.0, help = "Initial monthly rent")]
    pub rent: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Annual rent increase in percent, applied every 12 months"
    )]
    pub rent_growth_rate: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Expected annual home appreciation in percent"
    )]
    pub home_appreciation_rate: f64,
    #[arg(
        long,
        default_value_t = 6.0,
        help = "Expected annual investment return in percent"
    )]
    pub investment_return_rate: f64,
    #[arg(long, help = "Months to simulate, defaults to the loan term")]
    pub horizon_months: Option<u32>,
    #[arg(
        long,
        default_value_t = true,
        action = clap::ArgAction::Set,
        help = "Invest the monthly payment/rent difference; false keeps it as cash"
    )]
    pub invest_difference: bool,
    #[arg(long, default_value_t = 12, help = "Print a table row every N months")]
    pub every: u32,
    #[arg(long, help = "Print the full comparison as JSON instead of a table")]
    pub json: bool,
}

impl Default for CompareArgs {
    fn default() -> Self {
        Self {
            home_price: 500_000.0,
            down_payment_percent: 20.0,
            mortgage_rate: 4.0,
            loan_term_months: 360,
            grace_period_months: 0,
            rent: 1_800.0,
            rent_growth_rate: 0.0,
            home_appreciation_rate: 3.0,
            investment_return_rate: 6.0,
            horizon_months: None,
            invest_difference: true,
            every: 12,
            json: false,
        }
    }
}

pub fn build_input(args: &CompareArgs) -> Result<SimulationInput, InvalidInputError> {
    let input = SimulationInput {
        home_price: args.home_price,
        down_payment_fraction: args.down_payment_percent / 100.0,
        mortgage_rate: args.mortgage_rate / 100.0,
        loan_term_months: args.loan_term_months,
        grace_period_months: args.grace_period_months,
        monthly_rent: args.rent,
        rent_growth_rate: args.rent_growth_rate / 100.0,
        home_appreciation_rate: args.home_appreciation_rate / 100.0,
        investment_return_rate: args.investment_return_rate / 100.0,
        horizon_months: args.horizon_months.unwrap_or(args.loan_term_months),
        invest_difference: args.invest_difference,
    };
    validate_input(&input).map_err(in_user_units)?;
    Ok(input)
}

/// Renames engine fields to the percent-based flags and form fields users fill in.
fn in_user_units(err: InvalidInputError) -> InvalidInputError {
    let rate_cap = format!("must be <= {MAX_ANNUAL_RATE}");
    match err.field {
        "down_payment_fraction" => InvalidInputError::new("down_payment_percent", err.message),
        "monthly_rent" => InvalidInputError::new("rent", err.message),
        "mortgage_rate" | "rent_growth_rate" | "home_appreciation_rate"
        | "investment_return_rate"
            if err.message == rate_cap =>
        {
            InvalidInputError::new(
                err.field,
                format!("must be <= {} percent", MAX_ANNUAL_RATE * 100.0),
            )
        }
        _ => err,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Not found")]
    NotFound,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidInput(err) => {
                warn!(field = err.field, "rejected comparison request: {err}");
                StatusCode::BAD_REQUEST
            }
            ApiError::Rejected { status, message } => {
                warn!(%status, "malformed comparison request: {message}");
                *status
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
        };
        error_response(status, &self.to_string())
    }
}

/// Web form fields. Rates are percents; anything missing falls back to the CLI defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ComparePayload {
    home_price: Option<f64>,
    down_payment_percent: Option<f64>,
    mortgage_rate: Option<f64>,
    loan_term_months: Option<u32>,
    loan_term_years: Option<u32>,
    grace_period_months: Option<u32>,
    grace_period_years: Option<u32>,
    #[serde(alias = "rent")]
    monthly_rent: Option<f64>,
    rent_growth_rate: Option<f64>,
    home_appreciation_rate: Option<f64>,
    investment_return_rate: Option<f64>,
    horizon_months: Option<u32>,
    invest_difference: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("rentbuy HTTP API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, router()).await
}

fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/compare",
            get(compare_get_handler).post(compare_post_handler),
        )
        .fallback(not_found_handler)
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

async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}

async fn compare_get_handler(
    payload: Result<Query<ComparePayload>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(payload) = payload?;
    compare_handler_impl(payload)
}

async fn compare_post_handler(
    payload: Result<Json<ComparePayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    compare_handler_impl(payload)
}

fn compare_handler_impl(payload: ComparePayload) -> Result<Response, ApiError> {
    let input = input_from_payload(payload)?;
    let comparison: Comparison = run_comparison(&input)?;
    Ok(json_response(StatusCode::OK, comparison))
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

fn input_from_payload(payload: ComparePayload) -> Result<SimulationInput, InvalidInputError> {
    let mut args = CompareArgs::default();

    if let Some(v) = payload.home_price {
        args.home_price = v;
    }
    if let Some(v) = payload.down_payment_percent {
        args.down_payment_percent = v;
    }
    if let Some(v) = payload.mortgage_rate {
        args.mortgage_rate = v;
    }
    if let Some(v) = payload.loan_term_years {
        args.loan_term_months = v.saturating_mul(12);
    }
    if let Some(v) = payload.loan_term_months {
        args.loan_term_months = v;
    }
    if let Some(v) = payload.grace_period_years {
        args.grace_period_months = v.saturating_mul(12);
    }
    if let Some(v) = payload.grace_period_months {
        args.grace_period_months = v;
    }
    if let Some(v) = payload.monthly_rent {
        args.rent = v;
    }
    if let Some(v) = payload.rent_growth_rate {
        args.rent_growth_rate = v;
    }
    if let Some(v) = payload.home_appreciation_rate {
        args.home_appreciation_rate = v;
    }
    if let Some(v) = payload.investment_return_rate {
        args.investment_return_rate = v;
    }
    if let Some(v) = payload.horizon_months {
        args.horizon_months = Some(v);
    }
    if let Some(v) = payload.invest_difference {
        args.invest_difference = v;
    }

    build_input(&args)
}

#[cfg(test)]
fn input_from_json(json: &str) -> Result<SimulationInput, String> {
    let payload = serde_json::from_str::<ComparePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    input_from_payload(payload).map_err(|e| e.to_string())
}
