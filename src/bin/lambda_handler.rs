//! AWS Lambda handler for student loan projections
//!
//! Accepts borrower inputs as JSON and returns the year-by-year ledger, the
//! summary verdict and headline statistics, optionally with a comparison
//! across every preset career.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use chrono::Datelike;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use student_loan_system::{
    career::{self, CAREER_TEMPLATES},
    projection::{KeyStats, LoanInputs, ProjectionResult},
    CareerOutcome, PlanType, SalaryMilestone, SalaryProfile, ScenarioRunner,
};

/// Input for one projection
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRequest {
    /// Amount borrowed (default: typical tuition plus maintenance for the start year)
    #[serde(default)]
    pub loan_amount: Option<f64>,

    /// Repayment plan (default: plan2)
    #[serde(default = "default_plan")]
    pub plan: PlanType,

    /// Course start year (default: current year)
    #[serde(default)]
    pub start_year: Option<i32>,

    /// Course length in years (default: 4)
    #[serde(default = "default_course_duration")]
    pub course_duration: u32,

    /// Preset career id, used when no milestones are given (default: nursing)
    #[serde(default = "default_career")]
    pub career: String,

    /// Custom salary milestones
    #[serde(default)]
    pub milestones: Option<Vec<SalaryMilestone>>,

    /// Include the all-careers comparison
    #[serde(default)]
    pub compare_careers: bool,
}

fn default_plan() -> PlanType { PlanType::Plan2 }
fn default_course_duration() -> u32 { 4 }
fn default_career() -> String { "nursing".to_string() }

/// Output from the projection
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResponse {
    pub result: ProjectionResult,
    pub key_stats: KeyStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub careers: Option<Vec<CareerOutcome>>,
    pub execution_time_ms: u64,
}

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    let body = serde_json::json!({ "error": message }).to_string();
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(body))?)
}

fn json_response(body: &ProjectionResponse) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

/// Request body as text; `None` when a binary body is not valid UTF-8
fn body_text(body: &Body) -> Option<String> {
    match body {
        Body::Text(s) => Some(s.clone()),
        Body::Binary(b) => String::from_utf8(b.clone()).ok(),
        Body::Empty => Some("{}".to_string()),
    }
}

/// Build validated inputs, or a message for the caller
fn build_inputs(request: ProjectionRequest, runner: &ScenarioRunner) -> Result<(LoanInputs, bool), String> {
    let start_year = request.start_year.unwrap_or_else(|| chrono::Utc::now().year());
    let loan = request
        .loan_amount
        .unwrap_or_else(|| runner.assumptions().tuition.typical_loan_amount(start_year));

    let profile = match request.milestones {
        Some(milestones) => SalaryProfile::new(milestones).map_err(|e| e.to_string())?,
        None => career::find(&request.career)
            .map(|c| c.profile())
            .ok_or_else(|| format!("Unknown career: {}", request.career))?,
    };

    let inputs = LoanInputs::new(loan, profile, start_year, request.plan, request.course_duration)
        .map_err(|e| e.to_string())?;
    Ok((inputs, request.compare_careers))
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)?);
    }

    let body_str = match body_text(event.body()) {
        Some(s) => s,
        None => {
            warn!("Rejected request body: invalid UTF-8");
            return error_response(400, "Request body must be UTF-8 JSON");
        }
    };

    let request: ProjectionRequest = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => {
            warn!("Rejected request body: {}", e);
            return error_response(400, &format!("Invalid JSON: {}", e));
        }
    };

    let runner = ScenarioRunner::new();
    let (inputs, compare) = match build_inputs(request, &runner) {
        Ok(built) => built,
        Err(message) => {
            warn!("Rejected request: {}", message);
            return error_response(400, &message);
        }
    };

    let result = runner.run(&inputs);
    let careers = compare.then(|| runner.compare_careers(&inputs, CAREER_TEMPLATES));

    let response = ProjectionResponse {
        key_stats: result.key_stats(),
        result,
        careers,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "{} projection for £{:.0} in {}ms",
        inputs.plan(),
        inputs.initial_debt(),
        response.execution_time_ms
    );

    json_response(&response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
