use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
    Form, Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::{collections::HashMap, fmt::Write, sync::Arc};

use crate::error::PipelineError;
use crate::features::{FieldSpec, FIELD_SPECS};
use crate::pipeline::PredictionPipeline;
use crate::risk::{PredictionResult, Severity, UNKNOWN_ADVICE, UNKNOWN_TIER};

pub const INVALID_INPUT_MESSAGE: &str = "Please enter valid numbers in all fields!";

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<PredictionPipeline>,
}

impl AppState {
    pub fn new(pipeline: PredictionPipeline) -> Self {
        Self { pipeline: Arc::new(pipeline) }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form_page).post(submit_form))
        .route("/predict", axum::routing::post(predict_json))
        .route("/schema", get(schema))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

// ---------- Response types ----------

/// What a front-end shows for one submission. `severity` is absent when the
/// label had no tier.
#[derive(Serialize, Debug)]
pub struct PredictionOut {
    pub label: u32,
    pub tier: &'static str,
    pub severity: Option<Severity>,
    pub advice: Vec<&'static str>,
}

impl From<PredictionResult> for PredictionOut {
    fn from(r: PredictionResult) -> Self {
        Self {
            label: r.label,
            tier: r.tier.name(),
            severity: Some(r.severity()),
            advice: r.advice.to_vec(),
        }
    }
}

impl PredictionOut {
    fn unknown(label: u32) -> Self {
        Self { label, tier: UNKNOWN_TIER, severity: None, advice: vec![UNKNOWN_ADVICE] }
    }
}

/// Collapse a per-call pipeline outcome into what the user sees.
/// Returns `Err` only for malformed input.
fn outcome(
    result: Result<PredictionResult, PipelineError>,
) -> Result<PredictionOut, PipelineError> {
    match result {
        Ok(r) => Ok(r.into()),
        Err(PipelineError::UnmappedLabel(label)) => Ok(PredictionOut::unknown(label)),
        Err(e) => Err(e),
    }
}

// ---------- Handlers ----------

async fn form_page() -> Html<String> {
    Html(render_page(None, None))
}

async fn submit_form(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Html<String> {
    match outcome(state.pipeline.predict_text_fields(&fields)) {
        Ok(out) => {
            tracing::debug!(label = out.label, tier = out.tier, "form prediction");
            Html(render_page(Some(&out), None))
        }
        Err(e) => {
            tracing::debug!("rejected form submission: {}", e);
            Html(render_page(None, Some(INVALID_INPUT_MESSAGE)))
        }
    }
}

async fn predict_json(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Map<String, Value>>,
) -> Result<Json<PredictionOut>, (StatusCode, Json<Value>)> {
    let out = outcome(state.pipeline.predict_json_fields(&payload))
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": e.to_string() }))))?;
    tracing::debug!(label = out.label, tier = out.tier, "json prediction");
    Ok(Json(out))
}

#[derive(Serialize)]
struct SchemaOut {
    schema: &'static str,
    neighbors: usize,
    training_samples: usize,
    fields: &'static [FieldSpec],
}

async fn schema(State(state): State<AppState>) -> Json<SchemaOut> {
    Json(SchemaOut {
        schema: state.pipeline.schema().as_str(),
        neighbors: state.pipeline.k(),
        training_samples: state.pipeline.n_samples(),
        fields: &FIELD_SPECS,
    })
}

// ---------- Page rendering ----------

const STYLE: &str = "body{font-family:Arial,sans-serif;background-color:#DFFFD6;text-align:center;padding:20px}\
form{background:white;padding:20px;border-radius:8px;display:inline-block;text-align:left}\
label{display:block;margin:10px 0}input{width:100%;padding:5px;margin-top:5px}\
button{background-color:#4CAF50;color:white;padding:10px;border:none;cursor:pointer;margin-top:10px}\
.result{font-size:24px;font-weight:bold}.ok{color:green}.warning{color:orange}.alert,.error{color:red}";

fn severity_class(s: Option<Severity>) -> &'static str {
    match s {
        Some(Severity::Ok) => "ok",
        Some(Severity::Warning) => "warning",
        Some(Severity::Alert) | None => "alert",
    }
}

fn render_field(html: &mut String, f: &FieldSpec) {
    let _ = write!(html, "<label>{}: <input type=\"number\" name=\"{}\" step=\"{}\"", f.label, f.name, f.step);
    if let Some(min) = f.min {
        let _ = write!(html, " min=\"{}\"", min);
    }
    if let Some(max) = f.max {
        let _ = write!(html, " max=\"{}\"", max);
    }
    html.push_str(" required></label>\n");
}

/// Every string interpolated here is a compile-time constant, so nothing needs escaping.
pub fn render_page(result: Option<&PredictionOut>, error: Option<&str>) -> String {
    let mut html = String::with_capacity(4096);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"UTF-8\"><title>Heart Safe AI</title><style>{}</style></head>\n<body>\n<h1>Heart Safe AI - Prediction</h1>\n",
        STYLE
    );
    if let Some(msg) = error {
        let _ = writeln!(html, "<p class=\"error\">{}</p>", msg);
    }
    html.push_str("<form action=\"/\" method=\"post\">\n");
    for f in &FIELD_SPECS {
        render_field(&mut html, f);
    }
    html.push_str("<button type=\"submit\">Predict</button>\n</form>\n");

    if let Some(out) = result {
        let _ = writeln!(
            html,
            "<h2 class=\"result {}\">{}</h2>\n<h3>Precautions:</h3>\n<ul>",
            severity_class(out.severity),
            out.tier
        );
        for a in &out.advice {
            let _ = writeln!(html, "<li>{}</li>", a);
        }
        html.push_str("</ul>\n<a href=\"/\">Go Back</a>\n");
    }
    html.push_str("</body>\n</html>\n");
    html
}
