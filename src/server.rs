use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::data::filter::{RecommendEngine, RecommendError};
use crate::data::model::DecodedPlace;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(engine: Arc<RecommendEngine>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/about", get(about))
        .route("/recommend", post(recommend_form))
        .route("/api/health", get(health))
        .route("/api/options", get(api_options))
        .route("/api/recommend", post(api_recommend))
        .with_state(engine)
}

#[derive(Deserialize)]
pub struct RecommendRequest {
    pub zone: String,
    #[serde(rename = "type")]
    pub place_type: String,
}

// ---------------------------------------------------------------------------
// HTML pages
// ---------------------------------------------------------------------------

async fn index(State(engine): State<Arc<RecommendEngine>>) -> Html<String> {
    Html(form_page(&engine, None))
}

async fn about() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>About – Yatra</title></head>
<body>
    <h1>About</h1>
    <p>Yatra recommends Indian tourist destinations. Pick a zone and a place
    type on the <a href="/">home page</a> and get every matching destination
    from a curated dataset of top Indian places to visit.</p>
</body>
</html>
"#,
    )
}

async fn recommend_form(
    State(engine): State<Arc<RecommendEngine>>,
    Form(req): Form<RecommendRequest>,
) -> Response {
    match engine.recommend(&req.zone, &req.place_type) {
        Ok(results) => Html(results_page(&results)).into_response(),
        Err(err @ (RecommendError::InvalidZone { .. } | RecommendError::InvalidType { .. })) => {
            log::debug!("rejected form input: {err}");
            Html(form_page(&engine, Some(&err.to_string()))).into_response()
        }
        Err(err) => {
            log::error!("recommend failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string()).into_response()
        }
    }
}

fn form_page(engine: &RecommendEngine, message: Option<&str>) -> String {
    let mut options = String::new();
    let select = |name: &str, values: &[String]| {
        let mut s = format!("<label for=\"{name}\">{name}</label>\n<select name=\"{name}\" id=\"{name}\">\n");
        for v in values {
            let v = escape(v);
            s.push_str(&format!("  <option value=\"{v}\">{v}</option>\n"));
        }
        s.push_str("</select>\n");
        s
    };
    options.push_str(&select("zone", engine.zone_options()));
    options.push_str(&select("type", engine.type_options()));

    let flash = message
        .map(|m| format!("<p class=\"error\">{}</p>\n", escape(m)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Yatra – Destination Recommender</title>
    <style>
        body {{ font-family: Arial, sans-serif; max-width: 800px; margin: 50px auto; }}
        .error {{ color: #b00020; }}
        select {{ margin: 0 16px 16px 4px; }}
    </style>
</head>
<body>
    <h1>Find your next destination</h1>
    {flash}<form action="/recommend" method="post">
{options}        <button type="submit">Recommend</button>
    </form>
    <p><a href="/about">About</a></p>
</body>
</html>
"#
    )
}

fn results_page(results: &[DecodedPlace]) -> String {
    let body = if results.is_empty() {
        "<p>No destinations match that zone and type.</p>".to_string()
    } else {
        let mut rows = String::new();
        for p in results {
            rows.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&p.name),
                escape(&p.city),
                escape(&p.state),
                escape(&p.significance),
                escape(&p.best_time),
                p.visit_hours,
                p.rating,
                p.entrance_fee,
            ));
        }
        format!(
            "<table border=\"1\" cellpadding=\"6\">\n<tr><th>Name</th><th>City</th><th>State</th>\
<th>Significance</th><th>Best time</th><th>Hours needed</th><th>Rating</th><th>Fee (INR)</th></tr>\n{rows}</table>"
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Results – Yatra</title></head>
<body>
    <h1>Recommendations</h1>
    {body}
    <p><a href="/">Back</a></p>
</body>
</html>
"#
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ---------------------------------------------------------------------------
// JSON API
// ---------------------------------------------------------------------------

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "yatra",
    }))
}

async fn api_options(State(engine): State<Arc<RecommendEngine>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "zones": engine.zone_options(),
        "types": engine.type_options(),
    }))
}

async fn api_recommend(
    State(engine): State<Arc<RecommendEngine>>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<Vec<DecodedPlace>>, (StatusCode, Json<serde_json::Value>)> {
    match engine.recommend(&req.zone, &req.place_type) {
        Ok(results) => Ok(Json(results)),
        Err(RecommendError::InvalidZone { value, options }) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "error": "invalid zone",
                "value": value,
                "valid_options": options,
            })),
        )),
        Err(RecommendError::InvalidType { value, options }) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "error": "invalid type",
                "value": value,
                "valid_options": options,
            })),
        )),
        Err(err) => {
            log::error!("recommend failed: {err}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "internal error" })),
            ))
        }
    }
}
