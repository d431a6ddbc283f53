// 🌐 Web Server - exhibit viewer and JSON API
//
// Routes:
//   GET /                          index with one button per selector
//   GET /exhibits/:id              viewer page (?debug=&height=&tables=)
//   GET /exhibits/:id/document     raw rendered document
//   GET /api/health | /api/exhibits | /api/tables | /api/tables/:name | /api/audit

use crate::config::Config;
use crate::data::TABLES;
use crate::exhibit::Exhibit;
use crate::integrity::audit;
use crate::presenter::{Presentation, Presenter, ViewOptions};
use crate::tables::TableView;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    presenter: Arc<Presenter>,
    config: Arc<Config>,
}

impl AppState {
    pub fn new(presenter: Presenter, config: Config) -> Self {
        Self {
            presenter: Arc::new(presenter),
            config: Arc::new(config),
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Serialize)]
struct ExhibitSummary {
    slug: &'static str,
    label: &'static str,
    title: &'static str,
    tables: &'static [&'static str],
}

impl From<Exhibit> for ExhibitSummary {
    fn from(exhibit: Exhibit) -> Self {
        Self {
            slug: exhibit.slug(),
            label: exhibit.label(),
            title: exhibit.title(),
            tables: exhibit.tables(),
        }
    }
}

/// Viewer query string; absent values fall back to the server config
#[derive(Debug, Default, Deserialize)]
pub struct ViewerQuery {
    debug: Option<bool>,
    height: Option<u32>,
    tables: Option<bool>,
}

impl ViewerQuery {
    fn options(&self, config: &Config) -> ViewOptions {
        ViewOptions {
            debug: self.debug.unwrap_or(config.debug),
            height: self.height.unwrap_or(config.height),
            show_tables: self.tables.unwrap_or(false),
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/exhibits - Selector catalog in button order
async fn get_exhibits() -> impl IntoResponse {
    let exhibits: Vec<ExhibitSummary> = Exhibit::ALL.iter().map(|e| (*e).into()).collect();
    Json(ApiResponse::ok(exhibits))
}

/// GET /api/tables - Table catalog
async fn get_tables() -> impl IntoResponse {
    Json(ApiResponse::ok(TABLES))
}

/// GET /api/tables/:name - Column/row view of one table
async fn get_table(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match TableView::from_store(state.presenter.store(), &name) {
        Ok(view) => (StatusCode::OK, Json(ApiResponse::ok(view))).into_response(),
        Err(e) => {
            log::warn!("Table lookup failed: {}", e);
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<TableView>::err(e.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /api/audit - Integrity report over every table
async fn get_audit(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(audit(state.presenter.store())))
}

// ============================================================================
// Page Handlers
// ============================================================================

/// GET / - Index with selector buttons
async fn serve_index(State(state): State<AppState>) -> impl IntoResponse {
    Html(index_page(&state.config))
}

/// GET /exhibits/:id - Viewer page
async fn serve_viewer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Response {
    let exhibit: Exhibit = match id.parse() {
        Ok(exhibit) => exhibit,
        Err(e) => return not_found(&e.to_string()),
    };

    let presentation = state
        .presenter
        .render(exhibit, &query.options(&state.config));
    Html(viewer_page(&presentation)).into_response()
}

/// GET /exhibits/:id/document - The rendered document on its own
async fn serve_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let exhibit: Exhibit = match id.parse() {
        Ok(exhibit) => exhibit,
        Err(e) => return not_found(&e.to_string()),
    };

    match exhibit.render(state.presenter.store()) {
        Ok(rendered) => Html(rendered.document).into_response(),
        Err(e) => {
            log::error!("Rendering {} failed: {}", exhibit, e);
            let body = Html(escape_html(&e.to_string()));
            (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
        }
    }
}

fn not_found(message: &str) -> Response {
    let body = format!(
        "<p class=\"error\">{}</p><p><a href=\"/\">Back</a></p>",
        escape_html(message)
    );
    (StatusCode::NOT_FOUND, Html(page("Not found", &body))).into_response()
}

// ============================================================================
// HTML
// ============================================================================

const PAGE_STYLE: &str = "\
body{font-family:-apple-system,Segoe UI,sans-serif;margin:24px;color:#222}\
a.btn{display:inline-block;margin:4px;padding:8px 14px;border:1px solid #1f77b4;\
border-radius:4px;color:#1f77b4;text-decoration:none}\
a.btn:hover{background:#1f77b4;color:#fff}\
iframe{width:100%;border:1px solid #ddd}\
table{border-collapse:collapse;margin:12px 0;font-size:13px}\
th,td{border:1px solid #ddd;padding:4px 8px;text-align:right}th{background:#f4f4f4}\
.error{color:#b00020}pre{background:#f7f7f7;padding:12px;overflow:auto;max-height:480px}";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
<title>{} - SCF Casebook</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        PAGE_STYLE,
        body
    )
}

fn index_page(config: &Config) -> String {
    let buttons: String = Exhibit::ALL
        .iter()
        .map(|e| {
            format!(
                "<a class=\"btn\" href=\"/exhibits/{}\" title=\"{}\">{}</a>",
                e.slug(),
                escape_html(e.title()),
                e.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let checked = if config.debug { " checked" } else { "" };
    let body = format!(
        "<h1>P&amp;G / Fibria: Supply Chain Finance</h1>\n\
<div id=\"selectors\">\n{buttons}\n</div>\n\
<p><label><input type=\"checkbox\" id=\"debug\"{checked}> Debug mode</label>\n\
<label>Height <input type=\"number\" id=\"height\" value=\"{height}\" \
min=\"2000\" max=\"5000\" step=\"100\"></label>\n\
<label><input type=\"checkbox\" id=\"tables\"> Show tables</label></p>\n\
<script>\n\
document.querySelectorAll('#selectors a').forEach(function (a) {{\n\
  a.addEventListener('click', function (ev) {{\n\
    ev.preventDefault();\n\
    var q = new URLSearchParams();\n\
    var debug = document.getElementById('debug').checked;\n\
    q.set('debug', debug);\n\
    if (debug) q.set('height', document.getElementById('height').value);\n\
    q.set('tables', document.getElementById('tables').checked);\n\
    window.location = a.getAttribute('href') + '?' + q.toString();\n\
  }});\n\
}});\n\
</script>",
        buttons = buttons,
        checked = checked,
        height = config.height,
    );

    page("Exhibits", &body)
}

fn viewer_page(presentation: &Presentation) -> String {
    let mut body = format!(
        "<p><a href=\"/\">← All exhibits</a></p>\n<h1>{}</h1>\n",
        escape_html(&presentation.title)
    );

    if let Some(error) = &presentation.error {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(&error.message)));
        if let Some(traceback) = &error.traceback {
            body.push_str(&format!("<pre>{}</pre>\n", escape_html(traceback)));
        }
        return page(&presentation.title, &body);
    }

    body.push_str(&format!(
        "<iframe srcdoc=\"{}\" height=\"{}\" scrolling=\"yes\"></iframe>\n",
        escape_html(&presentation.document),
        presentation.height
    ));

    if let Some(tables) = &presentation.tables {
        body.push_str("<h2>Data tables</h2>\n");
        for view in tables {
            body.push_str(&table_html(view));
        }
    }

    if let Some(panel) = &presentation.debug {
        body.push_str("<h2>Debug</h2>\n");
        body.push_str(&format!(
            "<p>{}<br>{}<br>Document length: {} characters</p>\n",
            escape_html(&panel.render_report.summary()),
            escape_html(&panel.integrity.summary()),
            panel.document_length
        ));
        let json = serde_json::to_string_pretty(panel).unwrap_or_else(|e| e.to_string());
        body.push_str(&format!("<pre>{}</pre>\n", escape_html(&json)));
    }

    page(&presentation.title, &body)
}

fn table_html(view: &TableView) -> String {
    let head: String = view
        .columns
        .iter()
        .map(|c| format!("<th>{}</th>", escape_html(c)))
        .collect();
    let rows: String = view
        .rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!("<td>{}</td>", escape_html(cell)))
                .collect();
            format!("<tr>{}</tr>\n", cells)
        })
        .collect();

    format!(
        "<h3>{}</h3>\n<table>\n<tr>{}</tr>\n{}</table>\n",
        escape_html(&view.name),
        head,
        rows
    )
}

/// Escape text for HTML element content and quoted attribute values
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/exhibits", get(get_exhibits))
        .route("/tables", get(get_tables))
        .route("/tables/:name", get(get_table))
        .route("/audit", get(get_audit))
        .with_state(state.clone());

    Router::new()
        .route("/", get(serve_index))
        .route("/exhibits/:id", get(serve_viewer))
        .route("/exhibits/:id/document", get(serve_document))
        .with_state(state)
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::new(Presenter::new(), Config::default()))
    }

    async fn get_body(uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_escape_html_keeps_non_ascii() {
        assert_eq!(escape_html("3개월 LIBOR < 0,5% é"), "3개월 LIBOR &lt; 0,5% é");
        assert_eq!(escape_html("\"São Paulo\""), "&quot;São Paulo&quot;");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">P&G's</a>"),
            "&lt;a href=&quot;x&quot;&gt;P&amp;G&#39;s&lt;/a&gt;"
        );
    }

    #[tokio::test]
    async fn test_index_lists_every_selector() {
        let (status, body) = get_body("/").await;
        assert_eq!(status, StatusCode::OK);
        for exhibit in Exhibit::ALL {
            assert!(body.contains(&format!("/exhibits/{}", exhibit.slug())));
        }
    }

    #[tokio::test]
    async fn test_viewer_embeds_document() {
        let (status, body) = get_body("/exhibits/q1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<iframe srcdoc=\"&lt;!DOCTYPE html&gt;"));
        assert!(body.contains("height=\"3000\""));
        assert!(!body.contains("<h2>Debug</h2>"));
    }

    #[tokio::test]
    async fn test_viewer_debug_and_tables() {
        let uri = "/exhibits/exhibit-4?debug=true&height=4230&tables=true";
        let (status, body) = get_body(uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("height=\"4200\""));
        assert!(body.contains("<h2>Data tables</h2>"));
        assert!(body.contains("<h2>Debug</h2>"));
    }

    #[tokio::test]
    async fn test_unknown_exhibit_is_404() {
        let (status, body) = get_body("/exhibits/q9").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Unknown exhibit"));

        let (status, _) = get_body("/exhibits/q9/document").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_raw_document() {
        let (status, body) = get_body("/exhibits/exhibit-3/document").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<!DOCTYPE html>"));
        assert!(!body.contains("_PLACEHOLDER"));
    }

    #[tokio::test]
    async fn test_api_tables() {
        let (status, body) = get_body("/api/tables/pgBalanceSheetData").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["name"], "pgBalanceSheetData");
        assert_eq!(json["data"]["rows"][0][0], "2011");

        let (status, body) = get_body("/api/tables/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_api_catalog_and_audit() {
        let (status, body) = get_body("/api/exhibits").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["data"].as_array().unwrap().len(), 14);
        assert_eq!(json["data"][6]["label"], "Exhibit 1");

        let (status, body) = get_body("/api/audit").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(!json["data"]["findings"].as_array().unwrap().is_empty());

        let (status, _) = get_body("/api/health").await;
        assert_eq!(status, StatusCode::OK);
    }
}
