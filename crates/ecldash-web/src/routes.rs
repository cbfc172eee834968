//! Route handlers and request/response payloads.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;
use ecldash::output::Figure;
use ecldash::pipeline::dashboard_figures;
use ecldash::transform::{DashboardView, ReportingQuarter, Selection};

const LANDING: &str = r#"<!doctype html>
<html>
  <head><title>ecldash</title></head>
  <body>
    <h1>ECL disclosure dashboard</h1>
    <p>Quarter-over-quarter comparison of regulatory disclosure data.</p>
    <ul>
      <li><code>GET /api/segments</code> lists segments, firms and quarters.</li>
      <li><code>GET /api/dashboard?segment=UK&amp;dates=4Q19,4Q20&amp;firms=A,B</code>
          returns bar-chart payloads (at least two dates and one firm).</li>
    </ul>
  </body>
</html>
"#;

/// Landing page.
pub(crate) async fn landing() -> Html<&'static str> {
    Html(LANDING)
}

/// One segment's selectable inputs.
#[derive(Debug, Serialize)]
pub(crate) struct SegmentInfo {
    name: String,
    firms: Vec<String>,
    dates: Vec<String>,
}

/// Segment listing: the choices the input form offers.
pub(crate) async fn segments(State(state): State<Arc<AppState>>) -> Json<Vec<SegmentInfo>> {
    let segments = state
        .config
        .segments
        .iter()
        .map(|(name, segment)| SegmentInfo {
            name: name.clone(),
            firms: segment.firms.clone(),
            dates: segment.dates.clone(),
        })
        .collect();
    Json(segments)
}

/// Dashboard query parameters; lists are comma-separated.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardQuery {
    segment: Option<String>,
    dates: Option<String>,
    firms: Option<String>,
}

/// Figure payloads for one dashboard view.
#[derive(Debug, Serialize)]
pub(crate) struct ViewPayload {
    view: String,
    label: String,
    figures: Vec<Figure>,
}

/// Dashboard response; `views` is empty until the minimum selection
/// (two dates, one firm) is met.
#[derive(Debug, Serialize)]
pub(crate) struct DashboardResponse {
    segment: String,
    views: Vec<ViewPayload>,
}

/// Split a comma-separated query value into trimmed, non-empty items.
pub(crate) fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// Parse date tokens, dropping (and logging) anything unparseable and
/// collapsing duplicates. Only distinct quarters count toward the
/// minimum-selection gate.
pub(crate) fn parse_quarters(tokens: &[String]) -> Vec<ReportingQuarter> {
    let mut quarters: Vec<ReportingQuarter> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token.parse() {
            Ok(quarter) => {
                if !quarters.contains(&quarter) {
                    quarters.push(quarter);
                }
            }
            Err(_) => tracing::warn!(token = %token, "ignoring unparseable date token"),
        }
    }
    quarters
}

/// Whether a selection is complete enough to compute anything.
pub(crate) const fn selection_complete(dates: usize, firms: usize) -> bool {
    dates >= 2 && firms >= 1
}

/// Dashboard endpoint: run the pipeline fresh and return figure payloads.
pub(crate) async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    let Some(segment_name) = query.segment.clone() else {
        tracing::warn!("dashboard request without a segment");
        return empty_response(String::new());
    };
    let segment = match state.config.segment(&segment_name) {
        Ok(segment) => segment.clone(),
        Err(error) => {
            tracing::warn!(segment = %segment_name, %error, "ignoring unknown segment");
            return empty_response(segment_name);
        }
    };

    let quarters = parse_quarters(&split_list(query.dates.as_deref()));
    let firms = split_list(query.firms.as_deref());
    if !selection_complete(quarters.len(), firms.len()) {
        return empty_response(segment_name);
    }

    let selection = Selection::firms(firms);
    let result = tokio::task::spawn_blocking(move || {
        dashboard_figures(&segment, &quarters, &selection, &DashboardView::WEB)
    })
    .await;

    match result {
        Ok(Ok(views)) => {
            let views = views
                .into_iter()
                .map(|view_figures| ViewPayload {
                    view: view_figures.view.slug().to_string(),
                    label: view_figures.view.label().to_string(),
                    figures: view_figures.figures,
                })
                .collect();
            Json(DashboardResponse {
                segment: segment_name,
                views,
            })
            .into_response()
        }
        Ok(Err(error)) => {
            tracing::error!(%error, "dashboard pipeline failed");
            (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response()
        }
        Err(error) => {
            tracing::error!(%error, "dashboard task panicked");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn empty_response(segment: String) -> axum::response::Response {
    Json(DashboardResponse {
        segment,
        views: Vec::new(),
    })
    .into_response()
}
