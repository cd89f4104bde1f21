use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use outage_shared::document::FeatureId;
use outage_shared::models::MapData;
use outage_shared::projection::ViewTransform;
use outage_shared::render::{render, Variant};
use outage_shared::selection::InteractionState;
use outage_shared::svg::write_svg;

use crate::assets::Assets;
use crate::config::CACHE_NONE;

pub const DEFAULT_SNAPSHOT_WIDTH: f64 = 800.0;
pub const DEFAULT_SNAPSHOT_HEIGHT: f64 = 600.0;
pub const MAX_SNAPSHOT_SIDE: f64 = 4096.0;

pub async fn map_data(State(assets): State<Arc<Assets>>) -> Json<MapData> {
    Json(assets.map_data.clone())
}

#[derive(Debug, Default, Deserialize)]
pub struct SnapshotParams {
    pub variant: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Comma-separated feature ids (`collection:index`), applied as clicks
    /// in order.
    pub select: Option<String>,
}

fn side(value: Option<f64>, default: f64) -> f64 {
    value
        .filter(|v| v.is_finite())
        .unwrap_or(default)
        .clamp(1.0, MAX_SNAPSHOT_SIDE)
}

fn parse_selection(raw: &str) -> Result<Vec<FeatureId>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<FeatureId>())
        .collect()
}

/// Server-side rendering of the same scene the browser draws.
pub async fn render_svg(
    State(assets): State<Arc<Assets>>,
    Query(params): Query<SnapshotParams>,
) -> Response {
    let Some(document) = assets.boundary.as_ref() else {
        return (StatusCode::SERVICE_UNAVAILABLE, "boundary document not loaded").into_response();
    };

    let variant = match params.variant.as_deref() {
        Some(v) => match v.parse::<Variant>() {
            Ok(v) => v,
            Err(e) => return (StatusCode::BAD_REQUEST, e).into_response(),
        },
        None => Variant::DotPattern,
    };

    let selection = match params.select.as_deref().map(parse_selection) {
        Some(Ok(ids)) => ids,
        Some(Err(e)) => return (StatusCode::BAD_REQUEST, e).into_response(),
        None => Vec::new(),
    };

    let width = side(params.width, DEFAULT_SNAPSHOT_WIDTH);
    let height = side(params.height, DEFAULT_SNAPSHOT_HEIGHT);
    let Some(transform) = document
        .bounds()
        .and_then(|b| ViewTransform::fit(&b, width, height))
    else {
        return (StatusCode::UNPROCESSABLE_ENTITY, "boundary document has no extent")
            .into_response();
    };

    let mut interaction = InteractionState::new(variant.selection_mode());
    for id in selection {
        if document.feature(id).is_some() {
            interaction.click(id);
        } else {
            tracing::debug!(%id, "ignoring unknown feature in snapshot selection");
        }
    }

    let values = assets.map_data.value_index();
    let scene = render(document, &transform, &interaction, variant, Some(&values));
    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, CACHE_NONE),
        ],
        write_svg(&scene),
    )
        .into_response()
}
