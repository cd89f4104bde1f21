use outage_shared::document::BoundaryDocument;
use outage_shared::models::MapData;
use wasm_bindgen::JsValue;

/// Boundary document served from the backend's public directory.
pub const BOUNDARY_PATH: &str = "/Odisha.json";
pub const MAPDATA_PATH: &str = "/api/mapdata";

/// Join an origin and an absolute path without doubling the slash.
pub fn build_url(origin: &str, path: &str) -> String {
    format!("{}/{}", origin.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn origin() -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    window
        .location()
        .origin()
        .map_err(|e: JsValue| format!("no page origin: {e:?}"))
}

/// Fetch a URL as text. Non-success statuses are errors.
async fn fetch_text(url: &str) -> Result<String, String> {
    let resp = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .map_err(|e| format!("{url}: {e}"))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(format!("{url}: HTTP {status}"));
    }
    resp.text().await.map_err(|e| format!("{url}: {e}"))
}

pub fn parse_boundary_document(text: &str) -> Result<BoundaryDocument, String> {
    BoundaryDocument::from_json_str(text).map_err(|e| format!("invalid boundary document: {e}"))
}

pub fn parse_map_data(text: &str) -> Result<MapData, String> {
    serde_json::from_str(text).map_err(|e| format!("invalid map data: {e}"))
}

pub async fn fetch_boundary_document() -> Result<BoundaryDocument, String> {
    let url = build_url(&origin()?, BOUNDARY_PATH);
    parse_boundary_document(&fetch_text(&url).await?)
}

pub async fn fetch_map_data() -> Result<MapData, String> {
    let url = build_url(&origin()?, MAPDATA_PATH);
    parse_map_data(&fetch_text(&url).await?)
}
