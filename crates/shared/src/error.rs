use std::fmt;

/// Why a boundary document could not be turned into drawable features.
#[derive(Debug)]
pub enum DocumentError {
    /// The text is not valid JSON, or does not have the expected shape.
    Json(serde_json::Error),
    /// The GeoJSON parser rejected the document.
    #[cfg(feature = "geojson-input")]
    GeoJson(geojson::Error),
    /// A TopoJSON geometry references an arc that does not exist.
    ArcOutOfRange { index: i64, arc_count: usize },
    /// The document declares a type we cannot draw (e.g. a bare `Point`).
    Unsupported(String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Json(e) => write!(f, "invalid boundary JSON: {e}"),
            #[cfg(feature = "geojson-input")]
            DocumentError::GeoJson(e) => write!(f, "invalid GeoJSON: {e}"),
            DocumentError::ArcOutOfRange { index, arc_count } => write!(
                f,
                "arc index {index} out of range (document has {arc_count} arcs)"
            ),
            DocumentError::Unsupported(kind) => write!(f, "unsupported document type: {kind}"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::Json(e) => Some(e),
            #[cfg(feature = "geojson-input")]
            DocumentError::GeoJson(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(e: serde_json::Error) -> Self {
        DocumentError::Json(e)
    }
}

#[cfg(feature = "geojson-input")]
impl From<geojson::Error> for DocumentError {
    fn from(e: geojson::Error) -> Self {
        DocumentError::GeoJson(e)
    }
}
