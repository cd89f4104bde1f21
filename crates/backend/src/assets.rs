use outage_shared::document::BoundaryDocument;
use outage_shared::models::{DistrictValue, MapData};
use std::path::Path;

/// Data loaded once at startup and shared read-only between requests.
pub struct Assets {
    /// `None` when the boundary file is missing or malformed; the static
    /// file is still served as-is and the snapshot endpoint reports 503.
    pub boundary: Option<BoundaryDocument>,
    pub map_data: MapData,
}

impl Assets {
    pub fn load(assets_dir: &Path, boundary_file: &str, mapdata_file: Option<&Path>) -> Self {
        let boundary = match load_boundary(&assets_dir.join(boundary_file)) {
            Ok(doc) => {
                tracing::info!(
                    file = boundary_file,
                    collections = doc.collections().len(),
                    features = doc.feature_count(),
                    "Loaded boundary document"
                );
                Some(doc)
            }
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        };

        let map_data = match mapdata_file.map(load_map_data) {
            Some(Ok(data)) => data,
            Some(Err(e)) => {
                tracing::warn!("{e}; serving sample values");
                sample_map_data()
            }
            None => sample_map_data(),
        };
        tracing::info!(districts = map_data.districts.len(), "Loaded map values");

        Assets { boundary, map_data }
    }
}

fn load_boundary(path: &Path) -> Result<BoundaryDocument, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    BoundaryDocument::from_json_str(&text)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

/// A `.csv` file is read as a table with `name` and `value` columns (extra
/// columns are ignored); anything else is read as `{"districts":[...]}` JSON.
fn load_map_data(path: &Path) -> Result<MapData, String> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        return load_map_data_csv(path);
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

fn load_map_data_csv(path: &Path) -> Result<MapData, String> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let districts = reader
        .deserialize::<DistrictValue>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
    Ok(MapData { districts })
}

/// Outage percentages served until a real feed exists. Jharsuguda appears
/// twice; lookups take the first entry.
pub fn sample_map_data() -> MapData {
    const SAMPLE: [(&str, f64); 28] = [
        ("Kendrapara", 75.0),
        ("Jajpur", 85.0),
        ("Khordha", 65.0),
        ("Puri", 90.0),
        ("Cuttack", 80.0),
        ("Bhadrak", 70.0),
        ("Mayurbhanj", 60.0),
        ("Kalahandi", 55.0),
        ("Boudh", 45.0),
        ("Gajapati", 35.0),
        ("Rayagada", 40.0),
        ("Nabarangpur", 50.0),
        ("Koraput", 45.0),
        ("Malkangiri", 30.0),
        ("Kandhamal", 40.0),
        ("Bargarh", 55.0),
        ("Sambalpur", 65.0),
        ("Jharsuguda", 70.0),
        ("Deogarh", 60.0),
        ("Sundargarh", 55.0),
        ("Jharsuguda", 70.0),
        ("Jagatsinghpur", 80.0),
        ("Nayagarh", 75.0),
        ("Angul", 65.0),
        ("Dhenkanal", 70.0),
        ("Kendujhar", 60.0),
        ("Sonepur", 55.0),
        ("Bolangir", 50.0),
    ];
    MapData {
        districts: SAMPLE
            .iter()
            .map(|(name, value)| DistrictValue {
                name: name.to_string(),
                value: *value,
            })
            .collect(),
    }
}
