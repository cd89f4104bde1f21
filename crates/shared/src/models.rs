use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictValue {
    pub name: String,
    pub value: f64,
}

/// Body of `GET /api/mapdata`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    #[serde(default)]
    pub districts: Vec<DistrictValue>,
}

impl MapData {
    pub fn value_index(&self) -> ValueIndex {
        ValueIndex::from_districts(&self.districts)
    }
}

/// District values keyed by normalized name (trimmed, ASCII-lowercased).
/// When a name appears twice, the first entry wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueIndex {
    values: HashMap<String, f64>,
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

impl ValueIndex {
    pub fn from_districts(districts: &[DistrictValue]) -> Self {
        let mut values = HashMap::with_capacity(districts.len());
        for d in districts {
            values.entry(normalize(&d.name)).or_insert(d.value);
        }
        ValueIndex { values }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(&normalize(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_data_deserializes() {
        let json = r#"{"districts":[{"name":"Puri","value":90},{"name":"Boudh","value":45.5}]}"#;
        let data: MapData = serde_json::from_str(json).unwrap();
        assert_eq!(data.districts.len(), 2);
        assert_eq!(data.districts[1].value, 45.5);
    }

    #[test]
    fn test_map_data_missing_districts_is_empty() {
        let data: MapData = serde_json::from_str("{}").unwrap();
        assert!(data.districts.is_empty());
    }

    #[test]
    fn test_value_index_first_entry_wins() {
        let data = MapData {
            districts: vec![
                DistrictValue { name: "Jharsuguda".into(), value: 70.0 },
                DistrictValue { name: "jharsuguda ".into(), value: 10.0 },
            ],
        };
        let index = data.value_index();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("JHARSUGUDA"), Some(70.0));
        assert_eq!(index.get("Puri"), None);
    }
}
