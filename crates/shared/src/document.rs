use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::DocumentError;
use crate::projection::Bounds;
use crate::topo::{self, Topology};

/// An ordered sequence of `[longitude, latitude]` positions.
pub type Ring = Vec<[f64; 2]>;

/// Property keys that may hold a region's display name, in priority order.
pub const NAME_KEYS: [&str; 4] = ["name", "Name", "DIST_NAME", "Dist_Name"];

/// Collection name used for GeoJSON input, which has no named objects.
pub const GEOJSON_COLLECTION: &str = "features";

/// Stable identity of a feature: its collection and its position within it.
///
/// Reloading the same document produces the same ids, so selection survives
/// a reload instead of pointing at discarded objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId {
    pub collection: usize,
    pub index: usize,
}

impl FeatureId {
    pub fn new(collection: usize, index: usize) -> Self {
        FeatureId { collection, index }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.collection, self.index)
    }
}

impl FromStr for FeatureId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (c, i) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("expected <collection>:<index>, got {s:?}"))?;
        let collection = c.parse().map_err(|e| format!("bad collection in {s:?}: {e}"))?;
        let index = i.parse().map_err(|e| format!("bad index in {s:?}: {e}"))?;
        Ok(FeatureId { collection, index })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: FeatureId,
    pub properties: Map<String, Value>,
    pub polygons: Vec<Vec<Ring>>,
}

impl Feature {
    /// First present, non-empty name property, following [`NAME_KEYS`].
    pub fn display_name(&self) -> Option<String> {
        NAME_KEYS.iter().find_map(|key| match self.properties.get(*key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// The outer ring of the first polygon. Holes and further polygons of a
    /// multipolygon are not drawn.
    pub fn outer_ring(&self) -> Option<&Ring> {
        self.polygons.first()?.first().filter(|ring| !ring.is_empty())
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.polygons.iter().flatten().flatten())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub name: String,
    pub features: Vec<Feature>,
}

impl Collection {
    pub fn bounds(&self) -> Option<Bounds> {
        self.features
            .iter()
            .filter_map(Feature::bounds)
            .reduce(|a, b| a.union(&b))
    }
}

/// A parsed boundary file. Replaced wholesale on reload, never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryDocument {
    collections: Vec<Collection>,
}

#[derive(Deserialize)]
struct DocumentKind {
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl BoundaryDocument {
    /// Parse a boundary file. `Topology` documents (and untyped documents
    /// with an `objects` map) are decoded as TopoJSON; a `FeatureCollection`
    /// is decoded as GeoJSON into a single collection.
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        let kind: DocumentKind = serde_json::from_str(text)?;
        match kind.kind.as_deref() {
            Some("Topology") | None => {
                let topology: Topology = serde_json::from_str(text)?;
                Self::from_topology(&topology)
            }
            #[cfg(feature = "geojson-input")]
            Some("FeatureCollection") => {
                let geojson: geojson::GeoJson = text.parse()?;
                Self::from_geojson(geojson)
            }
            Some(other) => Err(DocumentError::Unsupported(other.to_string())),
        }
    }

    fn from_topology(topology: &Topology) -> Result<Self, DocumentError> {
        let arcs = topology.decode_arcs();
        let mut collections = Vec::with_capacity(topology.objects.len());
        for (c, (name, geometry)) in topology.objects.iter().enumerate() {
            let mut shapes = Vec::new();
            topo::collect_shapes(geometry, &arcs, &mut shapes)?;
            let features = shapes
                .into_iter()
                .enumerate()
                .map(|(i, shape)| Feature {
                    id: FeatureId::new(c, i),
                    properties: shape.properties,
                    polygons: shape.polygons,
                })
                .collect();
            collections.push(Collection {
                name: name.clone(),
                features,
            });
        }
        tracing::debug!(
            collections = collections.len(),
            arcs = arcs.len(),
            "decoded topology"
        );
        Ok(BoundaryDocument { collections })
    }

    #[cfg(feature = "geojson-input")]
    fn from_geojson(geojson: geojson::GeoJson) -> Result<Self, DocumentError> {
        let collection = match geojson {
            geojson::GeoJson::FeatureCollection(fc) => fc,
            _ => return Err(DocumentError::Unsupported("GeoJSON without features".into())),
        };
        let mut features = Vec::new();
        for feature in collection.features {
            let Some(geometry) = feature.geometry else {
                continue;
            };
            let polygons = geojson_polygons(&geometry.value);
            if polygons.is_empty() {
                continue;
            }
            features.push(Feature {
                id: FeatureId::new(0, features.len()),
                properties: feature.properties.unwrap_or_default(),
                polygons,
            });
        }
        Ok(BoundaryDocument {
            collections: vec![Collection {
                name: GEOJSON_COLLECTION.to_string(),
                features,
            }],
        })
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.collections.iter().flat_map(|c| c.features.iter())
    }

    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.collections.get(id.collection)?.features.get(id.index)
    }

    pub fn feature_count(&self) -> usize {
        self.collections.iter().map(|c| c.features.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_count() == 0
    }

    /// Union of the per-collection bounding boxes; `None` when the document
    /// holds no coordinates at all.
    pub fn bounds(&self) -> Option<Bounds> {
        self.collections
            .iter()
            .filter_map(Collection::bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Display name of a feature, if the feature exists and has one.
    pub fn display_name(&self, id: FeatureId) -> Option<String> {
        self.feature(id)?.display_name()
    }

    /// First feature whose display name equals `name`, ignoring ASCII case.
    pub fn find_by_name(&self, name: &str) -> Option<FeatureId> {
        self.features()
            .find(|f| {
                f.display_name()
                    .is_some_and(|n| n.eq_ignore_ascii_case(name.trim()))
            })
            .map(|f| f.id)
    }
}

#[cfg(feature = "geojson-input")]
fn geojson_polygons(value: &geojson::Value) -> Vec<Vec<Ring>> {
    fn ring(positions: &[Vec<f64>]) -> Ring {
        positions
            .iter()
            .filter(|p| p.len() >= 2)
            .map(|p| [p[0], p[1]])
            .collect()
    }
    fn polygon(rings: &[Vec<Vec<f64>>]) -> Vec<Ring> {
        rings.iter().map(|r| ring(r)).collect()
    }
    match value {
        geojson::Value::Polygon(rings) => vec![polygon(rings)],
        geojson::Value::MultiPolygon(polygons) => polygons.iter().map(|p| polygon(p)).collect(),
        geojson::Value::GeometryCollection(geometries) => geometries
            .iter()
            .flat_map(|g| geojson_polygons(&g.value))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two adjacent squares: R1 spans lon 0–10, R2 lon 10–20, both lat 0–10.
    pub(crate) const TWO_SQUARES: &str = r#"{
        "type": "Topology",
        "arcs": [
            [[10, 0], [0, 0], [0, 10], [10, 10]],
            [[10, 0], [10, 10]],
            [[10, 10], [20, 10], [20, 0], [10, 0]]
        ],
        "objects": {
            "districts": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "arcs": [[0, -2]], "properties": {"name": "R1"}},
                    {"type": "Polygon", "arcs": [[2, 1]], "properties": {"DIST_NAME": "R2"}}
                ]
            }
        }
    }"#;

    pub(crate) fn two_squares() -> BoundaryDocument {
        BoundaryDocument::from_json_str(TWO_SQUARES).unwrap()
    }

    #[test]
    fn test_topology_decodes_collections_and_ids() {
        let doc = two_squares();
        assert_eq!(doc.collections().len(), 1);
        assert_eq!(doc.collections()[0].name, "districts");
        assert_eq!(doc.feature_count(), 2);
        let r2 = doc.feature(FeatureId::new(0, 1)).unwrap();
        assert_eq!(r2.id, FeatureId::new(0, 1));
        assert_eq!(r2.display_name().as_deref(), Some("R2"));
    }

    #[test]
    fn test_shared_arc_is_stitched_both_ways() {
        let doc = two_squares();
        let r1 = doc.feature(FeatureId::new(0, 0)).unwrap().outer_ring().unwrap();
        assert_eq!(r1.first(), r1.last());
        assert_eq!(r1.len(), 5);
        let r2 = doc.feature(FeatureId::new(0, 1)).unwrap().outer_ring().unwrap();
        assert_eq!(
            r2,
            &vec![[10.0, 10.0], [20.0, 10.0], [20.0, 0.0], [10.0, 0.0], [10.0, 10.0]]
        );
    }

    #[test]
    fn test_document_bounds_union() {
        let b = two_squares().bounds().unwrap();
        assert_eq!((b.min_lon, b.min_lat, b.max_lon, b.max_lat), (0.0, 0.0, 20.0, 10.0));
    }

    #[test]
    fn test_bounds_span_all_collections() {
        let doc = BoundaryDocument::from_json_str(
            r#"{"type":"Topology",
                "arcs":[[[0,0],[1,0],[1,1],[0,0]],[[5,5],[9,5],[9,8],[5,5]]],
                "objects":{
                    "a":{"type":"Polygon","arcs":[[0]]},
                    "b":{"type":"GeometryCollection","geometries":[{"type":"Polygon","arcs":[[1]]}]}
                }}"#,
        )
        .unwrap();
        let b = doc.bounds().unwrap();
        assert_eq!((b.min_lon, b.min_lat, b.max_lon, b.max_lat), (0.0, 0.0, 9.0, 8.0));
        assert_eq!(doc.feature(FeatureId::new(1, 0)).unwrap().id, FeatureId::new(1, 0));
    }

    #[test]
    fn test_display_name_priority() {
        let mut props = Map::new();
        props.insert("Dist_Name".into(), "last".into());
        props.insert("DIST_NAME".into(), "third".into());
        props.insert("Name".into(), "".into());
        let mut f = Feature {
            id: FeatureId::new(0, 0),
            properties: props,
            polygons: vec![],
        };
        // Empty "Name" is skipped like a missing key.
        assert_eq!(f.display_name().as_deref(), Some("third"));
        f.properties.insert("name".into(), "first".into());
        assert_eq!(f.display_name().as_deref(), Some("first"));
    }

    #[test]
    fn test_display_name_missing() {
        let f = Feature {
            id: FeatureId::new(0, 0),
            properties: Map::new(),
            polygons: vec![],
        };
        assert!(f.display_name().is_none());
    }

    #[test]
    fn test_empty_document_has_no_bounds() {
        let doc = BoundaryDocument::from_json_str(r#"{"type":"Topology","objects":{},"arcs":[]}"#)
            .unwrap();
        assert!(doc.is_empty());
        assert!(doc.bounds().is_none());
        let untyped = BoundaryDocument::from_json_str("{}").unwrap();
        assert!(untyped.bounds().is_none());
    }

    #[test]
    fn test_bad_arc_rejects_document() {
        let err = BoundaryDocument::from_json_str(
            r#"{"type":"Topology","arcs":[],"objects":{"x":{"type":"Polygon","arcs":[[0]]}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DocumentError::ArcOutOfRange { .. }));
    }

    #[test]
    fn test_null_geometry_does_not_reject_document() {
        let doc = BoundaryDocument::from_json_str(
            r#"{"type":"Topology","arcs":[[[0,0],[1,0],[1,1],[0,0]]],"objects":{
                "districts":{"type":"GeometryCollection","geometries":[
                    {"type":"Polygon","arcs":[[0]],"properties":{"name":"Angul"}},
                    {"type":null,"properties":{"name":"Empty"}}
                ]}}}"#,
        )
        .unwrap();
        assert_eq!(doc.feature_count(), 1);
        assert!(doc.find_by_name("Angul").is_some());
        assert!(doc.find_by_name("Empty").is_none());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            BoundaryDocument::from_json_str("<html>").unwrap_err(),
            DocumentError::Json(_)
        ));
    }

    #[test]
    fn test_unsupported_type() {
        let err = BoundaryDocument::from_json_str(r#"{"type":"Point","coordinates":[1,2]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Point"));
    }

    #[test]
    fn test_geojson_feature_collection() {
        let doc = BoundaryDocument::from_json_str(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"Name":"Puri"},
                 "geometry":{"type":"Polygon","coordinates":[[[85,19],[86,19],[86,20],[85,19]]]}},
                {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[1,2]}},
                {"type":"Feature","properties":{"name":"Koraput"},
                 "geometry":{"type":"MultiPolygon","coordinates":[[[[82,18],[83,18],[83,19],[82,18]]]]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(doc.collections()[0].name, GEOJSON_COLLECTION);
        assert_eq!(doc.feature_count(), 2);
        assert_eq!(doc.display_name(FeatureId::new(0, 1)).as_deref(), Some("Koraput"));
        assert_eq!(doc.find_by_name("puri"), Some(FeatureId::new(0, 0)));
    }

    #[test]
    fn test_feature_id_parse_and_display() {
        let id: FeatureId = "2:17".parse().unwrap();
        assert_eq!(id, FeatureId::new(2, 17));
        assert_eq!(id.to_string(), "2:17");
        assert!("17".parse::<FeatureId>().is_err());
        assert!("a:1".parse::<FeatureId>().is_err());
    }
}
