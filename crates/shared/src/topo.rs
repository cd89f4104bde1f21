//! TopoJSON wire types and arc decoding.
//!
//! Geometries in a topology do not carry coordinates; they reference shared
//! arcs by index. A negative index `i` means arc `!i` walked backwards. When
//! the topology is quantized, arc positions are delta-encoded integers that
//! must be accumulated and then scaled by the top-level `transform`.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::document::Ring;
use crate::error::DocumentError;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Topology {
    #[serde(default)]
    pub objects: BTreeMap<String, TopoGeometry>,
    #[serde(default)]
    pub arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    pub transform: Option<TopoTransform>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct TopoTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawGeometry")]
pub(crate) enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        properties: Option<Map<String, Value>>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        properties: Option<Map<String, Value>>,
    },
    /// Null or non-polygonal geometry.
    Other,
}

/// Wire form of a geometry. `type` may be `null`, which a tagged enum
/// cannot express.
#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    geometries: Vec<TopoGeometry>,
    #[serde(default)]
    arcs: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

impl TryFrom<RawGeometry> for TopoGeometry {
    type Error = serde_json::Error;

    fn try_from(raw: RawGeometry) -> Result<Self, Self::Error> {
        let arcs = raw.arcs.unwrap_or_else(|| Value::Array(Vec::new()));
        Ok(match raw.kind.as_deref() {
            Some("GeometryCollection") => TopoGeometry::GeometryCollection {
                geometries: raw.geometries,
            },
            Some("Polygon") => TopoGeometry::Polygon {
                arcs: serde_json::from_value(arcs)?,
                properties: raw.properties,
            },
            Some("MultiPolygon") => TopoGeometry::MultiPolygon {
                arcs: serde_json::from_value(arcs)?,
                properties: raw.properties,
            },
            _ => TopoGeometry::Other,
        })
    }
}

/// A polygonal geometry resolved to absolute coordinates.
pub(crate) struct DecodedShape {
    pub properties: Map<String, Value>,
    pub polygons: Vec<Vec<Ring>>,
}

impl Topology {
    /// Resolve every arc to absolute `[lon, lat]` positions.
    pub fn decode_arcs(&self) -> Vec<Ring> {
        self.arcs
            .iter()
            .map(|arc| {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| match self.transform {
                        Some(t) => {
                            x += p[0];
                            y += p[1];
                            [
                                x * t.scale[0] + t.translate[0],
                                y * t.scale[1] + t.translate[1],
                            ]
                        }
                        None => [p[0], p[1]],
                    })
                    .collect()
            })
            .collect()
    }
}

/// Flatten a (possibly nested) geometry into its polygonal shapes.
/// Non-polygonal members are skipped.
pub(crate) fn collect_shapes(
    geometry: &TopoGeometry,
    arcs: &[Ring],
    out: &mut Vec<DecodedShape>,
) -> Result<(), DocumentError> {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_shapes(g, arcs, out)?;
            }
        }
        TopoGeometry::Polygon { arcs: rings, properties } => {
            out.push(DecodedShape {
                properties: properties.clone().unwrap_or_default(),
                polygons: vec![stitch_polygon(rings, arcs)?],
            });
        }
        TopoGeometry::MultiPolygon { arcs: polygons, properties } => {
            let polygons = polygons
                .iter()
                .map(|rings| stitch_polygon(rings, arcs))
                .collect::<Result<Vec<_>, _>>()?;
            out.push(DecodedShape {
                properties: properties.clone().unwrap_or_default(),
                polygons,
            });
        }
        TopoGeometry::Other => {
            tracing::debug!("skipping non-polygonal topology geometry");
        }
    }
    Ok(())
}

fn stitch_polygon(rings: &[Vec<i64>], arcs: &[Ring]) -> Result<Vec<Ring>, DocumentError> {
    rings.iter().map(|indices| stitch_ring(indices, arcs)).collect()
}

/// Join the referenced arcs into one ring. Consecutive arcs share an
/// endpoint, so the first position of every arc after the first is dropped.
fn stitch_ring(indices: &[i64], arcs: &[Ring]) -> Result<Ring, DocumentError> {
    let mut ring: Ring = Vec::new();
    for &index in indices {
        let (arc_idx, reversed) = if index < 0 {
            ((!index) as usize, true)
        } else {
            (index as usize, false)
        };
        let arc = arcs.get(arc_idx).ok_or(DocumentError::ArcOutOfRange {
            index,
            arc_count: arcs.len(),
        })?;
        let mut points = arc.clone();
        if reversed {
            points.reverse();
        }
        let skip = usize::from(!ring.is_empty() && !points.is_empty());
        ring.extend(points.into_iter().skip(skip));
    }
    Ok(ring)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_arcs_without_transform() {
        let topo: Topology = serde_json::from_str(
            r#"{"type":"Topology","objects":{},"arcs":[[[0,0],[10,0],[10,10]]]}"#,
        )
        .unwrap();
        let arcs = topo.decode_arcs();
        assert_eq!(arcs[0], vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]);
    }

    #[test]
    fn test_decode_arcs_quantized_delta() {
        let topo: Topology = serde_json::from_str(
            r#"{"type":"Topology","objects":{},
                "transform":{"scale":[0.5,0.25],"translate":[80,20]},
                "arcs":[[[0,0],[4,0],[0,8],[-4,0]]]}"#,
        )
        .unwrap();
        let arcs = topo.decode_arcs();
        assert_eq!(
            arcs[0],
            vec![[80.0, 20.0], [82.0, 20.0], [82.0, 22.0], [80.0, 22.0]]
        );
    }

    #[test]
    fn test_stitch_ring_drops_shared_endpoints() {
        let arcs = vec![
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
            vec![[1.0, 1.0], [0.0, 1.0], [0.0, 0.0]],
        ];
        let ring = stitch_ring(&[0, 1], &arcs).unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_stitch_ring_negative_index_reverses() {
        let arcs = vec![vec![[0.0, 0.0], [5.0, 0.0]]];
        let ring = stitch_ring(&[-1], &arcs).unwrap();
        assert_eq!(ring, vec![[5.0, 0.0], [0.0, 0.0]]);
    }

    #[test]
    fn test_stitch_ring_out_of_range() {
        let arcs = vec![vec![[0.0, 0.0], [5.0, 0.0]]];
        let err = stitch_ring(&[0, 3], &arcs).unwrap_err();
        assert!(matches!(err, DocumentError::ArcOutOfRange { index: 3, arc_count: 1 }));
        let err = stitch_ring(&[-4], &arcs).unwrap_err();
        assert!(matches!(err, DocumentError::ArcOutOfRange { index: -4, .. }));
    }

    #[test]
    fn test_unknown_geometry_types_are_skipped() {
        let topo: Topology = serde_json::from_str(
            r#"{"type":"Topology","arcs":[[[0,0],[1,0],[1,1],[0,0]]],"objects":{
                "places":{"type":"GeometryCollection","geometries":[
                    {"type":"Point","coordinates":[3,4]},
                    {"type":"Polygon","arcs":[[0]],"properties":{"name":"A"}}
                ]}}}"#,
        )
        .unwrap();
        let arcs = topo.decode_arcs();
        let mut shapes = Vec::new();
        collect_shapes(&topo.objects["places"], &arcs, &mut shapes).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].properties["name"], "A");
    }

    #[test]
    fn test_null_geometry_is_an_empty_feature() {
        let topo: Topology = serde_json::from_str(
            r#"{"type":"Topology","arcs":[[[0,0],[1,0],[1,1],[0,0]]],"objects":{
                "districts":{"type":"GeometryCollection","geometries":[
                    {"type":"Polygon","arcs":[[0]],"properties":{"name":"A"}},
                    {"type":null,"properties":{"name":"Empty"}}
                ]}}}"#,
        )
        .unwrap();
        let arcs = topo.decode_arcs();
        let mut shapes = Vec::new();
        collect_shapes(&topo.objects["districts"], &arcs, &mut shapes).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].properties["name"], "A");
    }

    #[test]
    fn test_malformed_polygon_arcs_are_rejected() {
        let result: Result<Topology, _> = serde_json::from_str(
            r#"{"type":"Topology","arcs":[],"objects":{
                "d":{"type":"Polygon","arcs":"zero"}}}"#,
        );
        assert!(result.is_err());
    }
}
