//! The render pass: document + view + interaction in, drawable shapes out.
//!
//! Nothing here touches a DOM or a file. The same [`Scene`] is turned into
//! an SVG string on the server and into live elements in the browser.

use std::fmt;
use std::str::FromStr;

use crate::document::{BoundaryDocument, FeatureId};
use crate::heat::{self, HeatScale};
use crate::models::ValueIndex;
use crate::projection::ViewTransform;
use crate::selection::{FeatureState, InteractionState, SelectionMode};

/// Pattern ids referenced by the dot-pattern fills; see [`crate::svg::pattern_defs`].
pub const DOT_PATTERN_ID: &str = "dot-tile";
pub const DOT_PATTERN_DENSE_ID: &str = "dot-tile-dense";

const DOT_STROKE: &str = "lightgoldenrodyellow";
const SELECTED_COLOR: &str = "red";
const HOVER_OUTLINE: &str = "white";
const HEAT_HOVER_OUTLINE: &str = "orange";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Stylized map filled with a repeating dot tile. Single selection.
    DotPattern,
    /// Choropleth shaded by per-district value. Multiple selection.
    Heat,
}

impl Variant {
    pub fn selection_mode(self) -> SelectionMode {
        match self {
            Variant::DotPattern => SelectionMode::Single,
            Variant::Heat => SelectionMode::Multi,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::DotPattern => "dots",
            Variant::Heat => "heat",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dots" | "dot" | "dot-pattern" => Ok(Variant::DotPattern),
            "heat" | "choropleth" => Ok(Variant::Heat),
            other => Err(format!("unknown map variant: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fill {
    /// Reference to a `<pattern>` by id.
    Pattern(&'static str),
    Color(String),
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fill::Pattern(id) => write!(f, "url(#{id})"),
            Fill::Color(c) => f.write_str(c),
        }
    }
}

/// One drawable region.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: FeatureId,
    pub path: String,
    pub fill: Fill,
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
    pub state: FeatureState,
    pub name: Option<String>,
    pub value: Option<f64>,
    pub tooltip: Option<String>,
    pub label_anchor: Option<(f64, f64)>,
}

/// Everything needed to draw one frame, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub variant: Variant,
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn shape(&self, id: FeatureId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }
}

/// Build the scene for a document. Pure: the output depends only on the
/// arguments. Only each feature's outer ring is drawn. Selected shapes are
/// moved to the end (painted on top), keeping document order otherwise.
pub fn render(
    document: &BoundaryDocument,
    transform: &ViewTransform,
    interaction: &InteractionState,
    variant: Variant,
    values: Option<&ValueIndex>,
) -> Scene {
    let scale = HeatScale::default();
    let mut shapes: Vec<Shape> = document
        .features()
        .filter_map(|feature| {
            let ring = feature.outer_ring()?;
            let path = transform.path_data(ring)?;
            let name = feature.display_name();
            let value = match (values, name.as_deref()) {
                (Some(values), Some(name)) => values.get(name),
                _ => None,
            };
            let state = interaction.state_of(feature.id);
            let style = match variant {
                Variant::DotPattern => dot_style(state),
                Variant::Heat => heat_style(state, value, &scale),
            };
            let tooltip = match (variant, name.as_deref(), value) {
                (Variant::Heat, Some(name), Some(value)) => Some(heat::tooltip(name, value)),
                (_, Some(name), _) => Some(name.to_string()),
                _ => None,
            };
            Some(Shape {
                id: feature.id,
                path,
                fill: style.fill,
                stroke: style.stroke,
                stroke_width: style.stroke_width,
                opacity: style.opacity,
                state,
                label_anchor: transform.label_anchor(ring),
                name,
                value,
                tooltip,
            })
        })
        .collect();

    // Stable: unselected keep their order, selected keep theirs.
    shapes.sort_by_key(|s| s.state == FeatureState::Selected);

    Scene {
        variant,
        width: transform.width,
        height: transform.height,
        shapes,
    }
}

struct Style {
    fill: Fill,
    stroke: String,
    stroke_width: f64,
    opacity: f64,
}

fn dot_style(state: FeatureState) -> Style {
    match state {
        FeatureState::Idle => Style {
            fill: Fill::Pattern(DOT_PATTERN_ID),
            stroke: DOT_STROKE.to_string(),
            stroke_width: 1.0,
            opacity: 0.85,
        },
        FeatureState::Hovered => Style {
            fill: Fill::Pattern(DOT_PATTERN_DENSE_ID),
            stroke: HOVER_OUTLINE.to_string(),
            stroke_width: 2.0,
            opacity: 1.0,
        },
        FeatureState::Selected => Style {
            fill: Fill::Color(SELECTED_COLOR.to_string()),
            stroke: SELECTED_COLOR.to_string(),
            stroke_width: 3.0,
            opacity: 1.0,
        },
    }
}

fn heat_style(state: FeatureState, value: Option<f64>, scale: &HeatScale) -> Style {
    let fill = match value {
        Some(v) => scale.color_for(v),
        None => heat::NO_DATA_COLOR,
    };
    let (stroke, stroke_width) = match state {
        FeatureState::Idle => (heat::BORDER_COLOR.to_string(), 1.0),
        FeatureState::Hovered => (HEAT_HOVER_OUTLINE.to_string(), 3.0),
        FeatureState::Selected => (SELECTED_COLOR.to_string(), 3.0),
    };
    Style {
        fill: Fill::Color(fill.to_string()),
        stroke,
        stroke_width,
        opacity: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tests::two_squares;
    use crate::models::{DistrictValue, MapData};

    const R1: FeatureId = FeatureId { collection: 0, index: 0 };
    const R2: FeatureId = FeatureId { collection: 0, index: 1 };

    fn setup(variant: Variant) -> (BoundaryDocument, ViewTransform, InteractionState) {
        let doc = two_squares();
        let t = ViewTransform::fit(&doc.bounds().unwrap(), 800.0, 400.0).unwrap();
        (doc, t, InteractionState::new(variant.selection_mode()))
    }

    #[test]
    fn test_one_shape_per_feature_in_document_order() {
        let (doc, t, s) = setup(Variant::DotPattern);
        let scene = render(&doc, &t, &s, Variant::DotPattern, None);
        assert_eq!(scene.shapes.len(), 2);
        assert_eq!(scene.shapes[0].id, R1);
        assert_eq!(scene.shapes[0].path, "M400,360L80,360L80,40L400,40L400,360Z");
        assert_eq!((scene.width, scene.height), (800.0, 400.0));
    }

    #[test]
    fn test_selected_drawn_last() {
        let (doc, t, mut s) = setup(Variant::Heat);
        s.click(R1);
        let scene = render(&doc, &t, &s, Variant::Heat, None);
        let order: Vec<FeatureId> = scene.shapes.iter().map(|s| s.id).collect();
        assert_eq!(order, vec![R2, R1]);
    }

    #[test]
    fn test_dot_styles_by_state() {
        let (doc, t, mut s) = setup(Variant::DotPattern);
        s.pointer_enter(R2);
        let scene = render(&doc, &t, &s, Variant::DotPattern, None);
        let r1 = scene.shape(R1).unwrap();
        assert_eq!(r1.fill, Fill::Pattern(DOT_PATTERN_ID));
        let r2 = scene.shape(R2).unwrap();
        assert_eq!(r2.fill.to_string(), "url(#dot-tile-dense)");
        assert_eq!(r2.stroke, "white");

        s.click(R1);
        let scene = render(&doc, &t, &s, Variant::DotPattern, None);
        assert_eq!(scene.shape(R1).unwrap().fill, Fill::Color("red".into()));
    }

    #[test]
    fn test_heat_fill_from_values() {
        let (doc, t, s) = setup(Variant::Heat);
        let values = MapData {
            districts: vec![DistrictValue { name: "r1".into(), value: 100.0 }],
        }
        .value_index();
        let scene = render(&doc, &t, &s, Variant::Heat, Some(&values));
        let r1 = scene.shape(R1).unwrap();
        assert_eq!(r1.fill, Fill::Color("#006699".into()));
        assert_eq!(r1.tooltip.as_deref(), Some("R1: 100%"));
        let r2 = scene.shape(R2).unwrap();
        assert_eq!(r2.fill, Fill::Color("#323c48".into()));
        assert_eq!(r2.tooltip.as_deref(), Some("R2"));
    }

    #[test]
    fn test_heat_outline_by_state() {
        let (doc, t, mut s) = setup(Variant::Heat);
        s.click(R1);
        s.pointer_enter(R2);
        let scene = render(&doc, &t, &s, Variant::Heat, None);
        assert_eq!(scene.shape(R1).unwrap().stroke, "red");
        assert_eq!(scene.shape(R2).unwrap().stroke, "orange");
        assert_eq!(scene.shape(R2).unwrap().stroke_width, 3.0);
    }

    #[test]
    fn test_render_is_pure() {
        let (doc, t, mut s) = setup(Variant::Heat);
        s.click(R2);
        let a = render(&doc, &t, &s, Variant::Heat, None);
        let b = render(&doc, &t, &s, Variant::Heat, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!("dots".parse::<Variant>().unwrap(), Variant::DotPattern);
        assert_eq!("Choropleth".parse::<Variant>().unwrap(), Variant::Heat);
        assert!("pie".parse::<Variant>().is_err());
        assert_eq!(Variant::Heat.to_string(), "heat");
    }
}
