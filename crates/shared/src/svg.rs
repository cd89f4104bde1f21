//! Serialize a [`Scene`] to a standalone SVG document.
//!
//! The browser draws the same scene as live elements; this string form backs
//! `GET /api/render.svg` and the `defs` block injected into the live map.

use crate::heat::{self, HeatScale};
use crate::projection::fmt_coord;
use crate::render::{Scene, Shape, Variant, DOT_PATTERN_DENSE_ID, DOT_PATTERN_ID};

/// Id of the `<linearGradient>` used by the heat legend.
pub const LEGEND_GRADIENT_ID: &str = "heat-legend-gradient";

const LABEL_FONT_SIZE: f64 = 10.0;

/// `<pattern>` definitions for the dot-pattern fills.
pub fn pattern_defs() -> String {
    let mut defs = String::with_capacity(512);
    push_dot_pattern(&mut defs, DOT_PATTERN_ID, 6.0, 1.2, "#8fb3c9");
    push_dot_pattern(&mut defs, DOT_PATTERN_DENSE_ID, 4.0, 1.4, "#d6ecf5");
    defs
}

fn push_dot_pattern(defs: &mut String, id: &str, tile: f64, radius: f64, color: &str) {
    let c = tile / 2.0;
    defs.push_str(&format!(
        r##"<pattern id="{id}" width="{tile}" height="{tile}" patternUnits="userSpaceOnUse"><rect width="{tile}" height="{tile}" fill="#1b2631"/><circle cx="{c}" cy="{c}" r="{radius}" fill="{color}"/></pattern>"##
    ));
}

/// Horizontal low-to-high gradient matching [`HeatScale::default`].
pub fn legend_gradient_def() -> String {
    let scale = HeatScale::default();
    format!(
        r#"<linearGradient id="{LEGEND_GRADIENT_ID}" x1="0" y1="0" x2="1" y2="0"><stop offset="0%" stop-color="{}"/><stop offset="100%" stop-color="{}"/></linearGradient>"#,
        scale.low, scale.high
    )
}

/// Everything a scene of `variant` references from `<defs>`.
pub fn defs_for(variant: Variant) -> String {
    match variant {
        Variant::DotPattern => pattern_defs(),
        Variant::Heat => legend_gradient_def(),
    }
}

pub fn write_svg(scene: &Scene) -> String {
    let mut svg = String::with_capacity(256 + scene.shapes.len() * 512);
    let w = fmt_coord(scene.width);
    let h = fmt_coord(scene.height);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" data-variant="{}">"#,
        scene.variant
    ));
    svg.push_str("<defs>");
    svg.push_str(&defs_for(scene.variant));
    svg.push_str("</defs>");

    for shape in &scene.shapes {
        push_shape(&mut svg, shape);
    }
    if scene.variant == Variant::Heat {
        for shape in &scene.shapes {
            push_label(&mut svg, shape);
        }
        push_legend(&mut svg, scene.width, scene.height);
    }

    svg.push_str("</svg>");
    svg
}

fn push_shape(svg: &mut String, shape: &Shape) {
    svg.push_str(&format!(
        r#"<path d="{}" data-feature="{}" fill="{}" stroke="{}" stroke-width="{}" opacity="{}""#,
        shape.path,
        shape.id,
        escape_xml(&shape.fill.to_string()),
        escape_xml(&shape.stroke),
        shape.stroke_width,
        shape.opacity
    ));
    match &shape.tooltip {
        Some(tip) => svg.push_str(&format!("><title>{}</title></path>", escape_xml(tip))),
        None => svg.push_str("/>"),
    }
}

fn push_label(svg: &mut String, shape: &Shape) {
    let (Some(name), Some((x, y))) = (&shape.name, shape.label_anchor) else {
        return;
    };
    svg.push_str(&format!(
        r#"<text x="{}" y="{}" fill="white" font-size="{LABEL_FONT_SIZE}" text-anchor="middle" dominant-baseline="central" pointer-events="none">{}</text>"#,
        fmt_coord(x),
        fmt_coord(y),
        escape_xml(name)
    ));
}

fn push_legend(svg: &mut String, width: f64, height: f64) {
    let bar_w = (width * 0.25).min(200.0);
    let bar_h = 10.0;
    let x = width - bar_w - 16.0;
    let y = height - bar_h - 24.0;
    svg.push_str(&format!(
        r#"<g class="heat-legend"><rect x="{}" y="{}" width="{}" height="{bar_h}" fill="url(#{LEGEND_GRADIENT_ID})" stroke="{}"/>"#,
        fmt_coord(x),
        fmt_coord(y),
        fmt_coord(bar_w),
        heat::BORDER_COLOR
    ));
    let text_y = fmt_coord(y + bar_h + 12.0);
    svg.push_str(&format!(
        r#"<text x="{}" y="{text_y}" fill="white" font-size="{LABEL_FONT_SIZE}">Low</text><text x="{}" y="{text_y}" fill="white" font-size="{LABEL_FONT_SIZE}" text-anchor="end">High</text></g>"#,
        fmt_coord(x),
        fmt_coord(x + bar_w)
    ));
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tests::two_squares;
    use crate::document::FeatureId;
    use crate::models::{DistrictValue, MapData};
    use crate::projection::ViewTransform;
    use crate::render::render;
    use crate::selection::InteractionState;

    fn scene(variant: Variant, click: Option<FeatureId>) -> Scene {
        let doc = two_squares();
        let t = ViewTransform::fit(&doc.bounds().unwrap(), 800.0, 400.0).unwrap();
        let mut s = InteractionState::new(variant.selection_mode());
        if let Some(id) = click {
            s.click(id);
        }
        let values = MapData {
            districts: vec![DistrictValue { name: "R2".into(), value: 40.0 }],
        }
        .value_index();
        render(&doc, &t, &s, variant, Some(&values))
    }

    #[test]
    fn test_dots_document_shape() {
        let svg = write_svg(&scene(Variant::DotPattern, None));
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"800\" height=\"400\""));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"<pattern id="dot-tile""#));
        assert!(svg.contains(r#"fill="url(#dot-tile)""#));
        assert_eq!(svg.matches("<path ").count(), 2);
        assert!(!svg.contains("heat-legend"));
    }

    #[test]
    fn test_selected_path_written_last() {
        let svg = write_svg(&scene(Variant::DotPattern, Some(FeatureId::new(0, 0))));
        let r1 = svg.find(r#"data-feature="0:0""#).unwrap();
        let r2 = svg.find(r#"data-feature="0:1""#).unwrap();
        assert!(r2 < r1);
    }

    #[test]
    fn test_heat_has_labels_tooltips_and_legend() {
        let svg = write_svg(&scene(Variant::Heat, None));
        assert!(svg.contains("<title>R2: 40%</title>"));
        assert!(svg.contains(">R1</text>"));
        assert!(svg.contains(r#"fill="url(#heat-legend-gradient)""#));
        assert!(svg.contains(">Low</text>"));
        assert!(svg.contains(">High</text>"));
        assert!(svg.contains(r##"stop-color="#e0f3f8""##));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml(r#"A & B <"x">"#), "A &amp; B &lt;&quot;x&quot;&gt;");
        assert_eq!(escape_xml("Puri"), "Puri");
    }
}
