/// Fraction of the limiting viewport dimension the map is allowed to fill.
pub const FILL_FACTOR: f64 = 0.8;

/// Axis-aligned geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    /// Smallest box containing every finite point; `None` if there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a [f64; 2]>) -> Option<Self> {
        let mut bounds: Option<Bounds> = None;
        for &[lon, lat] in points {
            if !lon.is_finite() || !lat.is_finite() {
                continue;
            }
            bounds = Some(match bounds {
                None => Bounds {
                    min_lon: lon,
                    min_lat: lat,
                    max_lon: lon,
                    max_lat: lat,
                },
                Some(b) => Bounds {
                    min_lon: b.min_lon.min(lon),
                    min_lat: b.min_lat.min(lat),
                    max_lon: b.max_lon.max(lon),
                    max_lat: b.max_lat.max(lat),
                },
            });
        }
        bounds
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

/// Uniform scale + translate from geographic to screen coordinates.
///
/// Latitude grows upwards while screen Y grows downwards, so Y is measured
/// from the top of the bounding box (`origin_lat` is its max latitude).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub origin_lon: f64,
    pub origin_lat: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewTransform {
    /// Fit `bounds` into a `width` x `height` viewport, centered, using
    /// [`FILL_FACTOR`] of the limiting dimension.
    ///
    /// Returns `None` for a degenerate box (zero width or height) or an
    /// unusable viewport; callers skip rendering in that case.
    pub fn fit(bounds: &Bounds, width: f64, height: f64) -> Option<Self> {
        let geo_width = bounds.width();
        let geo_height = bounds.height();
        if !(geo_width > 0.0 && geo_height > 0.0) {
            return None;
        }
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return None;
        }

        let scale = (width / geo_width).min(height / geo_height) * FILL_FACTOR;
        if !(scale.is_finite() && scale > 0.0) {
            return None;
        }

        Some(ViewTransform {
            scale,
            translate_x: (width - geo_width * scale) / 2.0,
            translate_y: (height - geo_height * scale) / 2.0,
            origin_lon: bounds.min_lon,
            origin_lat: bounds.max_lat,
            width,
            height,
        })
    }

    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            (lon - self.origin_lon) * self.scale + self.translate_x,
            (self.origin_lat - lat) * self.scale + self.translate_y,
        )
    }

    /// SVG path data for a ring: `M x,y L x,y ... Z`. `None` for an empty ring.
    pub fn path_data(&self, ring: &[[f64; 2]]) -> Option<String> {
        let (first, rest) = ring.split_first()?;
        let mut d = String::with_capacity(ring.len() * 16);
        let (x, y) = self.project(first[0], first[1]);
        d.push_str(&format!("M{},{}", fmt_coord(x), fmt_coord(y)));
        for p in rest {
            let (x, y) = self.project(p[0], p[1]);
            d.push_str(&format!("L{},{}", fmt_coord(x), fmt_coord(y)));
        }
        d.push('Z');
        Some(d)
    }

    /// Screen-space center of a ring's bounding box, used to anchor labels.
    pub fn label_anchor(&self, ring: &[[f64; 2]]) -> Option<(f64, f64)> {
        let b = Bounds::from_points(ring)?;
        Some(self.project(
            (b.min_lon + b.max_lon) / 2.0,
            (b.min_lat + b.max_lat) / 2.0,
        ))
    }
}

/// Two decimals is sub-pixel precision; trailing zeros are dropped.
pub(crate) fn fmt_coord(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
