use serde::{Deserialize, Deserializer, Serialize};

/// A point in projected screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Degenerate box containing a single point.
    pub fn of_point(p: Point) -> Self {
        Self { min: p, max: p }
    }

    /// Grow the box to contain `p`.
    pub fn extend(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn midpoint(&self) -> Point {
        Point {
            x: self.min.x + self.width() / 2.0,
            y: self.min.y + self.height() / 2.0,
        }
    }

    /// Point at the given fractions across the box; (0, 0) is the top-left
    /// corner, (1, 1) the bottom-right.
    pub fn fractional(&self, fx: f64, fy: f64) -> Point {
        Point {
            x: self.min.x + self.width() * fx,
            y: self.min.y + self.height() * fy,
        }
    }
}

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// One electorate: display name plus projected centroid and bounding box.
///
/// Built once from the loaded topology (and again after a resize, when the
/// projection changes); never mutated in between.
#[derive(Debug, Clone, PartialEq)]
pub struct District {
    pub name: String,
    pub centroid: Point,
    pub bounds: Bounds,
}

/// Explicit zoom from a marker config. Story authors write either a number
/// or a numeric string; anything else is treated as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkerZoom {
    Number(f64),
    Text(String),
}

impl MarkerZoom {
    /// Integer zoom level, or `None` for non-numeric or non-positive values.
    pub fn resolve(&self) -> Option<f64> {
        let raw = match self {
            MarkerZoom::Number(n) => Some(*n),
            MarkerZoom::Text(s) => s.trim().parse::<f64>().ok(),
        }?;
        let k = raw.trunc();
        if k.is_finite() && k > 0.0 {
            Some(k)
        } else {
            None
        }
    }
}

/// A narrative focus request, as it arrives from story config.
///
/// Consumed once per request; the controller keeps a copy of the most
/// recent one only so a resize can re-plan it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Marker {
    /// Electorate to focus on; `None` (or an unresolvable name) falls back
    /// to the national overview.
    pub electorate: Option<String>,
    /// Companion electorates labelled alongside the main one. Config allows
    /// a single name or a list.
    #[serde(rename = "and", deserialize_with = "string_or_list")]
    pub companions: Vec<String>,
    pub zoom: Option<MarkerZoom>,
    /// Hide the main label balloon while still zooming to the electorate.
    pub hide: bool,
}

impl Marker {
    /// Marker for a bare electorate focus (e.g. a map click).
    pub fn for_electorate(name: impl Into<String>) -> Self {
        Self {
            electorate: Some(name.into()),
            ..Self::default()
        }
    }

    /// Parse a marker from its story config JSON.
    pub fn from_config_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(name)) => vec![name],
        Some(OneOrMany::Many(names)) => names,
    })
}

/// The map camera. Center, zoom, and focus always change together, and only
/// the plan→sequence pipeline writes to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub center: Point,
    /// Always > 0.
    pub zoom: f64,
    /// Canonical name of the focused electorate; `None` exactly when the
    /// view is at the national overview.
    pub focused: Option<String>,
}

impl ViewState {
    /// The logical target of an accepted plan.
    pub fn from_plan(plan: &FocusPlan) -> Self {
        Self {
            center: plan.center,
            zoom: plan.zoom,
            focused: plan.main.as_ref().map(|d| d.name.clone()),
        }
    }
}

/// Computed camera target for a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusPlan {
    pub center: Point,
    pub zoom: f64,
    /// `None` for the overview plan.
    pub main: Option<District>,
    /// Resolved companions in marker order; unresolved entries stay `None`
    /// so positional label slots are preserved.
    pub companions: Vec<Option<District>>,
    pub render_main: bool,
    pub render_companions: bool,
}

impl FocusPlan {
    pub fn main_name(&self) -> Option<&str> {
        self.main.as_ref().map(|d| d.name.as_str())
    }

    /// True when applying this plan would leave the camera where it already
    /// is; the caller must then skip re-triggering the animation.
    pub fn matches(&self, view: &ViewState) -> bool {
        self.zoom == view.zoom && self.main_name() == view.focused.as_deref()
    }
}
