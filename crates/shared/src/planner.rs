use crate::index::ElectorateIndex;
use crate::models::{Bounds, District, FocusPlan, Marker, Point, Viewport};

/// Viewport width below which the narrow (mobile) rules apply.
pub const NARROW_WIDTH: f64 = 440.0;
/// Lower bound of the wide tier; at or above this no crowding overrides
/// apply.
pub const WIDE_WIDTH: f64 = 1000.0;

/// Zoom for the national overview.
pub const OVERVIEW_ZOOM: f64 = 0.8;
/// Extra overview zoom on narrow screens.
const NARROW_OVERVIEW_FACTOR: f64 = 1.55;
/// Rightward bias of the overview center as a fraction of viewport width.
/// The projection doesn't sit dead-center at overview scale.
const OVERVIEW_X_BIAS: f64 = 0.05;

/// Default zoom for a focused electorate (tuned against Brisbane).
pub const DEFAULT_FOCUS_ZOOM: f64 = 50.0;
/// Cap for click-triggered fit zoom, so tiny inner-city seats don't blow up.
const MAX_FIT_ZOOM: f64 = 50.0;
/// Fraction of the viewport a click-fitted electorate should fill.
const FIT_FRACTION: f64 = 0.8;

/// What initiated a focus request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTrigger {
    /// A story marker or programmatic request.
    Marker,
    /// A direct click on the map.
    Click,
}

/// Width tier for the crowding overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthTier {
    Narrow,
    Mid,
    Wide,
}

impl WidthTier {
    pub fn of(width: f64) -> Self {
        if width < NARROW_WIDTH {
            WidthTier::Narrow
        } else if width < WIDE_WIDTH {
            WidthTier::Mid
        } else {
            WidthTier::Wide
        }
    }
}

/// Known label-crowding cases on smaller screens, keyed by main electorate
/// and optionally its first companion. Applies only when the marker carries
/// companions.
struct CrowdingRule {
    main: &'static str,
    first_companion: Option<&'static str>,
    tier: WidthTier,
    render_main: bool,
    render_companions: bool,
}

const CROWDING_RULES: &[CrowdingRule] = &[
    CrowdingRule {
        main: "sydney",
        first_companion: Some("chifley"),
        tier: WidthTier::Narrow,
        render_main: true,
        render_companions: false,
    },
    CrowdingRule {
        main: "griffith",
        first_companion: None,
        tier: WidthTier::Narrow,
        render_main: false,
        render_companions: false,
    },
    CrowdingRule {
        main: "maranoa",
        first_companion: None,
        tier: WidthTier::Narrow,
        render_main: true,
        render_companions: false,
    },
    CrowdingRule {
        main: "griffith",
        first_companion: None,
        tier: WidthTier::Mid,
        render_main: false,
        render_companions: false,
    },
];

fn crowding_flags(
    main: &District,
    companions: &[Option<District>],
    tier: WidthTier,
) -> (bool, bool) {
    if companions.is_empty() {
        return (true, true);
    }
    let main_name = main.name.to_lowercase();
    let first = companions
        .first()
        .and_then(|c| c.as_ref())
        .map(|d| d.name.to_lowercase());
    for rule in CROWDING_RULES {
        if rule.tier != tier || rule.main != main_name {
            continue;
        }
        if let Some(want) = rule.first_companion {
            if first.as_deref() != Some(want) {
                continue;
            }
        }
        return (rule.render_main, rule.render_companions);
    }
    (true, true)
}

/// The overview plan: the whole country, nothing focused.
pub fn overview_plan(viewport: Viewport) -> FocusPlan {
    let zoom = if viewport.width < NARROW_WIDTH {
        OVERVIEW_ZOOM * NARROW_OVERVIEW_FACTOR
    } else {
        OVERVIEW_ZOOM
    };
    FocusPlan {
        center: Point {
            x: viewport.width / 2.0 + viewport.width * OVERVIEW_X_BIAS,
            y: viewport.height / 2.0,
        },
        zoom,
        main: None,
        companions: Vec::new(),
        render_main: true,
        render_companions: true,
    }
}

/// Compute the camera target for a marker.
///
/// An absent marker, or one whose electorate doesn't resolve, yields the
/// overview plan; a typo'd story marker degrades gracefully instead of
/// failing.
pub fn plan(
    index: &ElectorateIndex,
    marker: Option<&Marker>,
    viewport: Viewport,
    trigger: FocusTrigger,
) -> FocusPlan {
    let Some(marker) = marker else {
        return overview_plan(viewport);
    };
    let Some(main) = index.resolve_opt(marker.electorate.as_deref()).cloned() else {
        return overview_plan(viewport);
    };

    // Companions that fail to resolve stay None so their positional label
    // slot is preserved.
    let companions: Vec<Option<District>> = marker
        .companions
        .iter()
        .map(|name| index.resolve(name).cloned())
        .collect();

    let tier = WidthTier::of(viewport.width);
    let (render_main, render_companions) = crowding_flags(&main, &companions, tier);

    let center = focus_center(&main, &companions);

    let mut zoom = match marker.zoom.as_ref().and_then(|z| z.resolve()) {
        Some(k) => k,
        None if trigger == FocusTrigger::Click => fit_zoom(&main, viewport),
        None => DEFAULT_FOCUS_ZOOM,
    };
    // Zoom in a bit further on narrow screens.
    if viewport.width < NARROW_WIDTH {
        zoom += zoom / 4.0;
    }

    FocusPlan {
        center,
        zoom,
        main: Some(main),
        companions,
        render_main,
        render_companions,
    }
}

/// Midpoint of the bbox enclosing the main and resolved companion
/// centroids: min/max over the centroid points, not the union geometry.
/// With no resolved companions this collapses to the main centroid.
fn focus_center(main: &District, companions: &[Option<District>]) -> Point {
    let mut bounds = Bounds::of_point(main.centroid);
    for companion in companions.iter().flatten() {
        bounds.extend(companion.centroid);
    }
    bounds.midpoint()
}

/// Zoom that fits the electorate's bounding box to `FIT_FRACTION` of the
/// viewport in the constraining dimension.
fn fit_zoom(district: &District, viewport: Viewport) -> f64 {
    let wide = district.bounds.width() / viewport.width;
    let tall = district.bounds.height() / viewport.height;
    (FIT_FRACTION / wide.max(tall)).min(MAX_FIT_ZOOM)
}
