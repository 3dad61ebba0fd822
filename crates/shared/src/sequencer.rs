use crate::models::{District, FocusPlan, Point, ViewState};

/// Screen-space distance beyond which a move counts as far away.
pub const FAR_AWAY_PX: f64 = 100.0;
/// Both ends of a move must be at least this zoomed in for a bounce.
const BOUNCE_MIN_ZOOM: f64 = 2.0;
/// Deepest intermediate zoom a bounce will pull out to.
const BOUNCE_FLOOR_ZOOM: f64 = 5.0;

const BOUNCE_OUT_MS: f64 = 800.0;
const BOUNCE_IN_MS: f64 = 600.0;
const DIRECT_MS: f64 = 1000.0;
const STROKE_MS: f64 = 900.0;

/// Stroke width at zoom 1; divided by the target zoom so outline weight
/// stays constant on screen.
pub const BASE_STROKE_WIDTH: f64 = 0.5;

/// One camera move for the renderer to animate.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationStep {
    pub center: Point,
    pub zoom: f64,
    pub duration_ms: f64,
}

/// Ordered camera steps plus the parallel stroke-width directive. The
/// stroke animation runs concurrently with the camera steps, not after
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub steps: Vec<AnimationStep>,
    pub stroke_width: f64,
    pub stroke_duration_ms: f64,
}

impl Transition {
    /// Non-animated jump straight to the plan target, for the very first
    /// layout when there is no current view to move from.
    pub fn immediate(plan: &FocusPlan) -> Self {
        Self {
            steps: vec![AnimationStep {
                center: plan.center,
                zoom: plan.zoom,
                duration_ms: 0.0,
            }],
            stroke_width: BASE_STROKE_WIDTH / plan.zoom,
            stroke_duration_ms: 0.0,
        }
    }
}

/// Decide how to get from the current view to the plan target.
///
/// Long moves between two zoomed-in views get a two-phase "zoom out, then
/// in" bounce so the viewer can re-orient; small in-place adjustments and
/// moves involving the overview go in a single step. `dampener` scales
/// every duration; 0 disables animation outright.
pub fn sequence(current: &ViewState, plan: &FocusPlan, dampener: f64) -> Transition {
    let diff_x = (plan.center.x - current.center.x).abs();
    let diff_y = (plan.center.y - current.center.y).abs();
    let diff_zoom = (plan.zoom - current.zoom).abs();
    let is_far_away = diff_x > FAR_AWAY_PX || diff_y > FAR_AWAY_PX;

    let bounce = diff_y != 0.0
        && current.zoom >= BOUNCE_MIN_ZOOM
        && plan.zoom >= BOUNCE_MIN_ZOOM
        && is_far_away;

    let steps = if bounce {
        // A lateral move between similar zoom levels pulls further out so
        // the viewer sees where they're going; otherwise pause at the
        // smaller of the two zooms.
        let middle = if plan.zoom > BOUNCE_FLOOR_ZOOM
            && diff_zoom < current.zoom.max(plan.zoom) / 2.0
        {
            (current.zoom / 2.0).min(BOUNCE_FLOOR_ZOOM)
        } else {
            current.zoom.min(plan.zoom)
        };
        vec![
            AnimationStep {
                center: plan.center,
                zoom: middle,
                duration_ms: BOUNCE_OUT_MS * dampener,
            },
            AnimationStep {
                center: plan.center,
                zoom: plan.zoom,
                duration_ms: BOUNCE_IN_MS * dampener,
            },
        ]
    } else {
        vec![AnimationStep {
            center: plan.center,
            zoom: plan.zoom,
            duration_ms: DIRECT_MS * dampener,
        }]
    };

    Transition {
        steps,
        stroke_width: BASE_STROKE_WIDTH / plan.zoom,
        stroke_duration_ms: STROKE_MS * dampener,
    }
}

/// Paint order with the focused set raised above everything else.
///
/// Returns indices into `districts`: unfocused districts first in load
/// order, then the focused set in load order, so focused paths are drawn
/// last and sit on top.
pub fn focus_paint_order(districts: &[District], focused: &[&str]) -> Vec<usize> {
    let is_focused = |i: usize| focused.iter().any(|name| *name == districts[i].name);
    let mut order: Vec<usize> = (0..districts.len()).filter(|&i| !is_focused(i)).collect();
    order.extend((0..districts.len()).filter(|&i| is_focused(i)));
    order
}
