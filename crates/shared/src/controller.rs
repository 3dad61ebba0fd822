use crate::index::ElectorateIndex;
use crate::labels::{LabelFormatter, LabelPool};
use crate::models::{District, FocusPlan, Marker, ViewState, Viewport};
use crate::planner::{self, FocusTrigger};
use crate::sequencer::{self, focus_paint_order, Transition};

/// Everything a renderer needs to react to an accepted focus request.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusUpdate {
    pub transition: Transition,
    /// Indices into `districts()` in the order paths should be painted.
    pub paint_order: Vec<usize>,
    /// Inverse zoom factor, passed to the embedding page's post-zoom
    /// callback for scaling strokes and legends.
    pub zoom_factor: f64,
}

/// Owns the camera and label state and runs the resolve → plan → sequence
/// pipeline.
///
/// The view is the single piece of shared state and this is its single
/// writer. It moves to the plan's logical target the moment a plan is
/// accepted, so a focus request that arrives mid-animation plans from the
/// in-flight target rather than whatever the renderer happens to be
/// interpolating. A new transition simply replaces the one playing;
/// last-writer-wins.
#[derive(Debug, Clone)]
pub struct MapController {
    index: ElectorateIndex,
    viewport: Viewport,
    view: Option<ViewState>,
    labels: LabelPool,
    active_marker: Option<Marker>,
}

impl MapController {
    pub fn new(districts: Vec<District>, viewport: Viewport) -> Self {
        Self {
            index: ElectorateIndex::new(districts),
            viewport,
            view: None,
            labels: LabelPool::new(),
            active_marker: None,
        }
    }

    /// Current camera, once the first focus has been applied.
    pub fn view(&self) -> Option<&ViewState> {
        self.view.as_ref()
    }

    pub fn labels(&self) -> &LabelPool {
        &self.labels
    }

    pub fn districts(&self) -> &[District] {
        self.index.districts()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Handle a focus request. Labels are always refreshed; `None` is
    /// returned when the camera is already at the target, in which case no
    /// animation may be triggered.
    pub fn focus(
        &mut self,
        marker: Option<&Marker>,
        trigger: FocusTrigger,
        dampener: f64,
        formatter: Option<&LabelFormatter>,
    ) -> Option<FocusUpdate> {
        let plan = planner::plan(&self.index, marker, self.viewport, trigger);

        let hide_main = marker.is_some_and(|m| m.hide);
        self.labels.apply(&plan, hide_main, formatter);
        self.active_marker = marker.cloned();

        // Don't re-trigger the animation when nothing would change.
        if let Some(view) = &self.view {
            if plan.matches(view) {
                return None;
            }
        }

        let transition = match &self.view {
            Some(view) => sequencer::sequence(view, &plan, dampener),
            None => Transition::immediate(&plan),
        };
        let paint_order = self.paint_order(&plan);
        let zoom_factor = 1.0 / plan.zoom;

        // Camera state moves to the logical target now; the renderer
        // catches up over the transition's duration.
        self.view = Some(ViewState::from_plan(&plan));

        Some(FocusUpdate {
            transition,
            paint_order,
            zoom_factor,
        })
    }

    /// True when the viewport actually changed; callers can use this to
    /// skip re-projecting districts for repeat resize events.
    pub fn needs_resize(&self, viewport: Viewport) -> bool {
        viewport != self.viewport
    }

    /// Apply a viewport change: take the freshly re-projected districts and
    /// re-plan the active marker without animation. Repeat events for
    /// unchanged dimensions are coalesced into nothing.
    pub fn resize(
        &mut self,
        viewport: Viewport,
        districts: Vec<District>,
        formatter: Option<&LabelFormatter>,
    ) -> Option<FocusUpdate> {
        if !self.needs_resize(viewport) {
            return None;
        }
        self.viewport = viewport;
        self.index = ElectorateIndex::new(districts);
        // The projected centroids moved even if zoom and focus did not, so
        // the re-plan must not be swallowed by the no-op guard.
        self.view = None;
        let marker = self.active_marker.clone();
        self.focus(marker.as_ref(), FocusTrigger::Marker, 0.0, formatter)
    }

    fn paint_order(&self, plan: &FocusPlan) -> Vec<usize> {
        let mut focused: Vec<&str> = Vec::new();
        if let Some(main) = plan.main_name() {
            focused.push(main);
        }
        if plan.render_companions {
            focused.extend(
                plan.companions
                    .iter()
                    .flatten()
                    .map(|d| d.name.as_str()),
            );
        }
        focus_paint_order(self.index.districts(), &focused)
    }
}
