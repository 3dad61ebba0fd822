use crate::models::{District, FocusPlan, Point};

/// Companion label slots available besides the main one. Companions past
/// this cap are never labelled; the pool is fixed so focus changes rebind
/// existing balloons instead of churning render objects.
pub const COMPANION_SLOTS: usize = 8;

/// Labels are shrunk by this factor on top of the inverse-zoom scale.
const LABEL_SHRINK: f64 = 1.3;

/// Fractional bbox anchor for electorates whose centroid is a poor pin
/// position, usually because the seat is split over water. `None` keeps
/// the centroid on that axis.
struct AnchorOverride {
    name: &'static str,
    x_frac: Option<f64>,
    y_frac: Option<f64>,
}

const ANCHOR_OVERRIDES: &[AnchorOverride] = &[
    AnchorOverride {
        name: "bowman",
        x_frac: Some(0.2),
        y_frac: None,
    },
    AnchorOverride {
        name: "bonner",
        x_frac: Some(0.2),
        y_frac: Some(0.8),
    },
    AnchorOverride {
        name: "mayo",
        x_frac: Some(0.8),
        y_frac: Some(0.5),
    },
    AnchorOverride {
        name: "parkes",
        x_frac: Some(0.7),
        y_frac: None,
    },
    AnchorOverride {
        name: "fenner",
        x_frac: Some(0.1),
        y_frac: None,
    },
];

/// Where the label pin for a district should sit.
pub fn label_anchor(district: &District) -> Point {
    let name = district.name.to_lowercase();
    for o in ANCHOR_OVERRIDES {
        if o.name == name {
            let b = &district.bounds;
            return Point {
                x: o
                    .x_frac
                    .map(|f| b.min.x + b.width() * f)
                    .unwrap_or(district.centroid.x),
                y: o
                    .y_frac
                    .map(|f| b.min.y + b.height() * f)
                    .unwrap_or(district.centroid.y),
            };
        }
    }
    district.centroid
}

/// On-screen label scale for a zoom level; the inverse keeps label text
/// roughly constant-sized as the map zooms.
pub fn label_scale(zoom: f64) -> f64 {
    1.0 / (zoom * LABEL_SHRINK)
}

/// Label text formatter supplied by the embedding page.
pub type LabelFormatter = dyn Fn(&District) -> String;

/// One reusable label balloon.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSlot {
    /// Name of the currently bound district, if any.
    pub district: Option<String>,
    pub anchor: Point,
    pub scale: f64,
    pub text: String,
    pub visible: bool,
}

impl LabelSlot {
    pub fn new() -> Self {
        Self {
            district: None,
            anchor: Point::ZERO,
            scale: 1.0,
            text: String::new(),
            visible: false,
        }
    }

    /// Rebind the slot. A `None` district hides the balloon without
    /// touching its text or position.
    pub fn place(
        &mut self,
        district: Option<&District>,
        zoom: f64,
        formatter: Option<&LabelFormatter>,
    ) {
        let Some(d) = district else {
            self.visible = false;
            return;
        };
        self.district = Some(d.name.clone());
        self.anchor = label_anchor(d);
        self.scale = label_scale(zoom);
        let text = match formatter {
            Some(f) => f(d),
            None => d.name.clone(),
        };
        // Skip the write when nothing changed; the renderer diffs on it.
        if text != self.text {
            self.text = text;
        }
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}

impl Default for LabelSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-allocated pool of one main balloon plus `COMPANION_SLOTS` others.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPool {
    pub main: LabelSlot,
    pub others: Vec<LabelSlot>,
}

impl LabelPool {
    pub fn new() -> Self {
        Self {
            main: LabelSlot::new(),
            others: vec![LabelSlot::new(); COMPANION_SLOTS],
        }
    }

    /// Rebind every slot for a new focus plan. `hide_main` is the marker's
    /// hide flag; the plan's render-suppression flags are honored here too.
    pub fn apply(&mut self, plan: &FocusPlan, hide_main: bool, formatter: Option<&LabelFormatter>) {
        for slot in &mut self.others {
            slot.hide();
        }
        let Some(main) = &plan.main else {
            self.main.hide();
            return;
        };

        self.main.place(Some(main), plan.zoom, formatter);
        if hide_main || !plan.render_main {
            self.main.visible = false;
        }

        if plan.render_companions {
            for (slot, companion) in self.others.iter_mut().zip(&plan.companions) {
                slot.place(companion.as_ref(), plan.zoom, formatter);
            }
        }
    }
}

impl Default for LabelPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bounds;

    fn district(name: &str, x: f64, y: f64) -> District {
        let mut bounds = Bounds::of_point(Point::new(x - 50.0, y - 50.0));
        bounds.extend(Point::new(x + 50.0, y + 50.0));
        District {
            name: name.to_string(),
            centroid: Point::new(x, y),
            bounds,
        }
    }

    fn plan_for(main: District, companions: Vec<Option<District>>) -> FocusPlan {
        FocusPlan {
            center: main.centroid,
            zoom: 50.0,
            main: Some(main),
            companions,
            render_main: true,
            render_companions: true,
        }
    }

    #[test]
    fn test_anchor_defaults_to_centroid() {
        let d = district("Sydney", 100.0, 200.0);
        let a = label_anchor(&d);
        assert!((a.x - 100.0).abs() < 1e-9);
        assert!((a.y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_anchor_override_x_only() {
        // Bowman pins at 20% across the bbox, centroid height.
        let d = district("Bowman", 100.0, 200.0);
        let a = label_anchor(&d);
        assert!((a.x - (50.0 + 100.0 * 0.2)).abs() < 1e-9);
        assert!((a.y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_anchor_override_both_axes() {
        let d = district("Bonner", 100.0, 200.0);
        let a = label_anchor(&d);
        assert!((a.x - 70.0).abs() < 1e-9);
        assert!((a.y - (150.0 + 100.0 * 0.8)).abs() < 1e-9);
    }

    #[test]
    fn test_anchor_override_is_case_insensitive() {
        let d = district("MAYO", 100.0, 200.0);
        let a = label_anchor(&d);
        assert!((a.x - 130.0).abs() < 1e-9);
        assert!((a.y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_label_scale_inverse_to_zoom() {
        assert!((label_scale(50.0) - 1.0 / 65.0).abs() < 1e-12);
        assert!((label_scale(1.0) - 1.0 / 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_place_none_hides_without_clearing() {
        let mut slot = LabelSlot::new();
        slot.place(Some(&district("Sydney", 10.0, 10.0)), 50.0, None);
        assert!(slot.visible);
        assert_eq!(slot.text, "Sydney");

        slot.place(None, 50.0, None);
        assert!(!slot.visible);
        // Text and binding survive so re-showing is cheap.
        assert_eq!(slot.text, "Sydney");
    }

    #[test]
    fn test_place_uses_formatter() {
        let mut slot = LabelSlot::new();
        let formatter = |d: &District| format!("Seat of {}", d.name);
        slot.place(Some(&district("Sydney", 10.0, 10.0)), 50.0, Some(&formatter));
        assert_eq!(slot.text, "Seat of Sydney");
    }

    #[test]
    fn test_pool_caps_companions() {
        let main = district("Main", 0.0, 0.0);
        let companions: Vec<Option<District>> = (0..12)
            .map(|i| Some(district(&format!("D{i}"), i as f64, i as f64)))
            .collect();
        let mut pool = LabelPool::new();
        pool.apply(&plan_for(main, companions), false, None);
        let visible = pool.others.iter().filter(|s| s.visible).count();
        assert_eq!(visible, COMPANION_SLOTS);
    }

    #[test]
    fn test_pool_keeps_positional_slots_for_unresolved() {
        let main = district("Main", 0.0, 0.0);
        let companions = vec![
            None,
            Some(district("Second", 5.0, 5.0)),
            Some(district("Third", 9.0, 9.0)),
        ];
        let mut pool = LabelPool::new();
        pool.apply(&plan_for(main, companions), false, None);
        assert!(!pool.others[0].visible);
        assert!(pool.others[1].visible);
        assert_eq!(pool.others[1].text, "Second");
        assert!(pool.others[2].visible);
        assert_eq!(pool.others[2].text, "Third");
    }

    #[test]
    fn test_pool_hide_main_flag() {
        let main = district("Main", 0.0, 0.0);
        let mut pool = LabelPool::new();
        pool.apply(&plan_for(main, vec![]), true, None);
        assert!(!pool.main.visible);
        // Position and text are still updated underneath.
        assert_eq!(pool.main.text, "Main");
    }

    #[test]
    fn test_pool_render_suppression() {
        let main = district("Main", 0.0, 0.0);
        let companions = vec![Some(district("Other", 5.0, 5.0))];
        let mut plan = plan_for(main, companions);
        plan.render_main = false;
        plan.render_companions = false;
        let mut pool = LabelPool::new();
        pool.apply(&plan, false, None);
        assert!(!pool.main.visible);
        assert!(pool.others.iter().all(|s| !s.visible));
    }

    #[test]
    fn test_pool_overview_hides_everything() {
        let main = district("Main", 0.0, 0.0);
        let mut pool = LabelPool::new();
        pool.apply(&plan_for(main, vec![]), false, None);
        assert!(pool.main.visible);

        let overview = FocusPlan {
            center: Point::ZERO,
            zoom: 0.8,
            main: None,
            companions: vec![],
            render_main: true,
            render_companions: true,
        };
        pool.apply(&overview, false, None);
        assert!(!pool.main.visible);
        assert!(pool.others.iter().all(|s| !s.visible));
    }

    #[test]
    fn test_pool_slot_scale_follows_plan_zoom() {
        let main = district("Main", 0.0, 0.0);
        let mut pool = LabelPool::new();
        pool.apply(&plan_for(main, vec![]), false, None);
        assert!((pool.main.scale - label_scale(50.0)).abs() < 1e-12);
    }
}
