use std::f64::consts::FRAC_PI_4;

use electomap_shared::models::{Bounds, District, Point, Viewport};

use crate::api::Feature;

/// Geographic center of the national frame (lon, lat).
const MAP_CENTER: (f64, f64) = (131.0, -27.0);
/// Projection scale as a multiple of viewport width.
const SCALE_FACTOR: f64 = 0.9;

/// Spherical Mercator projection fitted to the viewport: scaled to the
/// width and centered on the continent. Rebuilt wholesale on resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    scale: f64,
    center: (f64, f64),
    translate: (f64, f64),
}

/// Unit-sphere Mercator coordinates (y grows north).
fn mercator_raw(lon: f64, lat: f64) -> (f64, f64) {
    let x = lon.to_radians();
    let y = (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

impl Mercator {
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self {
            scale: viewport.width * SCALE_FACTOR,
            center: MAP_CENTER,
            translate: (viewport.width / 2.0, viewport.height / 2.0),
        }
    }

    /// Project lon/lat degrees to screen coordinates (y grows down).
    pub fn project(&self, lon: f64, lat: f64) -> Point {
        let (mx, my) = mercator_raw(lon, lat);
        let (cx, cy) = mercator_raw(self.center.0, self.center.1);
        Point {
            x: self.translate.0 + self.scale * (mx - cx),
            y: self.translate.1 + self.scale * (cy - my),
        }
    }
}

/// A district plus its renderable screen-space outline.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictShape {
    pub district: District,
    /// SVG path data for all rings.
    pub path: String,
}

/// Project a topology feature into screen space, deriving the SVG path,
/// the area-weighted centroid, and the bounding box in one pass over the
/// rings.
pub fn project_feature(projection: &Mercator, feature: &Feature) -> DistrictShape {
    let mut path = String::new();
    let mut bounds: Option<Bounds> = None;

    // Shoelace accumulators across every ring; holes carry opposite
    // winding and cancel out of the centroid naturally.
    let mut cross_sum = 0.0;
    let mut cx_sum = 0.0;
    let mut cy_sum = 0.0;

    for ring in feature.geometry.rings() {
        let projected: Vec<Point> = ring
            .iter()
            .map(|&[lon, lat]| projection.project(lon, lat))
            .collect();
        if projected.is_empty() {
            continue;
        }

        for (i, p) in projected.iter().enumerate() {
            if i == 0 {
                path.push_str(&format!("M{},{}", p.x, p.y));
            } else {
                path.push_str(&format!("L{},{}", p.x, p.y));
            }
            match &mut bounds {
                Some(b) => b.extend(*p),
                None => bounds = Some(Bounds::of_point(*p)),
            }
        }
        path.push('Z');

        for i in 0..projected.len() {
            let a = projected[i];
            let b = projected[(i + 1) % projected.len()];
            let cross = a.x * b.y - b.x * a.y;
            cross_sum += cross;
            cx_sum += (a.x + b.x) * cross;
            cy_sum += (a.y + b.y) * cross;
        }
    }

    let bounds = bounds.unwrap_or(Bounds::of_point(Point::ZERO));
    // Degenerate geometry falls back to the bbox midpoint.
    let centroid = if cross_sum.abs() > f64::EPSILON {
        Point {
            x: cx_sum / (3.0 * cross_sum),
            y: cy_sum / (3.0 * cross_sum),
        }
    } else {
        bounds.midpoint()
    };

    DistrictShape {
        district: District {
            name: feature.properties.name.clone(),
            centroid,
            bounds,
        },
        path,
    }
}

/// Project every feature for the given viewport.
pub fn project_topology(features: &[Feature], viewport: Viewport) -> Vec<DistrictShape> {
    let projection = Mercator::for_viewport(viewport);
    features
        .iter()
        .map(|f| project_feature(&projection, f))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Geometry, Properties};

    fn viewport() -> Viewport {
        Viewport::new(1200.0, 800.0)
    }

    #[test]
    fn test_map_center_projects_to_viewport_center() {
        let proj = Mercator::for_viewport(viewport());
        let p = proj.project(131.0, -27.0);
        assert!((p.x - 600.0).abs() < 1e-9);
        assert!((p.y - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_east_is_right_north_is_up() {
        let proj = Mercator::for_viewport(viewport());
        let east = proj.project(140.0, -27.0);
        assert!(east.x > 600.0);
        let north = proj.project(131.0, -20.0);
        assert!(north.y < 400.0);
    }

    #[test]
    fn test_scale_follows_viewport_width() {
        let narrow = Mercator::for_viewport(Viewport::new(400.0, 800.0));
        let wide = Mercator::for_viewport(Viewport::new(1200.0, 800.0));
        let dn = narrow.project(140.0, -27.0).x - narrow.project(131.0, -27.0).x;
        let dw = wide.project(140.0, -27.0).x - wide.project(131.0, -27.0).x;
        assert!((dw / dn - 3.0).abs() < 1e-9);
    }

    fn square_feature(name: &str) -> Feature {
        // A small lon/lat square near the map center.
        Feature {
            properties: Properties {
                name: name.to_string(),
            },
            geometry: Geometry::Polygon {
                coordinates: vec![vec![
                    [130.0, -26.0],
                    [132.0, -26.0],
                    [132.0, -28.0],
                    [130.0, -28.0],
                    [130.0, -26.0],
                ]],
            },
        }
    }

    #[test]
    fn test_feature_centroid_near_bbox_midpoint() {
        let proj = Mercator::for_viewport(viewport());
        let shape = project_feature(&proj, &square_feature("Test"));
        let mid = shape.district.bounds.midpoint();
        // Mercator stretches slightly with latitude, so allow a few pixels.
        assert!((shape.district.centroid.x - mid.x).abs() < 1.0);
        assert!((shape.district.centroid.y - mid.y).abs() < 5.0);
    }

    #[test]
    fn test_feature_path_is_closed() {
        let proj = Mercator::for_viewport(viewport());
        let shape = project_feature(&proj, &square_feature("Test"));
        assert!(shape.path.starts_with('M'));
        assert!(shape.path.ends_with('Z'));
        assert_eq!(shape.path.matches('L').count(), 4);
    }

    #[test]
    fn test_multipolygon_paths_and_bounds() {
        let proj = Mercator::for_viewport(viewport());
        let feature = Feature {
            properties: Properties {
                name: "Split".to_string(),
            },
            geometry: Geometry::MultiPolygon {
                coordinates: vec![
                    vec![vec![
                        [130.0, -26.0],
                        [131.0, -26.0],
                        [131.0, -27.0],
                        [130.0, -26.0],
                    ]],
                    vec![vec![
                        [133.0, -28.0],
                        [134.0, -28.0],
                        [134.0, -29.0],
                        [133.0, -28.0],
                    ]],
                ],
            },
        };
        let shape = project_feature(&proj, &feature);
        assert_eq!(shape.path.matches('M').count(), 2);
        assert_eq!(shape.path.matches('Z').count(), 2);
        // Bounds must span both parts.
        let west = proj.project(130.0, -26.0);
        let east = proj.project(134.0, -29.0);
        assert!((shape.district.bounds.min.x - west.x).abs() < 1e-9);
        assert!((shape.district.bounds.max.x - east.x).abs() < 1e-9);
    }
}
