use serde::Deserialize;

/// GeoJSON feature collection of electorate boundaries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Topology {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feature {
    pub properties: Properties,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Properties {
    /// Electorate name as published, e.g. "O'Connor".
    #[serde(alias = "Elect_div", alias = "ELECT_DIV")]
    pub name: String,
}

/// Only the two polygonal geometry types appear in electorate files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<[f64; 2]>>> },
}

impl Geometry {
    /// Iterate every ring (outer and holes alike) regardless of type.
    pub fn rings(&self) -> Box<dyn Iterator<Item = &Vec<[f64; 2]>> + '_> {
        match self {
            Geometry::Polygon { coordinates } => Box::new(coordinates.iter()),
            Geometry::MultiPolygon { coordinates } => {
                Box::new(coordinates.iter().flat_map(|poly| poly.iter()))
            }
        }
    }
}

fn absolute_url(path: &str) -> String {
    if path.starts_with("http") {
        return path.to_string();
    }
    // Assets are served same-origin; reqwest wants a full URL.
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    format!("{origin}{path}")
}

/// Fetch and decode the boundary file the app is served with.
pub async fn fetch_topology(path: &str) -> Result<Topology, String> {
    let response = reqwest::get(absolute_url(path))
        .await
        .map_err(|e| format!("boundary fetch failed: {e}"))?;
    response
        .json::<Topology>()
        .await
        .map_err(|e| format!("boundary decode failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_polygon_feature() {
        let json = r#"{
            "features": [{
                "properties": { "name": "Sydney" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[151.0, -33.8], [151.3, -33.8], [151.3, -34.0], [151.0, -33.8]]]
                }
            }]
        }"#;
        let topology: Topology = serde_json::from_str(json).unwrap();
        assert_eq!(topology.features.len(), 1);
        let feature = &topology.features[0];
        assert_eq!(feature.properties.name, "Sydney");
        assert_eq!(feature.geometry.rings().count(), 1);
    }

    #[test]
    fn test_decode_multipolygon_rings() {
        let json = r#"{
            "properties": { "name": "Bowman" },
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[153.0, -27.4], [153.2, -27.4], [153.2, -27.6], [153.0, -27.4]]],
                    [[[153.4, -27.4], [153.5, -27.4], [153.5, -27.5], [153.4, -27.4]]]
                ]
            }
        }"#;
        let feature: Feature = serde_json::from_str(json).unwrap();
        assert_eq!(feature.geometry.rings().count(), 2);
    }

    #[test]
    fn test_decode_aliased_name_property() {
        let json = r#"{
            "properties": { "Elect_div": "Griffith" },
            "geometry": { "type": "Polygon", "coordinates": [] }
        }"#;
        let feature: Feature = serde_json::from_str(json).unwrap();
        assert_eq!(feature.properties.name, "Griffith");
    }
}
