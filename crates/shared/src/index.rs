use std::collections::HashMap;

use crate::models::District;

/// Lowercase a name and strip everything that isn't a letter, so that
/// punctuation and whitespace differences never break matching
/// ("O'Connor", "oconnor", and " O Connor " all normalize the same way).
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

/// Resolves human-supplied electorate names to district records.
///
/// Matching is exact on the normalized form; there is no fuzzy or partial
/// matching. Districts that normalize to the same key (a data error) keep
/// the first one in load order.
#[derive(Debug, Clone)]
pub struct ElectorateIndex {
    districts: Vec<District>,
    by_key: HashMap<String, usize>,
}

impl ElectorateIndex {
    pub fn new(districts: Vec<District>) -> Self {
        let mut by_key = HashMap::with_capacity(districts.len());
        for (i, district) in districts.iter().enumerate() {
            let key = normalize_name(&district.name);
            if key.is_empty() {
                continue;
            }
            by_key.entry(key).or_insert(i);
        }
        Self { districts, by_key }
    }

    /// Look up a district by name. Empty queries return `None` without
    /// scanning.
    pub fn resolve(&self, name: &str) -> Option<&District> {
        let key = normalize_name(name);
        if key.is_empty() {
            return None;
        }
        self.by_key.get(&key).map(|&i| &self.districts[i])
    }

    /// `resolve` for an optional query.
    pub fn resolve_opt(&self, name: Option<&str>) -> Option<&District> {
        name.and_then(|n| self.resolve(n))
    }

    /// All districts in load order.
    pub fn districts(&self) -> &[District] {
        &self.districts
    }
}
