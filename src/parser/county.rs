use crate::constants::COUNTY_FALLBACK_SUFFIX;
use std::collections::HashMap;

/// Maps the first address segment of a profile page (with " maakond"
/// removed) to the short region name used in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyMap {
    entries: HashMap<String, String>,
}

const BUILT_IN: &[(&str, &str)] = &[
    ("Harju", "Harjumaa"),
    ("Hiiu", "Hiiumaa"),
    ("Ida-Viru", "Ida-Virumaa"),
    ("Jõgeva", "Jõgevamaa"),
    ("Järva", "Järvamaa"),
    ("Lääne", "Läänemaa"),
    ("Lääne-Viru", "Lääne-Virumaa"),
    ("Põlva", "Põlvamaa"),
    ("Pärnu", "Pärnumaa"),
    ("Rapla", "Raplamaa"),
    ("Saare", "Saaremaa"),
    ("Tartu", "Tartumaa"),
    ("Valga", "Valgamaa"),
    ("Viljandi", "Viljandimaa"),
    ("Võru", "Võrumaa"),
    // Addresses that start with the city instead of the county
    ("Tallinn", "Harjumaa"),
    ("Tartu linn", "Tartumaa"),
    ("Pärnu linn", "Pärnumaa"),
    ("Narva linn", "Ida-Virumaa"),
];

impl Default for CountyMap {
    fn default() -> Self {
        Self {
            entries: BUILT_IN
                .iter()
                .map(|(raw, short)| (raw.to_string(), short.to_string()))
                .collect(),
        }
    }
}

impl CountyMap {
    pub fn empty() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Built-in entries with `overrides` layered on top.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut map = Self::default();
        for (raw, short) in overrides {
            map.entries.insert(raw.clone(), short.clone());
        }
        map
    }

    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries.get(raw).map(String::as_str)
    }

    /// Mapped name, or the raw name with the "maa" suffix when unmapped.
    pub fn resolve(&self, raw: &str) -> String {
        match self.get(raw) {
            Some(short) if !short.is_empty() => short.to_string(),
            _ => format!("{}{}", raw, COUNTY_FALLBACK_SUFFIX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_county() {
        let map = CountyMap::default();
        assert_eq!(map.resolve("Harju"), "Harjumaa");
        assert_eq!(map.resolve("Tallinn"), "Harjumaa");
    }

    #[test]
    fn test_unmapped_county_gets_suffix() {
        assert_eq!(CountyMap::empty().resolve("Harju"), "Harjumaa");
        assert_eq!(CountyMap::default().resolve("Kihnu"), "Kihnumaa");
    }

    #[test]
    fn test_overrides_replace_built_ins() {
        let mut overrides = HashMap::new();
        overrides.insert("Harju".to_string(), "Harju".to_string());
        let map = CountyMap::with_overrides(&overrides);
        assert_eq!(map.resolve("Harju"), "Harju");
        assert_eq!(map.resolve("Tartu"), "Tartumaa");
    }
}
