//! The grouped content catalog: the immutable input of the whole pipeline.

use {
    crate::Result,
    serde::{Deserialize, Serialize},
    std::{fs, path::Path},
};

/// A single displayable content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub detail: String,
}

/// A named collection of entries sharing a display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    /// Display color, either a named terminal color or `#rrggbb`.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// An ordered sequence of groups. Immutable for the lifetime of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// A search match, pointing back into the catalog.
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub entry: &'a Entry,
    pub group: &'a Group,
}

const MAX_SEARCH_RESULTS: usize = 10;

impl Catalog {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    /// Case-insensitive substring search over entry names, summaries, and
    /// group names. Results keep catalog order and are capped at ten.
    pub fn search_entries(&self, query: &str) -> Vec<SearchHit<'_>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for group in &self.groups {
            let group_matches = group.name.to_lowercase().contains(&needle);
            for entry in &group.entries {
                if group_matches
                    || entry.name.to_lowercase().contains(&needle)
                    || entry.summary.to_lowercase().contains(&needle)
                {
                    hits.push(SearchHit { entry, group });
                    if hits.len() >= MAX_SEARCH_RESULTS {
                        return hits;
                    }
                }
            }
        }

        hits
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert2::check as assert};

    fn sample() -> Catalog {
        Catalog {
            title: "Grimoire".to_string(),
            groups: vec![
                Group {
                    name: "Fire".to_string(),
                    color: "#e25822".to_string(),
                    entries: vec![
                        Entry {
                            id: "fireball".to_string(),
                            name: "Fireball".to_string(),
                            summary: "A burst of flame".to_string(),
                            detail: String::new(),
                        },
                        Entry {
                            id: "ember".to_string(),
                            name: "Ember".to_string(),
                            summary: String::new(),
                            detail: String::new(),
                        },
                    ],
                },
                Group {
                    name: "Ice".to_string(),
                    color: "cyan".to_string(),
                    entries: vec![Entry {
                        id: "frost".to_string(),
                        name: "Frost Lance".to_string(),
                        summary: "A spear of ice".to_string(),
                        detail: String::new(),
                    }],
                },
            ],
        }
    }

    #[test]
    fn test_from_toml_defaults_missing_fields() {
        let doc = r#"
            title = "Test"

            [[groups]]
            name = "Solo"

            [[groups.entries]]
            id = "one"
            name = "One"
        "#;
        let catalog = Catalog::from_toml(doc).unwrap();
        assert!(catalog.groups.len() == 1);
        assert!(catalog.groups[0].color.is_empty());
        assert!(catalog.groups[0].entries[0].summary.is_empty());
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(Catalog::from_toml("not = [valid").is_err());
    }

    #[test]
    fn test_entry_count_sums_groups() {
        assert!(sample().entry_count() == 3);
    }

    #[test]
    fn test_search_matches_entry_name() {
        let catalog = sample();
        let hits = catalog.search_entries("fireb");
        assert!(hits.len() == 1);
        assert!(hits[0].entry.id == "fireball");
        assert!(hits[0].group.name == "Fire");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = sample();
        assert!(catalog.search_entries("FROST").len() == 1);
    }

    #[test]
    fn test_search_group_name_matches_all_group_entries() {
        let catalog = sample();
        let hits = catalog.search_entries("fire");
        // "fire" matches the Fire group, so both of its entries surface,
        // plus nothing from Ice.
        assert!(hits.len() == 2);
    }

    #[test]
    fn test_search_blank_query_is_empty() {
        assert!(sample().search_entries("   ").is_empty());
    }
}
