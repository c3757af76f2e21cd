//! Tag Index Module
//!
//! Reverse index from tag to the keys carrying it, so tag invalidation only
//! visits matching entries.

use std::collections::{BTreeSet, HashMap, HashSet};

// == Tag Index ==
#[derive(Debug, Default)]
pub struct TagIndex {
    keys_by_tag: HashMap<String, HashSet<String>>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key` under each of `tags`.
    pub fn insert(&mut self, key: &str, tags: &[String]) {
        for tag in tags {
            self.keys_by_tag
                .entry(tag.clone())
                .or_default()
                .insert(key.to_string());
        }
    }

    /// Unregisters `key` from each of `tags`, dropping tags left empty.
    pub fn remove(&mut self, key: &str, tags: &[String]) {
        for tag in tags {
            if let Some(keys) = self.keys_by_tag.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.keys_by_tag.remove(tag);
                }
            }
        }
    }

    /// Distinct keys carrying at least one of `tags`, in sorted order.
    pub fn keys_for_any<S: AsRef<str>>(&self, tags: &[S]) -> BTreeSet<String> {
        tags.iter()
            .filter_map(|tag| self.keys_by_tag.get(tag.as_ref()))
            .flatten()
            .cloned()
            .collect()
    }

    /// Number of keys carrying `tag`.
    pub fn count(&self, tag: &str) -> usize {
        self.keys_by_tag.get(tag).map_or(0, HashSet::len)
    }

    pub fn clear(&mut self) {
        self.keys_by_tag.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keys_for_any_deduplicates() {
        let mut index = TagIndex::new();
        index.insert("k1", &tags(&["cases", "search"]));
        index.insert("k2", &tags(&["cases"]));
        index.insert("k3", &tags(&["legislation"]));

        let keys = index.keys_for_any(&["cases", "search"]);
        assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["k1", "k2"]);
        assert_eq!(index.count("cases"), 2);
    }

    #[test]
    fn test_remove_drops_empty_tags() {
        let mut index = TagIndex::new();
        index.insert("k1", &tags(&["cases"]));
        index.remove("k1", &tags(&["cases"]));

        assert_eq!(index.count("cases"), 0);
        assert!(index.keys_for_any(&["cases"]).is_empty());
    }

    #[test]
    fn test_unknown_tag_matches_nothing() {
        let mut index = TagIndex::new();
        index.insert("k1", &tags(&["cases"]));
        assert!(index.keys_for_any(&["reports"]).is_empty());
    }
}
