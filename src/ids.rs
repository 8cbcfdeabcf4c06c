use std::collections::HashMap;

use crate::graph::NodeId;

/// Bidirectional mapping between canonical article URLs and dense, sequentially
/// assigned [`NodeId`]s.
///
/// `intern` is the only way new ids are minted; ids are never recycled, even
/// after the preprocessor deletes the graph entry for a redirect source (the
/// url→id and id→url mappings stay valid for the lifetime of the table).
pub struct IdentifierTable {
    url_to_id: HashMap<String, NodeId>,
    id_to_url: Vec<String>,
}

impl IdentifierTable {
    pub fn new() -> Self {
        IdentifierTable {
            url_to_id: HashMap::new(),
            id_to_url: Vec::new(),
        }
    }

    /// Returns the id for `url`, interning it as a fresh id if this is the
    /// first time it's been seen.
    pub fn intern(&mut self, url: &str) -> NodeId {
        if let Some(&id) = self.url_to_id.get(url) {
            return id;
        }

        let id = self.id_to_url.len() as NodeId;
        self.id_to_url.push(url.to_string());
        self.url_to_id.insert(url.to_string(), id);
        id
    }

    /// Returns the id already assigned to `url`, if any.
    pub fn lookup(&self, url: &str) -> Option<NodeId> {
        self.url_to_id.get(url).copied()
    }

    /// Returns the url for `id`, if it has been assigned.
    pub fn url_for(&self, id: NodeId) -> Option<&str> {
        self.id_to_url.get(id as usize).map(String::as_str)
    }

    /// Number of distinct urls ever interned. Also the high-water mark used
    /// to size the score vector.
    pub fn len(&self) -> usize {
        self.id_to_url.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_url.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &str)> {
        self.id_to_url
            .iter()
            .enumerate()
            .map(|(i, url)| (i as NodeId, url.as_str()))
    }

    /// Rebuilds `url_to_id` from a freshly loaded `id_to_url` sequence. Used
    /// only by the persistence layer: `url_to_id` is never itself persisted.
    pub(crate) fn rebuild_reverse_map(id_to_url: Vec<String>) -> Self {
        let mut url_to_id = HashMap::with_capacity(id_to_url.len());
        for (i, url) in id_to_url.iter().enumerate() {
            url_to_id.insert(url.clone(), i as NodeId);
        }
        IdentifierTable {
            url_to_id,
            id_to_url,
        }
    }

    pub(crate) fn dense_urls(&self) -> &[String] {
        &self.id_to_url
    }
}

impl Default for IdentifierTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let mut table = IdentifierTable::new();
        let a = table.intern("A");
        let b = table.intern("B");
        let a_again = table.intern("A");

        assert_eq!(a, a_again);
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn round_trips_through_both_directions() {
        let mut table = IdentifierTable::new();
        for url in ["A", "B", "C"] {
            table.intern(url);
        }

        for (id, url) in table.iter() {
            assert_eq!(table.lookup(url), Some(id));
            assert_eq!(table.url_for(id), Some(url));
        }
    }

    #[test]
    fn lookup_of_unknown_url_is_absent() {
        let table = IdentifierTable::new();
        assert_eq!(table.lookup("nope"), None);
    }
}
