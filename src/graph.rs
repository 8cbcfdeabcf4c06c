use crate::ids::IdentifierTable;

/// Dense 32-bit node identifier, assigned in strict insertion order.
pub type NodeId = u32;

/// Sentinel meaning "no such node" — used as the redirect-absent marker.
pub const NULL_ID: NodeId = u32::MAX;

/// Per-node record kept by the [`GraphStore`].
///
/// `incoming` may contain duplicates and self-references during ingest; the
/// preprocessor is responsible for cleaning both up (spec invariants I3/I4).
#[derive(Clone, Debug)]
pub struct PageLinks {
    pub incoming: Vec<NodeId>,
    pub num_outgoing: usize,
    pub redirect: NodeId,
}

impl PageLinks {
    fn new() -> Self {
        PageLinks {
            incoming: Vec::new(),
            num_outgoing: 0,
            redirect: NULL_ID,
        }
    }
}

/// A record as produced by the upstream cleaner, accepted by [`GraphStore::add_page`].
pub struct PageRecord<'a> {
    pub url: &'a str,
    pub links: &'a [String],
    pub redirect: Option<&'a str>,
}

/// Incoming-edge graph keyed by dense [`NodeId`]. Deleted slots (redirect
/// sources collapsed by the preprocessor) are tombstoned rather than
/// removed, so a `NodeId` stays valid as an index for the lifetime of the
/// store.
pub struct GraphStore {
    entries: Vec<Option<PageLinks>>,
}

impl GraphStore {
    pub fn new() -> Self {
        GraphStore {
            entries: Vec::new(),
        }
    }

    fn ensure_capacity(&mut self, id: NodeId) {
        let id = id as usize;
        if id >= self.entries.len() {
            self.entries.resize(id + 1, None);
        }
    }

    /// Live entry for `id`, if present.
    pub fn get(&self, id: NodeId) -> Option<&PageLinks> {
        self.entries.get(id as usize).and_then(|slot| slot.as_ref())
    }

    fn get_or_create_mut(&mut self, id: NodeId) -> &mut PageLinks {
        self.ensure_capacity(id);
        self.entries[id as usize].get_or_insert_with(PageLinks::new)
    }

    /// Whether `id` names a live (non-tombstoned) entry.
    pub fn is_live(&self, id: NodeId) -> bool {
        self.entries
            .get(id as usize)
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// Number of live entries, i.e. nodes not yet tombstoned.
    pub fn live_count(&self) -> usize {
        self.entries.iter().filter(|slot| slot.is_some()).count()
    }

    /// Total length of the dense slot array — the high-water mark of ids
    /// ever assigned, including tombstoned ones.
    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    /// Deletes the entry for `id`, leaving a tombstone behind.
    pub(crate) fn tombstone(&mut self, id: NodeId) -> Option<PageLinks> {
        self.entries.get_mut(id as usize).and_then(Option::take)
    }

    pub(crate) fn set(&mut self, id: NodeId, links: PageLinks) {
        self.ensure_capacity(id);
        self.entries[id as usize] = Some(links);
    }

    pub fn iter_live(&self) -> impl Iterator<Item = (NodeId, &PageLinks)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|links| (i as NodeId, links)))
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<Option<PageLinks>> {
        &mut self.entries
    }

    /// Sole ingest entry point, called once per article record from the
    /// upstream cleaner.
    ///
    /// A record with `redirect` present and `links` empty denotes a redirect
    /// page; its own outgoing edges are never materialised because the
    /// preprocessor will subsume its incoming edges onto the redirect
    /// target.
    pub fn add_page(&mut self, record: PageRecord<'_>, ids: &mut IdentifierTable) {
        log::trace!("graph: add_page url={}", record.url);

        let redirect_id = match record.redirect {
            Some(target_url) => {
                let target_id = ids.intern(target_url);
                self.get_or_create_mut(target_id);
                target_id
            }
            None => NULL_ID,
        };

        let url_id = ids.intern(record.url);
        {
            let entry = self.get_or_create_mut(url_id);
            entry.redirect = redirect_id;
            entry.num_outgoing = record.links.len();
        }

        if redirect_id != NULL_ID {
            return;
        }

        for link in record.links {
            let target_id = ids.intern(link);
            self.get_or_create_mut(target_id).incoming.push(url_id);
        }
    }

    /// Reports live node count and total outgoing-edge count to the log.
    pub fn log_stats(&self) {
        let nodes = self.live_count();
        let edges: usize = self
            .iter_live()
            .map(|(_, links)| links.num_outgoing)
            .sum();
        log::info!("graph: {} live nodes, {} edges", nodes, edges);
    }

    pub fn stats(&self) -> (usize, usize) {
        let edges: usize = self
            .iter_live()
            .map(|(_, links)| links.num_outgoing)
            .sum();
        (self.live_count(), edges)
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn add_page_creates_targets_and_back_edges() {
        let mut ids = IdentifierTable::new();
        let mut graph = GraphStore::new();

        graph.add_page(
            PageRecord {
                url: "A",
                links: &links(&["B"]),
                redirect: None,
            },
            &mut ids,
        );

        let a = ids.lookup("A").unwrap();
        let b = ids.lookup("B").unwrap();

        assert_eq!(graph.get(a).unwrap().num_outgoing, 1);
        assert_eq!(graph.get(b).unwrap().incoming, vec![a]);
    }

    #[test]
    fn redirect_page_does_not_materialise_its_own_outgoing_edges() {
        let mut ids = IdentifierTable::new();
        let mut graph = GraphStore::new();

        graph.add_page(
            PageRecord {
                url: "R",
                links: &[],
                redirect: Some("B"),
            },
            &mut ids,
        );

        let r = ids.lookup("R").unwrap();
        let b = ids.lookup("B").unwrap();

        assert_eq!(graph.get(r).unwrap().redirect, b);
        assert_eq!(graph.get(b).unwrap().incoming, Vec::<NodeId>::new());
    }

    #[test]
    fn reingest_overwrites_num_outgoing_but_not_incoming() {
        let mut ids = IdentifierTable::new();
        let mut graph = GraphStore::new();

        graph.add_page(
            PageRecord {
                url: "A",
                links: &links(&["B"]),
                redirect: None,
            },
            &mut ids,
        );
        graph.add_page(
            PageRecord {
                url: "A",
                links: &links(&["B", "C"]),
                redirect: None,
            },
            &mut ids,
        );

        let a = ids.lookup("A").unwrap();
        // num_outgoing reflects the last-seen record.
        assert_eq!(graph.get(a).unwrap().num_outgoing, 2);
        // but incoming structure only reflects edges actually walked on each call.
        let b = ids.lookup("B").unwrap();
        assert_eq!(graph.get(b).unwrap().incoming, vec![a, a]);
    }

    #[test]
    fn duplicate_links_in_one_record_accumulate_in_incoming() {
        let mut ids = IdentifierTable::new();
        let mut graph = GraphStore::new();

        graph.add_page(
            PageRecord {
                url: "A",
                links: &links(&["B", "B"]),
                redirect: None,
            },
            &mut ids,
        );

        let a = ids.lookup("A").unwrap();
        let b = ids.lookup("B").unwrap();
        assert_eq!(graph.get(b).unwrap().incoming, vec![a, a]);
    }
}
