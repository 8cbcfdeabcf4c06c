use std::collections::HashSet;

use crate::graph::{GraphStore, NodeId, NULL_ID};

/// One-shot pass run after ingest closes and before the first PageRank
/// iteration. Returns the initial score vector and the live-node count it
/// was seeded with.
pub fn run(graph: &mut GraphStore) -> Vec<f64> {
    resolve_redirects(graph);
    dedup_and_remove_self_loops(graph);
    allocate_initial_scores(graph)
}

/// Pass A: splice each redirect source's incoming edges onto its target and
/// delete the source. Single-hop only — a redirect whose target is itself a
/// (still unresolved) redirect is not chased further, matching source-dump
/// semantics where multi-hop redirects are treated as broken.
fn resolve_redirects(graph: &mut GraphStore) {
    let redirect_sources: Vec<NodeId> = graph
        .iter_live()
        .filter(|(_, links)| links.redirect != NULL_ID)
        .map(|(id, _)| id)
        .collect();

    for source_id in redirect_sources {
        let target_id = match graph.get(source_id) {
            Some(links) => links.redirect,
            None => continue, // already tombstoned by an earlier splice in this pass
        };

        if !graph.is_live(target_id) {
            log::warn!(
                "preprocess: redirect source {} points to missing target {}, leaving source in place",
                source_id,
                target_id
            );
            continue;
        }

        if target_id == source_id {
            // Self-redirect: nothing to splice onto, just delete cleanly.
            graph.tombstone(source_id);
            continue;
        }

        let source_links = graph.tombstone(source_id).expect("checked live above");
        let target = graph
            .entries_mut()
            .get_mut(target_id as usize)
            .and_then(Option::as_mut)
            .expect("checked live above");
        target.incoming.extend(source_links.incoming);
    }
}

/// Pass B: collapse each surviving node's `incoming` to a duplicate-free,
/// self-reference-free set. Order after dedup is unspecified.
fn dedup_and_remove_self_loops(graph: &mut GraphStore) {
    let live_ids: Vec<NodeId> = graph.iter_live().map(|(id, _)| id).collect();

    for id in live_ids {
        let links = graph
            .entries_mut()
            .get_mut(id as usize)
            .and_then(Option::as_mut)
            .expect("id came from iter_live");

        let mut seen = HashSet::with_capacity(links.incoming.len());
        links.incoming.retain(|&src| src != id && seen.insert(src));
    }
}

/// Pass C: allocate the score vector at length equal to the identifier
/// table's high-water mark (not the live-node count), uniformly initialised.
fn allocate_initial_scores(graph: &GraphStore) -> Vec<f64> {
    let slot_count = graph.slot_count();
    let live_count = graph.live_count().max(1);
    vec![1.0 / live_count as f64; slot_count]
}
