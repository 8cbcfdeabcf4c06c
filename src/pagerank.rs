//! Fixed-iteration power-method PageRank over a preprocessed [`GraphStore`].
//!
//! Dense, double-buffered: each iteration reads last round's scores out of a
//! snapshot (`shadow`) while writing the next round's into a fresh vector,
//! so the computation never observes a partially-updated score. The
//! iterator pulls directly from the graph store rather than owning a
//! separate copy of the edge lists, so the same storage backs ingest,
//! preprocessing, and ranking.
use rayon::prelude::*;

use crate::graph::{GraphStore, NodeId};

/// The PageRank damping factor, fixed by specification.
pub const DAMPING_FACTOR: f64 = 0.85;

/// Per-iteration report: how much the score vector moved, and how many
/// incoming references failed to resolve to a live node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationReport {
    pub delta: f64,
    pub broken_incoming: usize,
}

/// Runs exactly `iterations` power-method steps over `scores`, mutating it
/// in place. `scores.len()` must equal `graph.slot_count()`; `live_count`
/// must be the live-node count captured at preprocessing time, not
/// recomputed per iteration — tombstoning during a run would otherwise
/// shift the damping base mid-computation.
///
/// Returns one [`IterationReport`] per iteration, in order.
pub fn run(
    graph: &GraphStore,
    scores: &mut [f64],
    live_count: usize,
    damping: f64,
    iterations: usize,
) -> Vec<IterationReport> {
    assert!(iterations >= 1, "iterations must be >= 1");
    let mut reports = Vec::with_capacity(iterations);
    let base = (1.0 - damping) / live_count.max(1) as f64;

    for _ in 0..iterations {
        let shadow = scores.to_vec();
        let broken_incoming = std::sync::atomic::AtomicUsize::new(0);

        let new_scores: Vec<f64> = (0..scores.len())
            .into_par_iter()
            .map(|i| {
                let id = i as NodeId;
                let entry = match graph.get(id) {
                    Some(entry) => entry,
                    None => return shadow[i], // tombstoned: value is never read downstream
                };

                let mut sum = 0.0;
                for &j in &entry.incoming {
                    match graph.get(j) {
                        Some(source) if source.num_outgoing > 0 => {
                            sum += shadow[j as usize] / source.num_outgoing as f64;
                        }
                        Some(_) => {
                            // dangling source: contributes nothing, not broken.
                        }
                        None => {
                            broken_incoming.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                        }
                    }
                }

                base + damping * sum
            })
            .collect();

        let delta: f64 = shadow
            .iter()
            .zip(new_scores.iter())
            .map(|(&old, &new)| (old - new).abs())
            .sum();
        let broken = broken_incoming.load(std::sync::atomic::Ordering::Relaxed);

        scores.copy_from_slice(&new_scores);
        log::debug!(
            "pagerank: iteration delta={:.6e} broken_incoming={}",
            delta,
            broken
        );
        reports.push(IterationReport {
            delta,
            broken_incoming: broken,
        });
    }

    reports
}

/// Exports `url -> score` for every node currently live in `graph`,
/// filtering out tombstoned (former redirect-source) slots.
pub fn export_scores(
    graph: &GraphStore,
    ids: &crate::ids::IdentifierTable,
    scores: &[f64],
) -> std::collections::HashMap<String, f64> {
    graph
        .iter_live()
        .filter_map(|(id, _)| {
            ids.url_for(id)
                .map(|url| (url.to_string(), scores[id as usize]))
        })
        .collect()
}
