//! Directory-based persistence for the three independent pieces of engine
//! state: the graph store (`pageweb`), the dense id→url array (`idtourl`),
//! and the score vector (`scores`).
//!
//! Dumping writes all three files; there is no cross-file transaction.
//! A missing file is a persistence miss: that structure resets to empty and
//! a warning is logged, rather than aborting the whole load. A file that
//! exists but fails to decode is a different, fatal condition — it means
//! the bytes on disk don't describe a valid snapshot, so it's propagated to
//! the caller instead of being silently discarded. `url_to_id` is never
//! persisted — it's rebuilt from `id_to_url` on load.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::graph::{GraphStore, PageLinks};
use crate::ids::IdentifierTable;

const PAGEWEB_FILE: &str = "pageweb";
const IDTOURL_FILE: &str = "idtourl";
const SCORES_FILE: &str = "scores";

#[derive(Serialize, Deserialize)]
struct StoredPageLinks {
    incoming: Vec<u32>,
    num_outgoing: usize,
    redirect: u32,
}

#[derive(Serialize, Deserialize)]
struct StoredGraph {
    // `None` entries are tombstones; index in this vec is the NodeId.
    slots: Vec<Option<StoredPageLinks>>,
}

pub fn dump(
    dir: &Path,
    graph: &GraphStore,
    ids: &IdentifierTable,
    scores: &[f64],
) -> Result<(), EngineError> {
    fs::create_dir_all(dir)?;

    dump_graph(&dir.join(PAGEWEB_FILE), graph)?;
    dump_urls(&dir.join(IDTOURL_FILE), ids)?;
    dump_scores(&dir.join(SCORES_FILE), scores)?;

    log::info!("persistence: dumped engine state to {}", dir.display());
    Ok(())
}

fn dump_graph(path: &Path, graph: &GraphStore) -> Result<(), EngineError> {
    let slots: Vec<Option<StoredPageLinks>> = (0..graph.slot_count())
        .map(|i| {
            graph.get(i as u32).map(|links| StoredPageLinks {
                incoming: links.incoming.clone(),
                num_outgoing: links.num_outgoing,
                redirect: links.redirect,
            })
        })
        .collect();
    let bytes = bincode::serialize(&StoredGraph { slots })?;
    fs::write(path, bytes)?;
    Ok(())
}

fn dump_urls(path: &Path, ids: &IdentifierTable) -> Result<(), EngineError> {
    let bytes = bincode::serialize(ids.dense_urls())?;
    fs::write(path, bytes)?;
    Ok(())
}

fn dump_scores(path: &Path, scores: &[f64]) -> Result<(), EngineError> {
    let bytes = bincode::serialize(scores)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Loads all three files from `dir`. A missing file resets that structure
/// to empty and logs a warning. A file that exists but fails to decode, or
/// any I/O error other than "not found", is fatal and propagated.
pub fn load(dir: &Path) -> Result<(GraphStore, IdentifierTable, Vec<f64>), EngineError> {
    let graph = load_graph(&dir.join(PAGEWEB_FILE))?;
    let ids = load_urls(&dir.join(IDTOURL_FILE))?;
    let scores = load_scores(&dir.join(SCORES_FILE))?;
    Ok((graph, ids, scores))
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, EngineError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(EngineError::Io(err)),
    }
}

fn load_graph(path: &Path) -> Result<GraphStore, EngineError> {
    let bytes = match read_optional(path)? {
        Some(bytes) => bytes,
        None => {
            log::warn!(
                "persistence: {} missing, resetting graph to empty",
                path.display()
            );
            return Ok(GraphStore::new());
        }
    };

    let stored: StoredGraph = bincode::deserialize(&bytes)?;

    let mut graph = GraphStore::new();
    for (i, slot) in stored.slots.into_iter().enumerate() {
        if let Some(stored_links) = slot {
            graph.set(
                i as u32,
                PageLinks {
                    incoming: stored_links.incoming,
                    num_outgoing: stored_links.num_outgoing,
                    redirect: stored_links.redirect,
                },
            );
        }
    }
    Ok(graph)
}

fn load_urls(path: &Path) -> Result<IdentifierTable, EngineError> {
    let bytes = match read_optional(path)? {
        Some(bytes) => bytes,
        None => {
            log::warn!(
                "persistence: {} missing, resetting identifier table to empty",
                path.display()
            );
            return Ok(IdentifierTable::new());
        }
    };

    let urls: Vec<String> = bincode::deserialize(&bytes)?;
    Ok(IdentifierTable::rebuild_reverse_map(urls))
}

fn load_scores(path: &Path) -> Result<Vec<f64>, EngineError> {
    let bytes = match read_optional(path)? {
        Some(bytes) => bytes,
        None => {
            log::warn!(
                "persistence: {} missing, resetting score vector to empty",
                path.display()
            );
            return Ok(Vec::new());
        }
    };

    let scores = bincode::deserialize(&bytes)?;
    Ok(scores)
}
