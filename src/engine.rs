use std::collections::HashMap;
use std::path::Path;

use crate::error::EngineError;
use crate::graph::{GraphStore, PageRecord};
use crate::ids::IdentifierTable;
use crate::pagerank::{self, IterationReport, DAMPING_FACTOR};
use crate::persistence;
use crate::preprocess;

/// A single owned value packaging the identifier table, graph store, and
/// score vector that together make up the link-graph engine.
///
/// Replaces the process-wide singleton globals of the source system: the
/// surrounding pipeline holds exactly one `Engine`, and tests can
/// instantiate independent ones.
pub struct Engine {
    ids: IdentifierTable,
    graph: GraphStore,
    scores: Vec<f64>,
    live_count: usize,
}

impl Engine {
    pub fn new() -> Self {
        Engine {
            ids: IdentifierTable::new(),
            graph: GraphStore::new(),
            scores: Vec::new(),
            live_count: 0,
        }
    }

    /// Sole ingest entry point. `links` may be empty for a redirect page.
    pub fn add_page(&mut self, url: &str, links: &[String], redirect: Option<&str>) {
        self.graph.add_page(
            PageRecord {
                url,
                links,
                redirect,
            },
            &mut self.ids,
        );
    }

    /// Must be called once after ingest and before [`Engine::run`].
    pub fn preprocess(&mut self) {
        self.scores = preprocess::run(&mut self.graph);
        self.live_count = self.graph.live_count();
    }

    /// Runs `iterations` power-method steps (>= 1) and returns the exported
    /// `url -> score` map for all live nodes, alongside a per-iteration
    /// report of delta and broken-incoming counts.
    pub fn run(&mut self, iterations: usize) -> (HashMap<String, f64>, Vec<IterationReport>) {
        let reports = pagerank::run(
            &self.graph,
            &mut self.scores,
            self.live_count,
            DAMPING_FACTOR,
            iterations,
        );
        let exported = pagerank::export_scores(&self.graph, &self.ids, &self.scores);
        (exported, reports)
    }

    /// Same as [`Engine::run`] with an explicit damping factor, for tests
    /// and callers that need to deviate from the specified default.
    pub fn run_with_damping(
        &mut self,
        damping: f64,
        iterations: usize,
    ) -> (HashMap<String, f64>, Vec<IterationReport>) {
        let reports = pagerank::run(
            &self.graph,
            &mut self.scores,
            self.live_count,
            damping,
            iterations,
        );
        let exported = pagerank::export_scores(&self.graph, &self.ids, &self.scores);
        (exported, reports)
    }

    /// `(live_node_count, total_outgoing_edge_count)`.
    pub fn stats(&self) -> (usize, usize) {
        self.graph.stats()
    }

    pub fn log_stats(&self) {
        self.graph.log_stats();
    }

    pub fn dump(&self, dir: &Path) -> Result<(), EngineError> {
        persistence::dump(dir, &self.graph, &self.ids, &self.scores)
    }

    /// May be called on an empty, freshly constructed engine before any
    /// ingest.
    pub fn load(dir: &Path) -> Result<Self, EngineError> {
        let (graph, ids, scores) = persistence::load(dir)?;
        let live_count = graph.live_count();
        Ok(Engine {
            ids,
            graph,
            scores,
            live_count,
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(engine: &mut Engine, url: &str, links: &[&str]) {
        let owned: Vec<String> = links.iter().map(|s| s.to_string()).collect();
        engine.add_page(url, &owned, None);
    }

    fn redirect_page(engine: &mut Engine, url: &str, target: &str) {
        engine.add_page(url, &[], Some(target));
    }

    #[test]
    fn star_with_redirect_matches_spec_scenario() {
        let mut engine = Engine::new();
        page(&mut engine, "A", &["B"]);
        redirect_page(&mut engine, "R", "B");
        page(&mut engine, "C", &["R"]);

        engine.preprocess();
        let (scores, _reports) = engine.run(50);

        assert!(!scores.contains_key("R"));
        assert!(scores["B"] > scores["A"]);
        assert!(scores["B"] > scores["C"]);
    }

    #[test]
    fn dump_then_load_reproduces_stats_and_scores() {
        let mut engine = Engine::new();
        page(&mut engine, "A", &["B"]);
        page(&mut engine, "B", &["A"]);
        engine.preprocess();
        engine.run(10);

        let dir = tempfile::tempdir().unwrap();
        engine.dump(dir.path()).unwrap();

        let mut loaded = Engine::load(dir.path()).unwrap();
        assert_eq!(loaded.stats(), engine.stats());

        let (scores_before, _) = engine.run(5);
        let (scores_after, _) = loaded.run(5);
        for (url, score) in &scores_before {
            assert!((scores_after[url] - score).abs() < 1e-9);
        }
    }

    #[test]
    fn broken_incoming_is_counted_not_fatal() {
        let mut engine = Engine::new();
        page(&mut engine, "A", &["B"]);
        page(&mut engine, "B", &["A"]);
        engine.preprocess();

        // Artificially delete a live node's entry to simulate corruption.
        let b_id = {
            // `ids` and `graph` are private; reach in via a fresh ingest path
            // is not possible from outside the module, so this test lives in
            // the engine's own test module where the fields are visible.
            let b_id = engine.ids.lookup("B").unwrap();
            engine.graph.tombstone(b_id);
            b_id
        };
        let _ = b_id;

        let (_scores, reports) = engine.run(1);
        assert!(reports[0].broken_incoming > 0);
    }
}
