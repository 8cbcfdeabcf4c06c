//! Link-graph ingest, redirect resolution, and PageRank engine.
//!
//! This crate is the core of a larger encyclopedic-dump indexing pipeline:
//! it accepts a stream of `(article, outgoing_links, optional_redirect)`
//! records produced by upstream cleaners, canonicalises them into a
//! compact integer-indexed directed graph, resolves single-hop redirect
//! indirection, and iteratively computes a fixed-point PageRank vector
//! that can be dumped to and reloaded from persistent storage.
//!
//! The XML/bz2 decoder, the wikitext cleaner, the term-frequency indexer,
//! and the IPC transport that feed this engine in the larger pipeline are
//! out of scope here — this crate owns only the graph and its ranking.
//!
//! [`Engine`] is the single entry point: construct one, call
//! [`Engine::add_page`] once per record, call [`Engine::preprocess`]
//! exactly once, then [`Engine::run`] as many times as needed.

pub mod engine;
pub mod error;
pub mod graph;
pub mod ids;
pub mod pagerank;
pub mod persistence;
pub mod preprocess;

pub use engine::Engine;
pub use error::EngineError;
pub use graph::{NodeId, NULL_ID};
pub use pagerank::{IterationReport, DAMPING_FACTOR};
