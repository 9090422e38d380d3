//! Reco - Hybrid Retrieval-and-Ranking Engine
//!
//! Retrieves, filters, and ranks catalog items in response to a free-text
//! request. A preference extractor turns the query into a structured
//! constraint profile, a vector similarity index produces scored candidates,
//! a filter engine applies hard and soft constraints, and a multi-signal
//! ranker merges embedding similarity with rule-based relevance scoring.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod extract;
pub mod filter;
pub mod history;
pub mod index;
pub mod rank;

pub use error::{RecoError, Result};
