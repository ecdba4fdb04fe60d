//! `fogowatch-feed` — blocking client for the fogos.pt fire feed.
//!
//! This crate is the single source of truth for the upstream wire contract:
//! the `{success, data}` envelope and the per-record projection into
//! canonical [`fogowatch_model::Record`]s.
//!
//! No retries — the poll loop is the retry. An explicit timeout keeps a
//! cycle from stalling indefinitely.

mod client;
mod ingest;

pub use client::{FeedClient, FeedError, DEFAULT_FEED_URL};
pub use ingest::snapshot_from_payload;
