//! Packet dump client library.
//!
//! This crate implements a synchronous TCP client for a fixed-format
//! binary packet-dump protocol. The `feed_dump` binary uses these
//! modules to turn a partial stream into a complete, ordered dataset:
//!
//! - `wire`: request encoding and 17-byte response frame decoding with
//!   semantic validation
//! - `gaps`: detection of sequence numbers missing from the observed
//!   contiguous range
//! - `fetch`: the bulk stream fetch, the per-sequence recovery fetch,
//!   and assembly of the final sorted result
//! - `logger`: best-effort dated error log on disk
//! - `output`: timestamped JSON persistence of the assembled packets
//!
//! The bulk path fails fast on any validation error; the recovery path
//! tolerates per-item failures and returns whatever it managed to fetch.
pub mod error;
pub mod fetch;
pub mod gaps;
pub mod logger;
pub mod output;
pub mod wire;
