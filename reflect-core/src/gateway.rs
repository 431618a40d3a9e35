//! Contracts for the remote collaborators: the entry store, the stats
//! endpoint and the AI text services. Transport lives behind the
//! [`Gateway`] trait so the session controller can be driven by a mock
//! in tests.

use std::collections::HashMap;

use thiserror::Error;

use crate::entry::Entry;
use crate::progress::ProgressSnapshot;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network or parse failure. Always recoverable; callers keep their
    /// local state and surface a transient notice.
    #[error("transport error: {0}")]
    Transport(String),
    /// Structured `{error}` returned by the server, surfaced verbatim.
    #[error("{0}")]
    Remote(String),
    /// A 2xx response whose body does not match the expected contract.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    /// An import payload without a recognizable entries mapping.
    #[error("invalid import payload: {0}")]
    InvalidPayload(String),
}

/// Authoritative result of an upsert. The server decides whether an
/// empty-text save deletes the entry instead of storing it.
#[derive(Debug, Clone)]
pub enum SaveOutcome {
    Saved {
        entry: Entry,
        encouragement: Option<String>,
    },
    Deleted,
}

pub trait Gateway {
    /// Fetches every stored entry, keyed by day key. Fails soft: any
    /// transport problem yields an empty map so the client stays usable
    /// offline with a blank journal.
    fn fetch_all(&self) -> HashMap<String, Entry>;

    /// Upserts the entry for `key`. The returned entry's sentiment is
    /// authoritative and may differ between calls for identical text.
    fn save(
        &self,
        key: &str,
        text: &str,
        photos: &[String],
        tags: &[String],
    ) -> Result<SaveOutcome, GatewayError>;

    fn delete(&self, key: &str) -> Result<(), GatewayError>;

    fn fetch_stats(&self) -> Result<ProgressSnapshot, GatewayError>;

    /// Rewrites `text` into a clearer entry, returning the replacement.
    fn rewrite(&self, text: &str) -> Result<String, GatewayError>;

    /// Builds a full entry from collected nudges. `date_label` is a
    /// human-readable day description for the generation prompt.
    fn generate_from_nudges(
        &self,
        nudges: &[String],
        date_label: &str,
    ) -> Result<String, GatewayError>;

    /// Whole-journal JSON snapshot for backup.
    fn export(&self) -> Result<serde_json::Value, GatewayError>;

    /// Restores a journal from an exported snapshot. Payloads without an
    /// entries mapping are rejected with [`GatewayError::InvalidPayload`].
    /// Returns the number of imported entries.
    fn import(&self, payload: &serde_json::Value) -> Result<usize, GatewayError>;
}
