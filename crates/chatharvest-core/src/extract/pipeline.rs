//! Pure filtering pipeline for fetched messages.
//!
//! Order is preserved from the external fetch throughout; re-running the
//! pipeline over an unchanged history yields an identical record sequence.

use chatharvest_types::analysis::Analysis;
use chatharvest_types::message::{MessageRecord, RawMessage};

/// Maximum number of recent messages requested from the client.
pub const FETCH_LIMIT: u32 = 1000;

/// Sliding window over message timestamps, in seconds (24 hours).
pub const WINDOW_SECS: i64 = 86_400;

/// Apply the 24-hour window and the analysis filter, then map to records.
///
/// `now` is unix seconds, sampled once at invocation time. The boundary is
/// inclusive: a message stamped exactly `now - 86400` is retained.
pub fn select_records(messages: Vec<RawMessage>, now: i64, analysis: &Analysis) -> Vec<MessageRecord> {
    let cutoff = now - WINDOW_SECS;
    messages
        .into_iter()
        .filter(|msg| msg.timestamp >= cutoff)
        .filter(|msg| analysis.matches(&msg.body))
        .map(MessageRecord::from)
        .collect()
}
