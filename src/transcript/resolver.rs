//! Maps the playback position to the word being spoken

use super::Token;
use std::sync::Arc;

/// Index of the token whose interval contains `elapsed_ms`
///
/// Overlapping intervals resolve to the lowest index. Returns `None` in gaps
/// and before or after every token.
pub(crate) fn resolve(elapsed_ms: u64, tokens: &[Arc<Token>]) -> Option<usize> {
    tokens.iter().position(|token| token.contains(elapsed_ms))
}
