pub mod catalog;
pub mod graph;
pub mod journo_score;
pub mod preferences;
pub mod ratings;
pub mod scoreboard;
pub mod seed;

use crate::db::{Cache, CacheKey};

/// Drops cached scores after a write that changes them
///
/// A failed delete is logged rather than returned: the write already
/// succeeded and the entries expire on their own.
pub(crate) async fn invalidate_scores(cache: Option<&Cache>, keys: &[CacheKey]) {
    let Some(cache) = cache else {
        return;
    };

    if let Err(e) = cache.invalidate(keys).await {
        tracing::warn!(error = %e, "Failed to invalidate cached scores");
    }
}
