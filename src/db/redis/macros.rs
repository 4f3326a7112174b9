/// Read-through caching for a computed value.
///
/// Returns the cached value for `$key` when present. Otherwise awaits `$fut`,
/// queues the result for a background write with `$ttl` seconds to live, and
/// returns it. Expands to an `AppResult`, so it must be used inside a function
/// returning one.
///
/// # Example
/// ```rust,ignore
/// let scores: Vec<ScoredMovie> = cached!(cache, CacheKey::JournoScores, 60, async {
///     compute_scores(repo).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $fut:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            $crate::error::AppResult::Ok(cached)
        } else {
            let value = $fut.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            $crate::error::AppResult::Ok(value)
        }
    }};
}
