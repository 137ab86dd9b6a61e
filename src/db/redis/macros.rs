/// Read-through caching on top of [`Cache`](crate::db::Cache).
///
/// Returns the cached value on a hit. On a miss, or when the cache cannot be
/// read, awaits `$block`, queues the result for a background write with the
/// given TTL (seconds) and returns it. Errors from `$block` propagate with `?`;
/// cache errors never do.
///
/// ```rust,ignore
/// cached!(self.cache, CacheKey::MovieDetails(id), DETAILS_CACHE_TTL, async move {
///     self.fetch_movie_details(id).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(hit)) => Ok(hit),
            outcome => {
                if let Err(e) = outcome {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                }
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
