// Cache-busting query parameter.
//
// Both polled endpoints sit behind CDNs (raw.githubusercontent.com and a
// shared-cache proxy). A uniquely varying `t` parameter forces a fresh copy.

use chrono::Utc;
use url::Url;

/// Query parameter name carrying the cache-buster.
pub const PARAM: &str = "t";

/// Return `url` with `t=<millis>` appended, replacing any existing `t`.
pub fn with_cache_buster(url: &Url, millis: i64) -> Url {
    let mut busted = url.clone();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut pairs = busted.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(PARAM, &millis.to_string());
    }
    busted
}

/// Cache-bust `url` with the current wall-clock time in milliseconds.
pub fn now(url: &Url) -> Url {
    with_cache_buster(url, Utc::now().timestamp_millis())
}
