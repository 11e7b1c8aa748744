use url::Url;

use crate::errors::{DorkError, DorkResult};

/// Builds the search-engine URL that runs `query`. Pure; nothing is fetched.
pub fn search_url(base: &str, query: &str) -> DorkResult<String> {
    let url = Url::parse_with_params(base, &[("q", query)]).map_err(|e| {
        DorkError::ConfigError(format!("Invalid search engine URL '{}': {}", base, e))
    })?;
    Ok(url.into())
}
