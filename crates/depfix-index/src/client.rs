//! Package index client.

use std::rc::Rc;
use std::time::Duration;

use reqwest::blocking::Client;

use depfix_core::config::IndexConfig;
use depfix_util::errors::DepfixError;

use crate::metadata::{self, ProjectMetadata};

/// Source of release listings and project metadata.
///
/// Every call is blocking. `Ok(None)` means the index does not know the
/// project; transport and decoding problems are
/// [`DepfixError::RegistryUnavailable`].
pub trait PackageIndex {
    /// Fetch metadata for a normalised project name.
    fn project(&self, name: &str) -> Result<Option<Rc<ProjectMetadata>>, DepfixError>;

    /// Installable release versions of `name`, in no particular order.
    fn available_versions(&self, name: &str) -> Result<Vec<String>, DepfixError> {
        Ok(self
            .project(name)?
            .map(|meta| meta.release_versions())
            .unwrap_or_default())
    }
}

/// Blocking client for the JSON API served at `<url>/pypi/<name>/json`.
pub struct JsonApiClient {
    client: Client,
    base_url: String,
}

impl JsonApiClient {
    /// Build a client from `[index]` configuration.
    pub fn new(config: &IndexConfig) -> miette::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DepfixError::Generic {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the project metadata document.
    pub fn project_url(&self, name: &str) -> String {
        format!("{}/pypi/{name}/json", self.base_url)
    }
}

impl PackageIndex for JsonApiClient {
    fn project(&self, name: &str) -> Result<Option<Rc<ProjectMetadata>>, DepfixError> {
        let url = self.project_url(name);
        tracing::debug!(package = name, %url, "fetching project metadata");

        let unavailable = |message: String| DepfixError::RegistryUnavailable {
            package: name.to_string(),
            message,
        };

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| unavailable(format!("request to {url} failed: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(package = name, "not found on index");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(unavailable(format!("HTTP {status} fetching {url}")));
        }

        let body = resp
            .text()
            .map_err(|e| unavailable(format!("failed to read response from {url}: {e}")))?;
        let meta = metadata::parse_project(&body).map_err(|e| unavailable(e.to_string()))?;
        Ok(Some(Rc::new(meta)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_url_layout() {
        let config = IndexConfig {
            url: "https://mirror.example.com/".to_string(),
            ..IndexConfig::default()
        };
        let client = JsonApiClient::new(&config).unwrap();
        assert_eq!(
            client.project_url("urllib3"),
            "https://mirror.example.com/pypi/urllib3/json"
        );
    }

    #[test]
    fn unreachable_index_is_registry_unavailable() {
        let config = IndexConfig {
            url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..IndexConfig::default()
        };
        let client = JsonApiClient::new(&config).unwrap();
        let err = client.project("requests").unwrap_err();
        assert!(matches!(err, DepfixError::RegistryUnavailable { .. }));
    }
}
