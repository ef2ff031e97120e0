//! Spec loading over the static HTTP surface.
//!
//! This is the "browser side" of the viewer: everything here goes through
//! HTTP against the staged assets, never the filesystem, so it sees exactly
//! what a browser would.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::LocaleConfig;
use crate::error::{Error, Result};
use crate::index::SpecIndex;
use crate::openapi::{Document, dereference};
use crate::project::{CONFIG_FILENAME, I18N_DIR, INDEX_FILENAME};

const FETCH_TIMEOUT_SECS: u64 = 10;

/// What a loader operation does when its fetch or parse fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    Propagate,
    Fallback,
}

#[derive(Debug, Clone, Copy)]
pub enum LoaderOp {
    ConfigFetch,
    IndexFetch,
    SpecFetch,
}

/// Per-operation failure policy. Only the language configuration may
/// degrade to a default; index and spec failures surface to the error view.
pub const fn failure_policy(op: LoaderOp) -> OnFailure {
    match op {
        LoaderOp::ConfigFetch => OnFailure::Fallback,
        LoaderOp::IndexFetch | LoaderOp::SpecFetch => OnFailure::Propagate,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableLanguages {
    pub source: String,
    pub targets: Vec<String>,
    pub all: Vec<String>,
}

impl AvailableLanguages {
    /// Safe default used when the configuration cannot be loaded.
    pub fn fallback() -> Self {
        Self {
            source: "en".to_string(),
            targets: Vec::new(),
            all: vec!["en".to_string()],
        }
    }

    fn from_config(config: LocaleConfig) -> Self {
        let mut all = vec![config.locale.source.clone()];
        all.extend(config.locale.targets.iter().cloned());
        Self {
            source: config.locale.source,
            targets: config.locale.targets,
            all,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpecLoader {
    client: reqwest::Client,
    base_url: String,
}

impl SpecLoader {
    /// `base_url` points at the static root,
    /// e.g. `http://127.0.0.1:4173/trans-spec`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|err| Error::io("Failed to build HTTP client", std::io::Error::other(err)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the persisted spec index. Re-fetched on every call, no caching.
    pub async fn spec_index(&self) -> Result<SpecIndex> {
        let raw = self.fetch_text(INDEX_FILENAME).await?;
        serde_json::from_str(&raw).map_err(|err| Error::SpecParseFailed {
            name: INDEX_FILENAME.to_string(),
            reason: err.to_string(),
        })
    }

    /// Languages declared by the staged `i18n.json`. Per the failure policy
    /// this never errors in practice; a broken or missing configuration
    /// yields [`AvailableLanguages::fallback`].
    pub async fn available_languages(&self) -> Result<AvailableLanguages> {
        let fetched = self.fetch_config().await;
        match fetched {
            Ok(config) => Ok(AvailableLanguages::from_config(config)),
            Err(err) => match failure_policy(LoaderOp::ConfigFetch) {
                OnFailure::Fallback => {
                    warn!(%err, "Could not load language configuration, using fallback");
                    Ok(AvailableLanguages::fallback())
                }
                OnFailure::Propagate => Err(err),
            },
        }
    }

    /// Resolve the viewer's default language: the browser's primary subtag
    /// when it is available, the configured source language otherwise.
    pub async fn default_language(&self, browser_language: Option<&str>) -> Result<String> {
        let languages = self.available_languages().await?;
        if let Some(raw) = browser_language {
            if let Some(primary) = primary_subtag(raw) {
                if languages.all.iter().any(|lang| *lang == primary) {
                    return Ok(primary);
                }
            }
        }
        Ok(languages.source)
    }

    /// First (alphabetically sorted) spec filename for `language`.
    pub async fn default_spec(&self, language: &str) -> Result<Option<String>> {
        let index = self.spec_index().await?;
        Ok(index.get(language).and_then(|files| files.first().cloned()))
    }

    /// Fetch, parse, and dereference one spec. Errors propagate to the UI.
    pub async fn load_spec(&self, language: &str, filename: &str) -> Result<Document> {
        let raw = self
            .fetch_text(&format!("{I18N_DIR}/{language}/{filename}"))
            .await?;
        let value: serde_yaml::Value =
            serde_yaml::from_str(&raw).map_err(|err| Error::SpecParseFailed {
                name: filename.to_string(),
                reason: err.to_string(),
            })?;
        let resolved = dereference(&value)?;
        Ok(Document::from_value(&resolved))
    }

    async fn fetch_config(&self) -> Result<LocaleConfig> {
        let raw = self.fetch_text(CONFIG_FILENAME).await?;
        serde_json::from_str(&raw).map_err(|err| Error::SpecParseFailed {
            name: CONFIG_FILENAME.to_string(),
            reason: err.to_string(),
        })
    }

    async fn fetch_text(&self, path: &str) -> Result<String> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "Fetching");
        let response = self.client.get(&url).send().await.map_err(|err| {
            Error::SpecFetchFailed {
                url: url.clone(),
                reason: err.to_string(),
            }
        })?;
        if !response.status().is_success() {
            return Err(Error::SpecFetchFailed {
                url,
                reason: format!("HTTP {}", response.status()),
            });
        }
        response.text().await.map_err(|err| Error::SpecFetchFailed {
            url,
            reason: err.to_string(),
        })
    }
}

/// Primary subtag of a browser language preference. Accepts bare tags
/// (`fr-CA`) and `Accept-Language` lists (`fr-CA,fr;q=0.9,en;q=0.8`).
pub fn primary_subtag(raw: &str) -> Option<String> {
    let first = raw.split(',').next()?.trim();
    let tag = first.split(';').next()?.trim();
    let primary = tag.split(['-', '_']).next()?.trim().to_ascii_lowercase();
    if primary.is_empty() || primary == "*" {
        return None;
    }
    Some(primary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn loader_for(server: &MockServer) -> SpecLoader {
        SpecLoader::new(format!("{}/trans-spec", server.uri())).unwrap()
    }

    async fn mount_config(server: &MockServer, body: &str) {
        Mock::given(method("GET"))
            .and(path("/trans-spec/i18n.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    const CONFIG: &str = r#"{
        "$schema": "https://lingo.dev/schema/i18n.json",
        "version": "1.12",
        "locale": { "source": "en", "targets": ["fr", "es"] },
        "buckets": { "yaml": { "include": ["i18n/[locale]/*.yaml"] } }
    }"#;

    #[test]
    fn primary_subtag_variants() {
        assert_eq!(primary_subtag("fr-CA"), Some("fr".to_string()));
        assert_eq!(primary_subtag("en"), Some("en".to_string()));
        assert_eq!(
            primary_subtag("fr-CA,fr;q=0.9,en;q=0.8"),
            Some("fr".to_string())
        );
        assert_eq!(primary_subtag("EN-us"), Some("en".to_string()));
        assert_eq!(primary_subtag("*"), None);
        assert_eq!(primary_subtag(""), None);
    }

    #[test]
    fn policy_table_is_explicit() {
        assert_eq!(failure_policy(LoaderOp::ConfigFetch), OnFailure::Fallback);
        assert_eq!(failure_policy(LoaderOp::IndexFetch), OnFailure::Propagate);
        assert_eq!(failure_policy(LoaderOp::SpecFetch), OnFailure::Propagate);
    }

    #[tokio::test]
    async fn available_languages_reads_the_config() {
        let server = MockServer::start().await;
        mount_config(&server, CONFIG).await;

        let languages = loader_for(&server).await.available_languages().await.unwrap();
        assert_eq!(languages.source, "en");
        assert_eq!(languages.targets, ["fr", "es"]);
        assert_eq!(languages.all, ["en", "fr", "es"]);
    }

    #[tokio::test]
    async fn missing_config_falls_back() {
        let server = MockServer::start().await;
        let languages = loader_for(&server).await.available_languages().await.unwrap();
        assert_eq!(languages, AvailableLanguages::fallback());
    }

    #[tokio::test]
    async fn malformed_config_falls_back() {
        let server = MockServer::start().await;
        mount_config(&server, "{ not json").await;
        let languages = loader_for(&server).await.available_languages().await.unwrap();
        assert_eq!(languages, AvailableLanguages::fallback());
    }

    #[tokio::test]
    async fn unreachable_server_falls_back() {
        let loader = SpecLoader::new("http://127.0.0.1:1/trans-spec").unwrap();
        let languages = loader.available_languages().await.unwrap();
        assert_eq!(languages, AvailableLanguages::fallback());
    }

    #[tokio::test]
    async fn default_language_prefers_the_browser() {
        let server = MockServer::start().await;
        mount_config(&server, CONFIG).await;
        let loader = loader_for(&server).await;

        assert_eq!(loader.default_language(Some("fr-CA")).await.unwrap(), "fr");
        assert_eq!(loader.default_language(Some("de-DE")).await.unwrap(), "en");
        assert_eq!(loader.default_language(None).await.unwrap(), "en");
    }

    #[tokio::test]
    async fn default_spec_is_first_in_the_index() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trans-spec/index.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"en": ["a.yaml", "b.yaml"], "es": []}"#,
            ))
            .mount(&server)
            .await;
        let loader = loader_for(&server).await;

        assert_eq!(
            loader.default_spec("en").await.unwrap(),
            Some("a.yaml".to_string())
        );
        assert_eq!(loader.default_spec("es").await.unwrap(), None);
        assert_eq!(loader.default_spec("fr").await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_index_propagates() {
        let server = MockServer::start().await;
        let err = loader_for(&server).await.spec_index().await.unwrap_err();
        assert!(matches!(err, Error::SpecFetchFailed { .. }));
    }

    #[tokio::test]
    async fn load_spec_dereferences_internal_refs() {
        let server = MockServer::start().await;
        let spec = r#"
openapi: 3.0.0
info:
  title: Widget API
paths:
  /widgets:
    get:
      tags: [Widgets]
      parameters:
        - $ref: '#/components/parameters/Limit'
      responses:
        "200":
          description: OK
components:
  parameters:
    Limit:
      name: limit
      in: query
      schema:
        type: integer
"#;
        Mock::given(method("GET"))
            .and(path("/trans-spec/i18n/en/api.yaml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(spec))
            .mount(&server)
            .await;

        let doc = loader_for(&server)
            .await
            .load_spec("en", "api.yaml")
            .await
            .unwrap();
        let op = doc.operation("/widgets", "get").unwrap();
        assert_eq!(op.parameters.len(), 1, "the $ref must be inlined");
        assert_eq!(op.parameters[0].name, "limit");
        assert_eq!(op.parameters[0].schema_type.as_deref(), Some("integer"));
    }

    #[tokio::test]
    async fn unparsable_spec_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trans-spec/i18n/en/api.yaml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(": not yaml ["))
            .mount(&server)
            .await;

        let err = loader_for(&server)
            .await
            .load_spec("en", "api.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SpecParseFailed { .. }));
    }
}
