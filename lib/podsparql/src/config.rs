use serde::Deserialize;
use std::fmt;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Identifies a Pod session.
///
/// A config is immutable once built. Re-initializing a session replaces it wholesale, nothing is
/// merged with the previous one.
///
/// It deserializes from the camelCase JSON used by the tool surface:
/// ```
/// use podsparql::QueryConfig;
///
/// let config: QueryConfig = serde_json::from_str(r#"{
///     "podUrl": "https://alice.solidcommunity.net/",
///     "webId": "https://alice.solidcommunity.net/profile/card#me",
///     "sparqlEndpoint": "https://alice.solidcommunity.net/sparql"
/// }"#)?;
/// assert_eq!(config.sparql_endpoint(), Some("https://alice.solidcommunity.net/sparql"));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QueryConfig {
    pod_url: String,
    web_id: String,
    #[serde(flatten)]
    credentials: Credentials,
    #[serde(default)]
    oidc_issuer: Option<String>,
    #[serde(default)]
    sparql_endpoint: Option<String>,
}

impl QueryConfig {
    pub fn new(pod_url: impl Into<String>, web_id: impl Into<String>) -> Self {
        Self {
            pod_url: pod_url.into(),
            web_id: web_id.into(),
            credentials: Credentials::default(),
            oidc_issuer: None,
            sparql_endpoint: None,
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    #[must_use]
    pub fn with_oidc_issuer(mut self, oidc_issuer: impl Into<String>) -> Self {
        self.oidc_issuer = Some(oidc_issuer.into());
        self
    }

    /// Sets the SPARQL endpoint queries are sent to instead of the federated engine.
    #[must_use]
    pub fn with_sparql_endpoint(mut self, sparql_endpoint: impl Into<String>) -> Self {
        self.sparql_endpoint = Some(sparql_endpoint.into());
        self
    }

    pub fn pod_url(&self) -> &str {
        &self.pod_url
    }

    pub fn web_id(&self) -> &str {
        &self.web_id
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn oidc_issuer(&self) -> Option<&str> {
        self.oidc_issuer.as_deref()
    }

    /// The configured SPARQL endpoint. An empty string counts as unset.
    pub fn sparql_endpoint(&self) -> Option<&str> {
        self.sparql_endpoint
            .as_deref()
            .filter(|endpoint| !endpoint.is_empty())
    }
}

impl fmt::Debug for QueryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryConfig")
            .field("pod_url", &self.pod_url)
            .field("web_id", &self.web_id)
            .field("credentials", &self.credentials)
            .field("oidc_issuer", &self.oidc_issuer)
            .field("sparql_endpoint", &self.sparql_endpoint)
            .finish()
    }
}

/// Client credentials of a Pod session.
///
/// Only the access token is sent over the wire, as a bearer token. How it was obtained is up to
/// the caller.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Tuning of a [`PodQueryService`](crate::PodQueryService).
#[derive(Clone, Debug)]
pub struct ServiceOptions {
    /// How many federated queries may be evaluated at the same time.
    pub engine_permits: NonZeroUsize,
    /// Timeout applied by the HTTP transport to every request. `None` waits forever.
    pub request_timeout: Option<Duration>,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            engine_permits: NonZeroUsize::MIN,
            request_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sparql_endpoint_is_unset() {
        let config = QueryConfig::new("https://pod.example/", "https://pod.example/card#me")
            .with_sparql_endpoint("");
        assert_eq!(config.sparql_endpoint(), None);
    }

    #[test]
    fn deserializes_credentials_inline() -> Result<(), serde_json::Error> {
        let config: QueryConfig = serde_json::from_str(
            r#"{
                "podUrl": "https://pod.example/",
                "webId": "https://pod.example/card#me",
                "clientId": "client",
                "clientSecret": "secret",
                "oidcIssuer": "https://idp.example"
            }"#,
        )?;
        assert_eq!(config.credentials().client_id.as_deref(), Some("client"));
        assert_eq!(config.credentials().client_secret.as_deref(), Some("secret"));
        assert_eq!(config.oidc_issuer(), Some("https://idp.example"));
        assert_eq!(config.sparql_endpoint(), None);
        Ok(())
    }

    #[test]
    fn debug_hides_secrets() {
        let config = QueryConfig::new("https://pod.example/", "https://pod.example/card#me")
            .with_credentials(Credentials {
                client_id: Some("client".to_owned()),
                client_secret: Some("secret".to_owned()),
                access_token: Some("token".to_owned()),
            });
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret\""), "{debug}");
        assert!(!debug.contains("token\""), "{debug}");
    }
}
