use crate::config::{QueryConfig, ServiceOptions};
use crate::endpoint;
use crate::error::PodQueryError;
use crate::federated::FederatedEngine;
use crate::fetch::AuthenticatedFetch;
use crate::normalize::normalize;
use crate::pattern::TriplePattern;
use crate::resource::{self, check_url};
use crate::results::QueryResult;
use crate::router::{route, QueryRoute};
use crate::session::{Session, SessionManager};
use oxrdf::Triple;
use std::sync::{Arc, OnceLock};

/// The entry point for every Pod operation.
///
/// A service owns a [`SessionManager`] and a single [`FederatedEngine`], which is created the
/// first time a query needs it and reused afterwards. Clones share both.
///
/// Usage example:
/// ```no_run
/// use podsparql::{PodQueryService, QueryConfig, ServiceOptions};
///
/// # tokio_test::block_on(async {
/// let service = PodQueryService::new(ServiceOptions::default());
/// service.initialize(QueryConfig::new(
///     "https://pod.example/",
///     "https://pod.example/profile/card#me",
/// ))?;
/// let json = service
///     .query(
///         "https://pod.example/vocab.ttl",
///         "SELECT ?label WHERE { ?c <http://www.w3.org/2004/02/skos/core#prefLabel> ?label }",
///     )
///     .await?;
/// println!("{json}");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// # }).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct PodQueryService {
    inner: Arc<ServiceInner>,
}

#[derive(Debug)]
struct ServiceInner {
    sessions: SessionManager,
    engine: OnceLock<FederatedEngine>,
    options: ServiceOptions,
}

impl Default for PodQueryService {
    fn default() -> Self {
        Self::new(ServiceOptions::default())
    }
}

impl PodQueryService {
    pub fn new(options: ServiceOptions) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                sessions: SessionManager::new(),
                engine: OnceLock::new(),
                options,
            }),
        }
    }

    /// Starts a session with the default HTTP transport, replacing the current one.
    ///
    /// Operations already running keep the session they started with.
    ///
    /// Known race: re-initialization is not synchronized with in-flight calls. A call takes its
    /// session when it is first polled, so a call created before this method returns but polled
    /// after it runs under the new session.
    pub fn initialize(&self, config: QueryConfig) -> Result<Arc<Session>, PodQueryError> {
        self.inner.sessions.initialize(config, &self.inner.options)
    }

    /// Starts a session around a custom transport, replacing the current one.
    pub fn install(&self, config: QueryConfig, fetch: Arc<dyn AuthenticatedFetch>) -> Arc<Session> {
        self.inner.sessions.install(config, fetch)
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    /// Fetches the Turtle representation of the resource at `url`.
    pub async fn read(&self, url: &str) -> Result<String, PodQueryError> {
        let session = self.inner.sessions.current()?;
        resource::read_resource(session.fetch(), url).await
    }

    /// Appends the triples written in `turtle` to the resource at `url`.
    pub async fn append(&self, url: &str, turtle: &str) -> Result<usize, PodQueryError> {
        let session = self.inner.sessions.current()?;
        resource::append_triples(session.fetch(), url, turtle).await
    }

    /// Lists the members of the container at `url`.
    pub async fn list(&self, url: &str) -> Result<Vec<String>, PodQueryError> {
        let session = self.inner.sessions.current()?;
        resource::list_container(session.fetch(), url).await
    }

    /// Returns the triples of the resource at `url` matching `pattern`, in document order.
    pub async fn match_triples(
        &self,
        url: &str,
        pattern: &TriplePattern,
    ) -> Result<Vec<Triple>, PodQueryError> {
        let session = self.inner.sessions.current()?;
        resource::match_resource(session.fetch(), url, pattern).await
    }

    /// Executes `query` against the resource at `url`.
    ///
    /// The query goes to the session's SPARQL endpoint when one is configured. Otherwise it is
    /// evaluated by the federated engine with the resource as its only source.
    pub async fn execute(&self, url: &str, query: &str) -> Result<QueryResult, PodQueryError> {
        let session = self.inner.sessions.current()?;
        check_url(url)?;
        let result = match route(session.config(), url) {
            QueryRoute::Direct { endpoint } => {
                tracing::debug!(
                    url,
                    endpoint = endpoint.as_str(),
                    "Routing query to the SPARQL endpoint"
                );
                endpoint::execute(session.fetch(), &endpoint, query)
                    .await?
                    .into_query_result()?
            }
            QueryRoute::Federated { sources } => {
                tracing::debug!(url, "Routing query to the federated engine");
                self.engine()
                    .execute(&sources, query, session.fetch())
                    .await?
            }
        };
        tracing::debug!(
            url,
            generation = session.generation(),
            kind = result.kind(),
            "Query executed"
        );
        Ok(result)
    }

    /// Executes `query` against the resource at `url` and returns the canonical encoding of the
    /// result.
    pub async fn query(&self, url: &str, query: &str) -> Result<String, PodQueryError> {
        normalize(&self.execute(url, query).await?)
    }

    fn engine(&self) -> &FederatedEngine {
        self.inner.engine.get_or_init(|| {
            tracing::debug!(
                permits = self.inner.options.engine_permits.get(),
                "Creating the federated query engine"
            );
            FederatedEngine::new(self.inner.options.engine_permits)
        })
    }
}
