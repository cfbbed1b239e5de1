//! The generic path: queries evaluated locally over documents fetched from the Pod.

use crate::error::PodQueryError;
use crate::fetch::{AuthenticatedFetch, FetchRequest, FetchResponse};
use crate::results::{BindingRow, QueryResult};
use crate::store::QuadStore;
use futures::future::try_join_all;
use oxigraph::model::GraphName;
use oxigraph::sparql::{Query, QueryResults};
use oxigraph::store::Store;
use oxrdfio::RdfFormat;
use reqwest::header::{ACCEPT, CACHE_CONTROL, PRAGMA};
use std::num::NonZeroUsize;
use tokio::sync::Semaphore;

const ACCEPTED_SOURCES: &str = "text/turtle, application/n-triples;q=0.9, */*;q=0.1";

/// Evaluates SPARQL queries over one or more Pod resources.
///
/// Every call fetches its sources again, bypassing HTTP caches, and evaluates the query over a
/// private in-memory dataset that is dropped afterwards. The engine keeps no query state between
/// calls. Loading and evaluation run on the blocking thread pool and are gated by a semaphore so
/// that at most `permits` queries are evaluated at the same time.
#[derive(Debug)]
pub struct FederatedEngine {
    permits: Semaphore,
}

impl Default for FederatedEngine {
    fn default() -> Self {
        Self::new(NonZeroUsize::MIN)
    }
}

impl FederatedEngine {
    pub fn new(permits: NonZeroUsize) -> Self {
        Self {
            permits: Semaphore::new(permits.get()),
        }
    }

    /// Executes `query` over the union of `sources`.
    ///
    /// Relative IRIs in the query are resolved against the first source, like relative IRIs in
    /// the source documents themselves.
    pub async fn execute(
        &self,
        sources: &[String],
        query: &str,
        fetch: &dyn AuthenticatedFetch,
    ) -> Result<QueryResult, PodQueryError> {
        let base_iri = sources.first().map(String::as_str);
        let query = Query::parse(query, base_iri).map_err(PodQueryError::evaluation)?;

        let documents =
            try_join_all(sources.iter().map(|source| fetch_source(fetch, source))).await?;

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(PodQueryError::evaluation)?;
        let sources = sources.to_vec();
        tokio::task::spawn_blocking(move || evaluate(&sources, documents, query))
            .await
            .map_err(PodQueryError::evaluation)?
    }
}

/// Loads `documents` into a fresh dataset and evaluates `query` over it.
fn evaluate(
    sources: &[String],
    documents: Vec<FetchResponse>,
    query: Query,
) -> Result<QueryResult, PodQueryError> {
    let dataset = Store::new().map_err(PodQueryError::evaluation)?;
    for (source, document) in sources.iter().zip(documents) {
        let format = document
            .media_type()
            .and_then(|media_type| RdfFormat::from_media_type(&media_type))
            .unwrap_or(RdfFormat::Turtle);
        let triples = QuadStore::load(format, &document.body, source)?.into_triples();
        tracing::debug!(
            source = source.as_str(),
            triples = triples.len(),
            "Loaded query source"
        );
        dataset
            .extend(
                triples
                    .into_iter()
                    .map(|triple| triple.in_graph(GraphName::DefaultGraph)),
            )
            .map_err(PodQueryError::evaluation)?;
    }
    let results = dataset.query(query).map_err(PodQueryError::evaluation)?;
    collect_results(results)
}

async fn fetch_source(
    fetch: &dyn AuthenticatedFetch,
    source: &str,
) -> Result<FetchResponse, PodQueryError> {
    let request = FetchRequest::get(source)
        .with_header(ACCEPT, ACCEPTED_SOURCES)
        .with_header(CACHE_CONTROL, "no-cache")
        .with_header(PRAGMA, "no-cache");
    Ok(fetch.fetch(request).await?.error_for_status(source)?)
}

fn collect_results(results: QueryResults) -> Result<QueryResult, PodQueryError> {
    match results {
        QueryResults::Solutions(solutions) => {
            let vars = solutions.variables().to_vec();
            let rows = solutions
                .map(|solution| solution.map(|solution| solution.iter().collect::<BindingRow>()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(PodQueryError::evaluation)?;
            Ok(QueryResult::Bindings { vars, rows })
        }
        QueryResults::Graph(triples) => Ok(QueryResult::Quads {
            triples: triples
                .collect::<Result<Vec<_>, _>>()
                .map_err(PodQueryError::evaluation)?,
        }),
        QueryResults::Boolean(value) => Ok(QueryResult::Boolean { value }),
    }
}
