use crate::config::QueryConfig;

/// How a query is executed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryRoute {
    /// Send the query text to this SPARQL endpoint.
    Direct { endpoint: String },
    /// Evaluate the query with the federated engine over these sources.
    Federated { sources: Vec<String> },
}

/// Picks the execution strategy for a query against the resource at `url`.
///
/// A configured SPARQL endpoint always wins. Otherwise the resource itself is the only source.
pub fn route(config: &QueryConfig, url: &str) -> QueryRoute {
    match config.sparql_endpoint() {
        Some(endpoint) => QueryRoute::Direct {
            endpoint: endpoint.to_owned(),
        },
        None => QueryRoute::Federated {
            sources: vec![url.to_owned()],
        },
    }
}
