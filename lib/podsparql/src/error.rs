use oxrdf::IriParseError;
use oxrdfio::RdfParseError;
use reqwest::StatusCode;
use sparesults::QueryResultsParseError;
use std::error::Error;
use std::io;

/// An error raised by any of the Pod query operations.
///
/// Every variant is terminal: nothing is retried and no partial result is returned alongside it.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PodQueryError {
    /// A query or fetch was attempted before a session was initialized.
    #[error("Solid session not initialized")]
    SessionNotInitialized,
    /// Retrieving a resource or calling a SPARQL endpoint failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The retrieved document is not valid RDF.
    #[error("Could not parse the RDF document at '{url}': {source}")]
    Parse {
        /// The URL of the document.
        url: String,
        /// The syntax or I/O error.
        #[source]
        source: RdfParseError,
    },
    /// A SPARQL endpoint answered with an invalid results document.
    #[error("Could not parse the query results from '{url}': {source}")]
    ResultsParse {
        /// The URL of the endpoint.
        url: String,
        /// The syntax or I/O error.
        #[source]
        source: QueryResultsParseError,
    },
    /// The query returned a result shape that cannot be normalized.
    #[error("Unsupported query result type: {0}")]
    UnsupportedResultType(String),
    /// Serializing constructed triples to Turtle failed.
    #[error("Could not serialize the query results: {0}")]
    Serialization(#[source] io::Error),
    /// The federated engine rejected or failed to evaluate the query.
    #[error("Query evaluation failed: {0}")]
    QueryEvaluation(#[source] Box<dyn Error + Send + Sync + 'static>),
    /// An IRI (resource URL, endpoint, base or prefix) is invalid.
    #[error("Invalid IRI '{iri}': {source}")]
    InvalidIri {
        /// The IRI itself.
        iri: String,
        /// The parsing error.
        #[source]
        source: IriParseError,
    },
    /// Container URLs must end with a slash.
    #[error("Container URL must end with /: {0}")]
    InvalidContainerUrl(String),
}

impl PodQueryError {
    pub(crate) fn invalid_iri(iri: impl Into<String>, source: IriParseError) -> Self {
        Self::InvalidIri {
            iri: iri.into(),
            source,
        }
    }

    pub(crate) fn evaluation(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::QueryEvaluation(error.into())
    }
}

/// A transport-level failure or a non-success status returned for `url`.
#[derive(Debug, thiserror::Error)]
#[error("Failed to fetch '{url}': {kind}")]
pub struct FetchError {
    url: String,
    kind: FetchErrorKind,
}

#[derive(Debug, thiserror::Error)]
enum FetchErrorKind {
    #[error("{0}")]
    Transport(#[source] Box<dyn Error + Send + Sync + 'static>),
    #[error("{status} {body}")]
    Status { status: StatusCode, body: String },
}

impl FetchError {
    /// Builds an error from a failure of the underlying transport.
    pub fn transport(
        url: impl Into<String>,
        error: impl Into<Box<dyn Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            url: url.into(),
            kind: FetchErrorKind::Transport(error.into()),
        }
    }

    /// Builds an error from a response whose status is not a success.
    pub fn status(url: impl Into<String>, status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: FetchErrorKind::Status {
                status,
                body: body.into(),
            },
        }
    }

    /// The URL that could not be fetched.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The response status, if the server answered at all.
    pub fn status_code(&self) -> Option<StatusCode> {
        match &self.kind {
            FetchErrorKind::Status { status, .. } => Some(*status),
            FetchErrorKind::Transport(_) => None,
        }
    }

    /// The raw response body, if the server answered at all.
    pub fn body(&self) -> Option<&str> {
        match &self.kind {
            FetchErrorKind::Status { body, .. } => Some(body),
            FetchErrorKind::Transport(_) => None,
        }
    }
}
