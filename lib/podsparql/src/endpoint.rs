//! The fast path: queries sent verbatim to a pre-known SPARQL endpoint.

use crate::error::PodQueryError;
use crate::fetch::{AuthenticatedFetch, FetchRequest};
use crate::results::{BindingRow, QueryResult};
use crate::store::QuadStore;
use oxrdfio::RdfFormat;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use sparesults::{QueryResultsFormat, QueryResultsParser, ReaderQueryResultsParserOutput};

/// Media type of a SPARQL query sent in a POST body.
pub const SPARQL_QUERY_MEDIA_TYPE: &str = "application/sparql-query";

const ACCEPTED_RESULTS: &str =
    "application/sparql-results+json, text/turtle;q=0.9, application/n-triples;q=0.8";

/// The raw answer of a SPARQL endpoint.
#[derive(Clone, Debug)]
pub struct EndpointResponse {
    /// The endpoint that answered.
    pub endpoint: String,
    /// The declared media type, without parameters.
    pub media_type: Option<String>,
    pub body: String,
}

/// Sends `query` to `endpoint` in a single authenticated POST.
///
/// The query text is neither inspected nor rewritten. Transport errors and non-success statuses
/// fail with [`PodQueryError::Fetch`], which carries the raw status and body.
pub async fn execute(
    fetch: &dyn AuthenticatedFetch,
    endpoint: &str,
    query: &str,
) -> Result<EndpointResponse, PodQueryError> {
    let request = FetchRequest::new(Method::POST, endpoint)
        .with_header(CONTENT_TYPE, SPARQL_QUERY_MEDIA_TYPE)
        .with_header(ACCEPT, ACCEPTED_RESULTS)
        .with_body(query);
    let response = fetch.fetch(request).await?.error_for_status(endpoint)?;
    tracing::debug!(
        endpoint,
        status = %response.status,
        content_type = response.content_type.as_deref(),
        "SPARQL endpoint answered"
    );
    Ok(EndpointResponse {
        endpoint: endpoint.to_owned(),
        media_type: response.media_type(),
        body: response.body,
    })
}

impl EndpointResponse {
    /// Decodes the body according to its media type.
    ///
    /// SPARQL results documents become [`QueryResult::Bindings`] or [`QueryResult::Boolean`], RDF
    /// documents become [`QueryResult::Quads`]. Anything else is an unsupported result type.
    pub fn into_query_result(self) -> Result<QueryResult, PodQueryError> {
        let Some(media_type) = self.media_type.as_deref() else {
            return Err(PodQueryError::UnsupportedResultType(format!(
                "response from {} has no content type",
                self.endpoint
            )));
        };
        if let Some(format) = QueryResultsFormat::from_media_type(media_type) {
            return self.decode_results(format);
        }
        if let Some(format) = RdfFormat::from_media_type(media_type) {
            let triples = QuadStore::load(format, &self.body, &self.endpoint)?.into_triples();
            return Ok(QueryResult::Quads { triples });
        }
        Err(PodQueryError::UnsupportedResultType(format!(
            "content type {media_type} returned by {}",
            self.endpoint
        )))
    }

    fn decode_results(&self, format: QueryResultsFormat) -> Result<QueryResult, PodQueryError> {
        let invalid = |source| PodQueryError::ResultsParse {
            url: self.endpoint.clone(),
            source,
        };
        let parsed = QueryResultsParser::from_format(format)
            .for_reader(self.body.as_bytes())
            .map_err(invalid)?;
        match parsed {
            ReaderQueryResultsParserOutput::Boolean(value) => Ok(QueryResult::Boolean { value }),
            ReaderQueryResultsParserOutput::Solutions(solutions) => {
                let vars = solutions.variables().to_vec();
                let rows = solutions
                    .map(|solution| {
                        solution.map(|solution| solution.iter().collect::<BindingRow>())
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(invalid)?;
                Ok(QueryResult::Bindings { vars, rows })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::Variable;

    fn response(media_type: Option<&str>, body: &str) -> EndpointResponse {
        EndpointResponse {
            endpoint: "https://pod.example/sparql".to_owned(),
            media_type: media_type.map(ToOwned::to_owned),
            body: body.to_owned(),
        }
    }

    #[test]
    fn decodes_json_solutions() -> Result<(), PodQueryError> {
        let result = response(
            Some("application/sparql-results+json"),
            r#"{"head":{"vars":["s","label"]},"results":{"bindings":[
                {"s":{"type":"uri","value":"http://example.org/test"},
                 "label":{"type":"literal","value":"Test","xml:lang":"en"}}
            ]}}"#,
        )
        .into_query_result()?;
        let QueryResult::Bindings { vars, rows } = result else {
            panic!("expected bindings, got {result:?}");
        };
        assert_eq!(
            vars.iter().map(Variable::as_str).collect::<Vec<_>>(),
            ["s", "label"]
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].get("s").map(ToString::to_string).as_deref(),
            Some("<http://example.org/test>")
        );
        Ok(())
    }

    #[test]
    fn decodes_json_boolean() -> Result<(), PodQueryError> {
        let result = response(
            Some("application/sparql-results+json"),
            r#"{"head":{},"boolean":true}"#,
        )
        .into_query_result()?;
        assert_eq!(result, QueryResult::Boolean { value: true });
        Ok(())
    }

    #[test]
    fn decodes_turtle_graph() -> Result<(), PodQueryError> {
        let result = response(Some("text/turtle"), "<http://e.org/s> <http://e.org/p> \"o\" .")
            .into_query_result()?;
        let QueryResult::Quads { triples } = result else {
            panic!("expected quads, got {result:?}");
        };
        assert_eq!(triples.len(), 1);
        Ok(())
    }

    #[test]
    fn rejects_unknown_content_types() {
        for media_type in [Some("text/html"), None] {
            let result = response(media_type, "<html></html>").into_query_result();
            assert!(
                matches!(result, Err(PodQueryError::UnsupportedResultType(_))),
                "{result:?}"
            );
        }
    }

    #[test]
    fn rejects_invalid_results_documents() {
        let result =
            response(Some("application/sparql-results+json"), "{\"head\":").into_query_result();
        assert!(matches!(result, Err(PodQueryError::ResultsParse { .. })));
    }
}
