//! Operations on single Pod resources: reading, pattern matching, appending and listing.

use crate::error::PodQueryError;
use crate::fetch::{AuthenticatedFetch, FetchRequest};
use crate::pattern::TriplePattern;
use crate::store::QuadStore;
use crate::vocab::ldp;
use oxiri::Iri;
use oxrdf::{Term, Triple};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;

/// Media type of a SPARQL update sent in a PATCH body.
pub const SPARQL_UPDATE_MEDIA_TYPE: &str = "application/sparql-update";

const TURTLE_MEDIA_TYPE: &str = "text/turtle";

/// Checks that `url` is an absolute IRI before anything is sent to it.
pub(crate) fn check_url(url: &str) -> Result<(), PodQueryError> {
    Iri::parse(url)
        .map(|_| ())
        .map_err(|error| PodQueryError::invalid_iri(url, error))
}

/// Fetches the Turtle representation of the resource at `url`.
pub async fn read_resource(
    fetch: &dyn AuthenticatedFetch,
    url: &str,
) -> Result<String, PodQueryError> {
    check_url(url)?;
    let request = FetchRequest::get(url).with_header(ACCEPT, TURTLE_MEDIA_TYPE);
    let response = fetch.fetch(request).await?.error_for_status(url)?;
    Ok(response.body)
}

/// Fetches and parses the resource at `url`, with `url` as base IRI.
pub async fn load_resource(
    fetch: &dyn AuthenticatedFetch,
    url: &str,
) -> Result<QuadStore, PodQueryError> {
    let document = read_resource(fetch, url).await?;
    let store = QuadStore::load_turtle(&document, url)?;
    tracing::debug!(url, triples = store.len(), "Loaded resource");
    Ok(store)
}

/// Returns the triples of the resource at `url` matching `pattern`, in document order.
pub async fn match_resource(
    fetch: &dyn AuthenticatedFetch,
    url: &str,
    pattern: &TriplePattern,
) -> Result<Vec<Triple>, PodQueryError> {
    let store = load_resource(fetch, url).await?;
    Ok(store.triples_for_pattern(pattern).cloned().collect())
}

/// Appends the triples written in `turtle` to the resource at `url`.
///
/// Relative IRIs in `turtle` are resolved against `url`. The triples are sent as a single
/// `INSERT DATA` update, so either all of them are stored or none. Returns how many triples were
/// sent.
pub async fn append_triples(
    fetch: &dyn AuthenticatedFetch,
    url: &str,
    turtle: &str,
) -> Result<usize, PodQueryError> {
    check_url(url)?;
    let triples = QuadStore::load_turtle(turtle, url)?.into_triples();
    let request = FetchRequest::new(Method::PATCH, url)
        .with_header(CONTENT_TYPE, SPARQL_UPDATE_MEDIA_TYPE)
        .with_body(insert_data(&triples));
    fetch.fetch(request).await?.error_for_status(url)?;
    tracing::info!(url, triples = triples.len(), "Appended triples");
    Ok(triples.len())
}

/// Lists the members of the container at `url`, in document order.
///
/// Container URLs must end with a slash.
pub async fn list_container(
    fetch: &dyn AuthenticatedFetch,
    url: &str,
) -> Result<Vec<String>, PodQueryError> {
    if !url.ends_with('/') {
        return Err(PodQueryError::InvalidContainerUrl(url.to_owned()));
    }
    let store = load_resource(fetch, url).await?;
    let pattern = TriplePattern::new(None, Some(ldp::CONTAINS.as_str()), None);
    Ok(store
        .triples_for_pattern(&pattern)
        .filter_map(|triple| match &triple.object {
            Term::NamedNode(member) => Some(member.as_str().to_owned()),
            Term::BlankNode(_) | Term::Literal(_) | Term::Triple(_) => None,
        })
        .collect())
}

fn insert_data(triples: &[Triple]) -> String {
    let statements = triples
        .iter()
        .map(|triple| format!("  {triple} .\n"))
        .collect::<String>();
    format!("INSERT DATA {{\n{statements}}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{Literal, NamedNode};

    #[test]
    fn insert_data_lists_triples_as_n_triples() {
        let triples = [
            Triple::new(
                NamedNode::new_unchecked("http://e.org/s"),
                NamedNode::new_unchecked("http://e.org/p"),
                Literal::new_language_tagged_literal_unchecked("o", "en"),
            ),
            Triple::new(
                NamedNode::new_unchecked("http://e.org/s"),
                NamedNode::new_unchecked("http://e.org/q"),
                NamedNode::new_unchecked("http://e.org/o"),
            ),
        ];
        assert_eq!(
            insert_data(&triples),
            "INSERT DATA {\n  <http://e.org/s> <http://e.org/p> \"o\"@en .\n  <http://e.org/s> <http://e.org/q> <http://e.org/o> .\n}"
        );
    }

    #[test]
    fn relative_urls_are_rejected() {
        assert!(matches!(
            check_url("data.ttl"),
            Err(PodQueryError::InvalidIri { .. })
        ));
        assert!(check_url("https://pod.example/data.ttl").is_ok());
    }
}
