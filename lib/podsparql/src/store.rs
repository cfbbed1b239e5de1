//! In-memory triple collection built from a single parse of a fetched document.
//!
//! The entry point of the module is the [`QuadStore`] struct.
//!
//! Usage example:
//! ```
//! use podsparql::store::QuadStore;
//! use podsparql::TriplePattern;
//!
//! let store = QuadStore::load_turtle(
//!     "@prefix skos: <http://www.w3.org/2004/02/skos/core#> .\n<c> a skos:Concept .",
//!     "http://example.com/data.ttl",
//! )?;
//! assert_eq!(store.len(), 1);
//!
//! let pattern = TriplePattern::new(None, Some("rdf:type"), Some("skos:Concept"));
//! let matches = store.triples_for_pattern(&pattern).collect::<Vec<_>>();
//! assert_eq!(matches[0].subject.to_string(), "<http://example.com/c>");
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

use crate::error::PodQueryError;
use crate::pattern::{lexical_form, TriplePattern};
use oxrdf::Triple;
use oxrdfio::{RdfFormat, RdfParser};
use std::collections::HashMap;

/// The triples of one RDF document, in the order the parser produced them.
///
/// Triples are not deduplicated: the store holds exactly what the document contained. Lookups go
/// through per-position indexes keyed by the lexical form of each term.
#[derive(Clone, Debug, Default)]
pub struct QuadStore {
    triples: Vec<Triple>,
    prefixes: Vec<(String, String)>,
    by_subject: HashMap<String, Vec<usize>>,
    by_predicate: HashMap<String, Vec<usize>>,
    by_object: HashMap<String, Vec<usize>>,
}

impl QuadStore {
    /// Parses `text` as Turtle, resolving relative IRIs against `base_iri`.
    pub fn load_turtle(text: &str, base_iri: &str) -> Result<Self, PodQueryError> {
        Self::load(RdfFormat::Turtle, text, base_iri)
    }

    /// Parses `text` in the given `format`, resolving relative IRIs against `base_iri`.
    ///
    /// Triples in named graphs are kept, their graph name is dropped.
    pub fn load(format: RdfFormat, text: &str, base_iri: &str) -> Result<Self, PodQueryError> {
        let mut parser = RdfParser::from_format(format)
            .with_base_iri(base_iri)
            .map_err(|error| PodQueryError::invalid_iri(base_iri, error))?
            .for_reader(text.as_bytes());
        let mut store = Self::default();
        for quad in parser.by_ref() {
            let quad = quad.map_err(|source| PodQueryError::Parse {
                url: base_iri.to_owned(),
                source,
            })?;
            store.push(quad.into());
        }
        store.prefixes = parser
            .prefixes()
            .map(|(name, iri)| (name.to_owned(), iri.to_owned()))
            .collect();
        Ok(store)
    }

    fn push(&mut self, triple: Triple) {
        let position = self.triples.len();
        self.by_subject
            .entry(lexical_form(triple.subject.as_ref().into()).into_owned())
            .or_default()
            .push(position);
        self.by_predicate
            .entry(triple.predicate.as_str().to_owned())
            .or_default()
            .push(position);
        self.by_object
            .entry(lexical_form(triple.object.as_ref()).into_owned())
            .or_default()
            .push(position);
        self.triples.push(triple);
    }

    /// Number of triples, duplicates included.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// All triples in document order.
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Consumes the store, returning its triples in document order.
    pub fn into_triples(self) -> Vec<Triple> {
        self.triples
    }

    /// The `@prefix` declarations read from the document.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> + Clone {
        self.prefixes
            .iter()
            .map(|(name, iri)| (name.as_str(), iri.as_str()))
    }

    /// Returns the triples matching `pattern`, in document order.
    ///
    /// Prefixed names in the pattern are expanded with this document's prefixes before falling
    /// back to the well-known ones.
    pub fn triples_for_pattern<'a>(
        &'a self,
        pattern: &TriplePattern,
    ) -> impl Iterator<Item = &'a Triple> + 'a {
        let bound = pattern.resolve(self.prefixes());
        let candidates = [
            (&self.by_subject, &bound.subject),
            (&self.by_predicate, &bound.predicate),
            (&self.by_object, &bound.object),
        ]
        .into_iter()
        .filter_map(|(index, values)| {
            values.as_ref().map(|values| {
                let mut positions = values
                    .keys()
                    .into_iter()
                    .filter_map(|value| index.get(value))
                    .flatten()
                    .copied()
                    .collect::<Vec<_>>();
                positions.sort_unstable();
                positions.dedup();
                positions
            })
        })
        .min_by_key(Vec::len);

        let positions = candidates.unwrap_or_else(|| (0..self.triples.len()).collect());
        positions
            .into_iter()
            .map(move |position| &self.triples[position])
            .filter(move |triple| bound.matches(triple))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"
@prefix ex: <http://example.com/> .

ex:a ex:p ex:b .
ex:a ex:p ex:b .
ex:b ex:q "b" .
"#;

    #[test]
    fn keeps_duplicates_and_document_order() -> Result<(), PodQueryError> {
        let store = QuadStore::load_turtle(DATA, "http://example.com/data.ttl")?;
        assert_eq!(store.len(), 3);
        assert_eq!(store.triples()[0], store.triples()[1]);
        assert_eq!(store.triples()[2].object.to_string(), "\"b\"");
        Ok(())
    }

    #[test]
    fn records_prefixes() -> Result<(), PodQueryError> {
        let store = QuadStore::load_turtle(DATA, "http://example.com/data.ttl")?;
        assert_eq!(
            store.prefixes().collect::<Vec<_>>(),
            vec![("ex", "http://example.com/")]
        );
        Ok(())
    }

    #[test]
    fn fully_bound_patterns_need_every_field() -> Result<(), PodQueryError> {
        let store = QuadStore::load_turtle(
            r#"
@prefix ex: <http://example.com/> .

ex:a ex:p ex:b .
ex:a ex:p ex:c .
ex:a ex:q ex:b .
ex:c ex:p ex:b .
ex:a ex:p ex:b .
"#,
            "http://example.com/data.ttl",
        )?;
        let pattern = TriplePattern::new(
            Some("http://example.com/a"),
            Some("ex:p"),
            Some("<http://example.com/b>"),
        );
        let matches = store.triples_for_pattern(&pattern).collect::<Vec<_>>();
        assert_eq!(matches.len(), 2);
        for triple in matches {
            assert_eq!(
                triple.to_string(),
                "<http://example.com/a> <http://example.com/p> <http://example.com/b>"
            );
        }
        Ok(())
    }

    #[test]
    fn quoted_literals_match_language_and_datatype() -> Result<(), PodQueryError> {
        let store = QuadStore::load_turtle(
            r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
<c> skos:prefLabel "Paris"@fr , "Paris"@en , "Test Concept" .
"#,
            "http://example.com/data.ttl",
        )?;
        let count = |object: &str| {
            store
                .triples_for_pattern(&TriplePattern::new(None, None, Some(object)))
                .count()
        };
        assert_eq!(count("Paris"), 2);
        assert_eq!(count("\"Paris\"@fr"), 1);
        assert_eq!(count("\"Paris\"@de"), 0);
        assert_eq!(count("\"Test Concept\""), 1);
        assert_eq!(
            count("\"Test Concept\"^^<http://www.w3.org/2001/XMLSchema#string>"),
            1
        );
        assert_eq!(count("\"Test Concept\"^^xsd:string"), 1);
        Ok(())
    }

    #[test]
    fn rejects_invalid_turtle() {
        let result = QuadStore::load_turtle("<a> <b> .", "http://example.com/data.ttl");
        assert!(matches!(
            result,
            Err(PodQueryError::Parse { url, .. }) if url == "http://example.com/data.ttl"
        ));
    }

    #[test]
    fn rejects_invalid_base() {
        let result = QuadStore::load_turtle(DATA, "not an iri");
        assert!(matches!(result, Err(PodQueryError::InvalidIri { .. })));
    }
}
