//! Canonical text encodings of [`QueryResult`]s.
//!
//! - bindings: `{"head":{"vars":[...]},"results":{"bindings":[...]}}`
//! - quads: Turtle with the `skos:` and `schema:` prefixes bound
//! - boolean: `{"boolean":true}`

use crate::error::PodQueryError;
use crate::pattern::lexical_form;
use crate::results::{BindingRow, QueryResult};
use crate::vocab::RESULT_PREFIXES;
use oxrdf::{Term, Triple, Variable};
use oxttl::TurtleSerializer;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::io;

/// Encodes `result` in the canonical encoding of its shape.
///
/// Nothing is returned unless the whole encoding succeeded.
pub fn normalize(result: &QueryResult) -> Result<String, PodQueryError> {
    match result {
        QueryResult::Bindings { rows, .. } => encode_bindings(rows),
        QueryResult::Quads { triples } => encode_turtle(triples),
        QueryResult::Boolean { value } => encode_boolean(*value),
    }
}

/// Encodes solutions as SPARQL JSON results.
///
/// `vars` follows the variable order of the first row and is empty when there are no rows.
/// Terms are `uri` exactly when they are IRIs and carry `xml:lang` exactly when they are
/// language-tagged literals.
pub fn encode_bindings(rows: &[BindingRow]) -> Result<String, PodQueryError> {
    let vars = rows
        .first()
        .map(|row| row.variables().map(Variable::as_str).collect())
        .unwrap_or_default();
    let document = SelectDocument {
        head: Head { vars },
        results: Results {
            bindings: rows.iter().map(EncodedRow).collect(),
        },
    };
    serde_json::to_string(&document)
        .map_err(|error| PodQueryError::Serialization(io::Error::other(error)))
}

/// Encodes constructed triples as Turtle, in sequence order.
pub fn encode_turtle(triples: &[Triple]) -> Result<String, PodQueryError> {
    let mut serializer = TurtleSerializer::new();
    for (name, iri) in RESULT_PREFIXES {
        serializer = serializer
            .with_prefix(name, iri)
            .map_err(|error| PodQueryError::invalid_iri(iri, error))?;
    }
    let mut writer = serializer.for_writer(Vec::new());
    for triple in triples {
        writer
            .serialize_triple(triple)
            .map_err(PodQueryError::Serialization)?;
    }
    let buffer = writer.finish().map_err(PodQueryError::Serialization)?;
    String::from_utf8(buffer)
        .map_err(|error| PodQueryError::Serialization(io::Error::other(error)))
}

/// Encodes the answer of an `ASK` query.
pub fn encode_boolean(value: bool) -> Result<String, PodQueryError> {
    serde_json::to_string(&BooleanDocument { boolean: value })
        .map_err(|error| PodQueryError::Serialization(io::Error::other(error)))
}

#[derive(Serialize)]
struct SelectDocument<'a> {
    head: Head<'a>,
    results: Results<'a>,
}

#[derive(Serialize)]
struct Head<'a> {
    vars: Vec<&'a str>,
}

#[derive(Serialize)]
struct Results<'a> {
    bindings: Vec<EncodedRow<'a>>,
}

#[derive(Serialize)]
struct BooleanDocument {
    boolean: bool,
}

/// A row serialized as a JSON object keeping the row's variable order.
struct EncodedRow<'a>(&'a BindingRow);

impl Serialize for EncodedRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (variable, term) in self.0.iter() {
            map.serialize_entry(variable.as_str(), &EncodedTerm::from(term))?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct EncodedTerm<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: Cow<'a, str>,
    #[serde(rename = "xml:lang", skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

impl<'a> From<&'a Term> for EncodedTerm<'a> {
    fn from(term: &'a Term) -> Self {
        let language = match term {
            Term::Literal(literal) => literal.language(),
            Term::NamedNode(_) | Term::BlankNode(_) | Term::Triple(_) => None,
        };
        Self {
            kind: if term.is_named_node() { "uri" } else { "literal" },
            value: lexical_form(term.as_ref()),
            language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::QuadStore;
    use oxrdf::{Literal, NamedNode};

    fn variable(name: &str) -> Variable {
        Variable::new_unchecked(name)
    }

    #[test]
    fn bindings_follow_the_first_row() -> Result<(), PodQueryError> {
        let concept = Term::from(NamedNode::new_unchecked("http://e.org/concept"));
        let label = Term::from(Literal::new_language_tagged_literal_unchecked("Concept", "en"));
        let rows = vec![BindingRow::new(vec![
            (variable("label"), label),
            (variable("concept"), concept),
        ])];
        let result = QueryResult::Bindings {
            vars: vec![variable("concept"), variable("label")],
            rows,
        };
        assert_eq!(
            normalize(&result)?,
            r#"{"head":{"vars":["label","concept"]},"results":{"bindings":[{"label":{"type":"literal","value":"Concept","xml:lang":"en"},"concept":{"type":"uri","value":"http://e.org/concept"}}]}}"#
        );
        Ok(())
    }

    #[test]
    fn no_rows_means_no_vars() -> Result<(), PodQueryError> {
        let result = QueryResult::Bindings {
            vars: vec![variable("s")],
            rows: Vec::new(),
        };
        assert_eq!(
            normalize(&result)?,
            r#"{"head":{"vars":[]},"results":{"bindings":[]}}"#
        );
        Ok(())
    }

    #[test]
    fn typed_literals_have_no_language() -> Result<(), PodQueryError> {
        let rows = vec![BindingRow::new(vec![(
            variable("n"),
            Literal::from(42).into(),
        )])];
        assert_eq!(
            encode_bindings(&rows)?,
            r#"{"head":{"vars":["n"]},"results":{"bindings":[{"n":{"type":"literal","value":"42"}}]}}"#
        );
        Ok(())
    }

    #[test]
    fn booleans() -> Result<(), PodQueryError> {
        assert_eq!(
            normalize(&QueryResult::Boolean { value: true })?,
            r#"{"boolean":true}"#
        );
        assert_eq!(
            normalize(&QueryResult::Boolean { value: false })?,
            r#"{"boolean":false}"#
        );
        Ok(())
    }

    #[test]
    fn turtle_binds_result_prefixes_and_round_trips() -> Result<(), PodQueryError> {
        let source = QuadStore::load_turtle(
            r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix schema: <http://schema.org/> .

<http://e.org/c> a skos:Concept ;
    skos:prefLabel "Concept"@en ;
    schema:position 1 .
<http://e.org/d> skos:broader <http://e.org/c> .
"#,
            "http://e.org/",
        )?;
        let turtle = normalize(&QueryResult::Quads {
            triples: source.triples().to_vec(),
        })?;
        assert!(turtle.contains("@prefix skos: <http://www.w3.org/2004/02/skos/core#> ."));
        assert!(turtle.contains("@prefix schema: <http://schema.org/> ."));
        assert!(turtle.contains("skos:Concept"));

        let reparsed = QuadStore::load_turtle(&turtle, "http://e.org/")?;
        let mut expected = source.into_triples();
        let mut actual = reparsed.into_triples();
        expected.sort_by_key(ToString::to_string);
        actual.sort_by_key(ToString::to_string);
        assert_eq!(expected, actual);
        Ok(())
    }
}
