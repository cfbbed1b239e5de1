//! Wildcard triple patterns.

use crate::vocab::WELL_KNOWN_PREFIXES;
use oxrdf::{Literal, TermRef, Triple};
use serde::Serialize;
use std::borrow::Cow;
use std::str::FromStr;

/// Text shown by the tool surface when a pattern matched nothing.
pub const NO_MATCHES: &str = "No matches found (0 triples)";

/// A subject/predicate/object pattern. `None` matches any value in that position.
///
/// Bound values are compared with the lexical form of each term: the IRI, the blank node id or
/// the literal value. Language tags and datatypes do not take part in matching, unless the value
/// is a quoted literal (`"Paris"@fr`, `"42"^^xsd:integer`), which only matches an equal literal.
/// A bound value written as a prefixed name (`skos:Concept`) also matches its expansion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: Option<String>,
    pub predicate: Option<String>,
    pub object: Option<String>,
}

impl TriplePattern {
    pub fn new(subject: Option<&str>, predicate: Option<&str>, object: Option<&str>) -> Self {
        Self {
            subject: subject.map(ToOwned::to_owned),
            predicate: predicate.map(ToOwned::to_owned),
            object: object.map(ToOwned::to_owned),
        }
    }

    /// The pattern matching every triple.
    pub fn any() -> Self {
        Self::default()
    }

    pub(crate) fn resolve<'a>(
        &self,
        prefixes: impl Iterator<Item = (&'a str, &'a str)> + Clone,
    ) -> ResolvedPattern {
        let resolve = |value: &Option<String>| {
            value
                .as_deref()
                .map(|value| FieldPattern::parse(value, prefixes.clone()))
        };
        ResolvedPattern {
            subject: resolve(&self.subject),
            predicate: resolve(&self.predicate),
            object: resolve(&self.object),
        }
    }
}

/// A pattern whose bound positions say which terms they accept.
#[derive(Debug)]
pub(crate) struct ResolvedPattern {
    pub(crate) subject: Option<FieldPattern>,
    pub(crate) predicate: Option<FieldPattern>,
    pub(crate) object: Option<FieldPattern>,
}

impl ResolvedPattern {
    pub(crate) fn matches(&self, triple: &Triple) -> bool {
        accepts(self.subject.as_ref(), triple.subject.as_ref().into())
            && accepts(self.predicate.as_ref(), triple.predicate.as_ref().into())
            && accepts(self.object.as_ref(), triple.object.as_ref())
    }
}

fn accepts(field: Option<&FieldPattern>, term: TermRef<'_>) -> bool {
    field.map_or(true, |field| field.accepts(term))
}

/// One bound position of a pattern.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum FieldPattern {
    /// Lexical forms, one of which the term's lexical form must equal.
    Forms(Vec<String>),
    /// A quoted literal, matched together with its language tag or datatype.
    Literal(Literal),
}

impl FieldPattern {
    fn parse<'a>(value: &str, prefixes: impl Iterator<Item = (&'a str, &'a str)> + Clone) -> Self {
        match encoded_literal(value, prefixes.clone()) {
            Some(literal) => Self::Literal(literal),
            None => Self::Forms(candidates(value, prefixes)),
        }
    }

    /// The lexical forms a matching term may have, used as index keys.
    pub(crate) fn keys(&self) -> Vec<&str> {
        match self {
            Self::Forms(forms) => forms.iter().map(String::as_str).collect(),
            Self::Literal(literal) => vec![literal.value()],
        }
    }

    fn accepts(&self, term: TermRef<'_>) -> bool {
        match self {
            Self::Forms(forms) => {
                let form = lexical_form(term);
                forms.iter().any(|value| *value == form)
            }
            Self::Literal(literal) => term == TermRef::Literal(literal.as_ref()),
        }
    }
}

fn candidates<'a>(value: &str, prefixes: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<String> {
    let mut candidates = vec![value.to_owned()];
    if let Some(iri) = value
        .strip_prefix('<')
        .and_then(|value| value.strip_suffix('>'))
    {
        candidates.push(iri.to_owned());
    } else if let Some(expanded) = expand_prefixed_name(value, prefixes) {
        candidates.push(expanded);
    }
    candidates
}

/// Reads `"value"`, `"value"@lang` and `"value"^^datatype` with the datatype as an IRI or a
/// prefixed name.
fn encoded_literal<'a>(
    value: &str,
    prefixes: impl Iterator<Item = (&'a str, &'a str)>,
) -> Option<Literal> {
    if !value.starts_with('"') {
        return None;
    }
    if let Ok(literal) = Literal::from_str(value) {
        return Some(literal);
    }
    let (lexical, datatype) = value.rsplit_once("^^")?;
    let datatype = expand_prefixed_name(datatype, prefixes)?;
    Literal::from_str(&format!("{lexical}^^<{datatype}>")).ok()
}

fn expand_prefixed_name<'a>(
    value: &str,
    mut prefixes: impl Iterator<Item = (&'a str, &'a str)>,
) -> Option<String> {
    let (prefix, local) = value.split_once(':')?;
    if local.starts_with("//")
        || !prefix
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return None;
    }
    let namespace = prefixes
        .find(|(name, _)| *name == prefix)
        .map(|(_, iri)| iri)
        .or_else(|| {
            WELL_KNOWN_PREFIXES
                .iter()
                .find(|(name, _)| *name == prefix)
                .map(|(_, iri)| *iri)
        })?;
    Some(format!("{namespace}{local}"))
}

/// The string a pattern field is compared with.
pub fn lexical_form(term: TermRef<'_>) -> Cow<'_, str> {
    match term {
        TermRef::NamedNode(node) => Cow::Borrowed(node.as_str()),
        TermRef::BlankNode(node) => Cow::Borrowed(node.as_str()),
        TermRef::Literal(literal) => Cow::Borrowed(literal.value()),
        TermRef::Triple(triple) => Cow::Owned(triple.to_string()),
    }
}

/// A matched triple as exposed by the tool surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchedTriple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl From<&Triple> for MatchedTriple {
    fn from(triple: &Triple) -> Self {
        Self {
            subject: lexical_form(triple.subject.as_ref().into()).into_owned(),
            predicate: triple.predicate.as_str().to_owned(),
            object: lexical_form(triple.object.as_ref()).into_owned(),
        }
    }
}

/// Renders matches the way the tool surface shows them: a pretty JSON array, or [`NO_MATCHES`].
pub fn render_matches(triples: &[Triple]) -> Result<String, serde_json::Error> {
    if triples.is_empty() {
        return Ok(NO_MATCHES.to_owned());
    }
    let matches = triples.iter().map(MatchedTriple::from).collect::<Vec<_>>();
    serde_json::to_string_pretty(&matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{Literal, NamedNode, Term};

    fn triple(subject: &str, predicate: &str, object: impl Into<Term>) -> Triple {
        Triple::new(
            NamedNode::new_unchecked(subject),
            NamedNode::new_unchecked(predicate),
            object,
        )
    }

    #[test]
    fn expands_well_known_and_document_prefixes() {
        let resolved = TriplePattern::new(Some("ex:a"), Some("rdf:type"), Some("http://x.org/o"))
            .resolve([("ex", "http://example.com/")].into_iter());
        assert_eq!(
            resolved.subject,
            Some(FieldPattern::Forms(vec![
                "ex:a".to_owned(),
                "http://example.com/a".to_owned()
            ]))
        );
        assert_eq!(
            resolved.predicate,
            Some(FieldPattern::Forms(vec![
                "rdf:type".to_owned(),
                "http://www.w3.org/1999/02/22-rdf-syntax-ns#type".to_owned()
            ]))
        );
        assert_eq!(
            resolved.object,
            Some(FieldPattern::Forms(vec!["http://x.org/o".to_owned()]))
        );
    }

    #[test]
    fn document_prefix_shadows_well_known_one() {
        let resolved = TriplePattern::new(Some("schema:name"), None, None)
            .resolve([("schema", "https://schema.org/")].into_iter());
        assert_eq!(
            resolved.subject,
            Some(FieldPattern::Forms(vec![
                "schema:name".to_owned(),
                "https://schema.org/name".to_owned()
            ]))
        );
    }

    #[test]
    fn empty_string_is_bound() {
        let resolved = TriplePattern::new(None, None, Some("")).resolve(std::iter::empty());
        let empty = triple("http://e.org/s", "http://e.org/p", Literal::new_simple_literal(""));
        let other = triple("http://e.org/s", "http://e.org/p", Literal::new_simple_literal("x"));
        assert!(resolved.matches(&empty));
        assert!(!resolved.matches(&other));
    }

    #[test]
    fn literal_matching_ignores_language() {
        let resolved = TriplePattern::new(None, None, Some("Paris")).resolve(std::iter::empty());
        let tagged = triple(
            "http://e.org/s",
            "http://e.org/p",
            Literal::new_language_tagged_literal_unchecked("Paris", "fr"),
        );
        assert!(resolved.matches(&tagged));
    }

    #[test]
    fn quoted_literals_keep_language_and_datatype() {
        let french = triple(
            "http://e.org/s",
            "http://e.org/p",
            Literal::new_language_tagged_literal_unchecked("Paris", "fr"),
        );
        let plain = triple(
            "http://e.org/s",
            "http://e.org/p",
            Literal::new_simple_literal("Paris"),
        );
        let number = triple("http://e.org/s", "http://e.org/p", Literal::from(42));

        let tagged =
            TriplePattern::new(None, None, Some("\"Paris\"@fr")).resolve(std::iter::empty());
        assert!(tagged.matches(&french));
        assert!(!tagged.matches(&plain));

        let quoted =
            TriplePattern::new(None, None, Some("\"Paris\"")).resolve(std::iter::empty());
        assert!(quoted.matches(&plain));
        assert!(!quoted.matches(&french));

        let typed = TriplePattern::new(None, None, Some("\"42\"^^xsd:integer"))
            .resolve(std::iter::empty());
        assert_eq!(typed.object, Some(FieldPattern::Literal(Literal::from(42))));
        assert!(typed.matches(&number));
        let untyped = TriplePattern::new(None, None, Some("\"42\"")).resolve(std::iter::empty());
        assert!(!untyped.matches(&number));
    }

    #[test]
    fn renders_matches_for_the_tool_surface() -> Result<(), serde_json::Error> {
        assert_eq!(render_matches(&[])?, NO_MATCHES);

        let rendered = render_matches(&[triple(
            "http://e.org/s",
            "http://e.org/p",
            Literal::new_simple_literal("o"),
        )])?;
        let value: serde_json::Value = serde_json::from_str(&rendered)?;
        assert_eq!(
            value,
            serde_json::json!([{
                "subject": "http://e.org/s",
                "predicate": "http://e.org/p",
                "object": "o"
            }])
        );
        Ok(())
    }
}
