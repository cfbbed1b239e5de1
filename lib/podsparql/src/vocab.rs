//! Namespaces and terms used by Pods and by the query results.

pub mod skos {
    pub const NAMESPACE: &str = "http://www.w3.org/2004/02/skos/core#";
}

pub mod schema {
    pub const NAMESPACE: &str = "http://schema.org/";
}

pub mod ldp {
    use oxrdf::NamedNodeRef;

    pub const NAMESPACE: &str = "http://www.w3.org/ns/ldp#";
    /// Links a container to each of its members.
    pub const CONTAINS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#contains");
}

/// Prefixes bound when serializing constructed triples as Turtle.
pub const RESULT_PREFIXES: [(&str, &str); 2] =
    [("skos", skos::NAMESPACE), ("schema", schema::NAMESPACE)];

/// Prefixes a pattern field may use even if the matched document does not declare them.
pub const WELL_KNOWN_PREFIXES: [(&str, &str); 9] = [
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("skos", skos::NAMESPACE),
    ("schema", schema::NAMESPACE),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("ldp", ldp::NAMESPACE),
];
