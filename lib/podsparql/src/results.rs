use oxrdf::{Term, Triple, Variable};

/// The result of a SPARQL query, in one of the three shapes a query form can produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryResult {
    /// Solutions of a `SELECT` query.
    Bindings {
        /// The variables the query projected, in projection order.
        vars: Vec<Variable>,
        rows: Vec<BindingRow>,
    },
    /// Triples built by a `CONSTRUCT` or `DESCRIBE` query.
    Quads { triples: Vec<Triple> },
    /// The answer to an `ASK` query.
    Boolean { value: bool },
}

impl QueryResult {
    /// Short name of the shape, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bindings { .. } => "bindings",
            Self::Quads { .. } => "quads",
            Self::Boolean { .. } => "boolean",
        }
    }
}

/// One solution of a `SELECT` query: the bound variables, in the order the engine reported them.
///
/// Unbound variables are absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingRow {
    bindings: Vec<(Variable, Term)>,
}

impl BindingRow {
    pub fn new(bindings: Vec<(Variable, Term)>) -> Self {
        Self { bindings }
    }

    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.bindings
            .iter()
            .find(|(name, _)| name.as_str() == variable)
            .map(|(_, term)| term)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.bindings.iter().map(|(variable, term)| (variable, term))
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.bindings.iter().map(|(variable, _)| variable)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<'a> FromIterator<(&'a Variable, &'a Term)> for BindingRow {
    fn from_iter<I: IntoIterator<Item = (&'a Variable, &'a Term)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(variable, term)| (variable.clone(), term.clone()))
                .collect(),
        )
    }
}
