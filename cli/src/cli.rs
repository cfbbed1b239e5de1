use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "podsparql")]
/// Pattern matching and SPARQL queries over Solid Pod resources
pub struct Args {
    #[command(flatten)]
    pub session: SessionArgs,
    #[command(subcommand)]
    pub command: Command,
}

/// How to open the Pod session every command runs in.
#[derive(clap::Args)]
pub struct SessionArgs {
    /// JSON session config with the `podUrl`, `webId`, `clientId`, `clientSecret`, `accessToken`,
    /// `oidcIssuer` and `sparqlEndpoint` keys
    ///
    /// When set, `--pod-url` and `--web-id` are ignored. The other session options override the
    /// values read from the file.
    #[arg(long, global = true, env = "PODSPARQL_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Base URL of the Pod
    #[arg(long, global = true, env = "PODSPARQL_POD_URL", value_hint = ValueHint::Url)]
    pub pod_url: Option<String>,
    /// WebID the session acts as
    #[arg(long, global = true, env = "PODSPARQL_WEB_ID", value_hint = ValueHint::Url)]
    pub web_id: Option<String>,
    /// Access token sent as a bearer token with every request
    #[arg(long, global = true, env = "PODSPARQL_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
    /// Identity provider of the WebID
    #[arg(long, global = true, env = "PODSPARQL_OIDC_ISSUER", value_hint = ValueHint::Url)]
    pub oidc_issuer: Option<String>,
    /// SPARQL endpoint queries are sent to
    ///
    /// Without it, queries are evaluated locally over the queried resource.
    #[arg(long, global = true, env = "PODSPARQL_SPARQL_ENDPOINT", value_hint = ValueHint::Url)]
    pub sparql_endpoint: Option<String>,
    /// Timeout of every HTTP request, in seconds
    #[arg(long, global = true, env = "PODSPARQL_TIMEOUT")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the Turtle representation of a resource
    Read {
        /// URL of the resource
        #[arg(value_hint = ValueHint::Url)]
        url: String,
    },
    /// Append Turtle triples to a resource
    Append {
        /// URL of the resource
        #[arg(value_hint = ValueHint::Url)]
        url: String,
        /// The triples to append, in Turtle
        ///
        /// Relative IRIs are resolved against the resource URL. If not given, stdin is read.
        turtle: Option<String>,
    },
    /// List the members of a container
    List {
        /// URL of the container, ending with a slash
        #[arg(value_hint = ValueHint::Url)]
        url: String,
    },
    /// Print the triples of a resource matching a pattern
    ///
    /// Omitted positions match anything. Values may be full IRIs, literal values or prefixed names
    /// like `skos:Concept`.
    Match {
        /// URL of the resource
        #[arg(value_hint = ValueHint::Url)]
        url: String,
        /// Subject to match
        #[arg(short, long)]
        subject: Option<String>,
        /// Predicate to match
        #[arg(short, long)]
        predicate: Option<String>,
        /// Object to match
        #[arg(short, long)]
        object: Option<String>,
    },
    /// Execute a SPARQL query against a resource
    Query {
        /// URL of the resource
        #[arg(value_hint = ValueHint::Url)]
        url: String,
        /// The SPARQL query
        ///
        /// If not given, stdin is read.
        query: Option<String>,
    },
}
