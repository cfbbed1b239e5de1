use crate::cli::{Args, Command, SessionArgs};
use anyhow::Context;
use clap::Parser;
use podsparql::pattern::render_matches;
use podsparql::{Credentials, PodQueryService, QueryConfig, ServiceOptions, TriplePattern};
use std::fs::File;
use std::io::{self, stdin, stdout, BufReader, Read, Write};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let service = PodQueryService::new(service_options(&args.session));
    service
        .initialize(query_config(&args.session)?)
        .context("Failed to initialize the Solid session")?;

    let output = match args.command {
        Command::Read { url } => service
            .read(&url)
            .await
            .with_context(|| format!("Failed to read {url}"))?,
        Command::Append { url, turtle } => {
            let turtle = argument_or_stdin(turtle)?;
            let count = service
                .append(&url, &turtle)
                .await
                .with_context(|| format!("Failed to append to {url}"))?;
            format!("Appended {count} triples to {url}")
        }
        Command::List { url } => service
            .list(&url)
            .await
            .with_context(|| format!("Failed to list {url}"))?
            .join("\n"),
        Command::Match {
            url,
            subject,
            predicate,
            object,
        } => {
            let pattern = TriplePattern {
                subject,
                predicate,
                object,
            };
            let matches = service
                .match_triples(&url, &pattern)
                .await
                .with_context(|| format!("Failed to match triples in {url}"))?;
            render_matches(&matches)?
        }
        Command::Query { url, query } => {
            let query = argument_or_stdin(query)?;
            service
                .query(&url, &query)
                .await
                .with_context(|| format!("Failed to query {url}"))?
        }
    };
    let mut stdout = stdout().lock();
    writeln!(stdout, "{output}")?;
    stdout.flush()?;
    Ok(())
}

fn query_config(args: &SessionArgs) -> anyhow::Result<QueryConfig> {
    let mut config: QueryConfig = if let Some(path) = &args.config {
        let file = File::open(path)
            .with_context(|| format!("Failed to open the session config {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid session config {}", path.display()))?
    } else {
        let pod_url = args
            .pod_url
            .as_deref()
            .context("The --pod-url option or PODSPARQL_POD_URL must be set")?;
        let web_id = args
            .web_id
            .as_deref()
            .context("The --web-id option or PODSPARQL_WEB_ID must be set")?;
        QueryConfig::new(pod_url, web_id)
    };
    if let Some(access_token) = &args.access_token {
        let credentials = Credentials {
            access_token: Some(access_token.clone()),
            ..config.credentials().clone()
        };
        config = config.with_credentials(credentials);
    }
    if let Some(oidc_issuer) = &args.oidc_issuer {
        config = config.with_oidc_issuer(oidc_issuer);
    }
    if let Some(sparql_endpoint) = &args.sparql_endpoint {
        config = config.with_sparql_endpoint(sparql_endpoint);
    }
    Ok(config)
}

fn service_options(args: &SessionArgs) -> ServiceOptions {
    ServiceOptions {
        request_timeout: args.timeout.map(Duration::from_secs),
        ..ServiceOptions::default()
    }
}

fn argument_or_stdin(argument: Option<String>) -> anyhow::Result<String> {
    if let Some(argument) = argument {
        return Ok(argument);
    }
    let mut input = String::new();
    stdin()
        .lock()
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;
    Ok(input)
}
