use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use gqlhttp_rs::{CancellationToken, Client, GraphQLResponse, Url};
use serde_json::Value;

use config::{Config, RequestMethod};

mod config;
mod introspection;
mod telemetry;

/// Fetch the introspection schema of a GraphQL endpoint and print it as JSON
#[derive(Parser, Debug)]
#[command(name = "gqlhttp-introspect")]
#[command(version, about, long_about = None)]
struct Args {
    /// GraphQL endpoint
    uri: Url,

    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "gqlhttp.json")]
    config: PathBuf,

    /// Send the query as a GET request instead of POST
    #[arg(long)]
    get: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (config, load_error) = Config::load_or_default(&args.config);

    let _guard = telemetry::init_telemetry(
        args.verbose,
        config.log_filter.as_deref(),
        config.log_json,
    )?;

    if let Some(e) = load_error {
        tracing::warn!("Failed to load {}, using defaults: {e:#}", args.config.display());
    }

    let method = if args.get {
        RequestMethod::Get
    } else {
        config.method
    };

    tracing::info!("Fetching schema from {}", args.uri);
    tracing::debug!(
        "  Method: {:?}, timeout: {:?}, extra headers: {}",
        method,
        config.timeout_secs,
        config.headers.len()
    );

    let mut client = Client::with_transport(config.http_client()?);
    if let Some(media_type) = &config.media_type {
        client = client.with_media_type(media_type);
    }

    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone(), config.timeout_secs.map(Duration::from_secs));

    let request = introspection::request();
    let response: GraphQLResponse<Value> = match method {
        RequestMethod::Post => {
            client
                .post_query_cancellable(&args.uri, &request, &cancel)
                .await
        }
        RequestMethod::Get => {
            client
                .get_query_cancellable(&args.uri, &request, &cancel)
                .await
        }
    }
    .with_context(|| format!("Introspection query against {} failed", args.uri))?;

    let output = if config.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{output}");

    tracing::debug!("Schema written ({} bytes)", output.len());
    Ok(())
}

/// Cancel `token` on Ctrl-C or once `timeout` elapses
fn cancel_on_interrupt(token: CancellationToken, timeout: Option<Duration>) {
    tokio::spawn(async move {
        let deadline = async {
            match timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            _ = token.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    tracing::warn!("Interrupted, cancelling request");
                    token.cancel();
                }
            }
            _ = deadline => {
                tracing::warn!("Timed out after {:?}, cancelling request", timeout.unwrap_or_default());
                token.cancel();
            }
        }
    });
}
