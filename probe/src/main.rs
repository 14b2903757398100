//! Connectivity probe for a FishCatch backend.
//!
//! Loads the endpoint configuration the same way the library does, lists
//! every selected resource once and reports how each call was classified.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use fishcatch_core::{ApiClient, ApiConfig, Outcome, RequestOptions, Resource, UreqTransport, UrlMode};
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fishcatch-probe", about = "Check that every FishCatch endpoint answers", version)]
struct Cli {
    /// Dotenv file to load before reading the environment
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Resource to probe (repeatable; default: all)
    #[arg(long = "resource", value_name = "NAME")]
    resources: Vec<Resource>,

    /// Log every request and response
    #[arg(long)]
    debug: bool,

    /// Strip scheme and host so requests go through a dev proxy
    #[arg(long)]
    proxy: bool,

    /// Origin that proxy-relative URLs are sent to (with --proxy or relative bases)
    #[arg(long, value_name = "URL", default_value = "http://localhost:5173")]
    origin: String,
}

fn init_tracing(debug: bool) {
    let default = if debug { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Relative URLs reach the network only through an origin.
fn needs_origin(config: &ApiConfig, proxy: bool) -> bool {
    proxy
        || Resource::ALL.iter().any(|&resource| {
            config
                .endpoint(resource)
                .base_url
                .as_deref()
                .is_some_and(|base| base.starts_with('/'))
        })
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Json(serde_json::Value::Array(items)) => format!("OK ({} items)", items.len()),
        Outcome::Json(_) => "OK (object)".to_string(),
        Outcome::Empty => "EMPTY".to_string(),
        Outcome::Text { content_type, .. } if content_type.is_empty() => "TEXT".to_string(),
        Outcome::Text { content_type, .. } => format!("TEXT ({content_type})"),
    }
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut config = match &cli.env_file {
        Some(path) => ApiConfig::from_env_file(path)
            .wrap_err_with(|| format!("loading {}", path.display()))?,
        None => ApiConfig::from_env(),
    };
    if cli.debug {
        config = config.with_debug(true);
    }

    let mut transport = UreqTransport::new();
    if needs_origin(&config, cli.proxy) {
        info!(origin = %cli.origin, "sending relative URLs through the proxy origin");
        transport = transport.with_origin(cli.origin.as_str());
    }
    if cli.proxy {
        config = config.with_url_mode(UrlMode::DevProxy);
    }

    for key in config.missing_keys() {
        println!("{key} is not defined");
    }

    let resources = if cli.resources.is_empty() {
        Resource::ALL.to_vec()
    } else {
        cli.resources.clone()
    };

    let client = ApiClient::new(config, transport);
    let mut failed = false;
    for resource in resources {
        info!(resource = resource.name(), "checking endpoint");
        match client.request_resource(resource, "", RequestOptions::get()) {
            Ok(outcome) => println!("{:<11} {}", resource.name(), describe(&outcome)),
            Err(err) => {
                failed = true;
                println!("{:<11} FAILED: {err}", resource.name());
            }
        }
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
