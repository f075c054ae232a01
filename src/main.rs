use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};

use kubetables_k8s::KubeClient;
use kubetables_logs::{StreamIdentity, render_stream};

mod config;

use crate::config::{FileConfig, Settings};

/// Kubetables - Render Kubernetes container logs as one table per log source
#[derive(Parser, Debug)]
#[command(name = "kubetables")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Namespace whose pods are read
    #[arg(short = 'n', long, value_name = "NAMESPACE")]
    namespace: Option<String>,

    /// Only read containers whose name matches this regex [default: .*]
    #[arg(short = 'c', long, value_name = "REGEX")]
    container: Option<String>,

    /// Only keep records whose `source` field matches this regex [default: .*]
    #[arg(short = 's', long, value_name = "REGEX")]
    source: Option<String>,

    /// Only read logs newer than this duration (e.g. 5m, 1h30m)
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    since: Option<Duration>,

    /// Kubernetes context name (defaults to the current context)
    #[arg(long, value_name = "CONTEXT")]
    context: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Diagnostics go to stderr, tables to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run_app(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_app(args: Args) -> Result<()> {
    let file = FileConfig::load(args.config.as_deref())?;
    let settings = Settings::resolve(&args, file)?;

    let client = KubeClient::new(settings.context.as_deref()).await?;
    let pods = client.list_pods(&settings.namespace).await?;

    if pods.is_empty() {
        warn!(namespace = %settings.namespace, "no pods found");
    }

    let mut out = io::stdout().lock();
    let mut streams = 0usize;

    // One container at a time: its stream is drained and released before the
    // next one is opened
    for pod in &pods {
        for container in &pod.containers {
            if !settings.container_filter.is_match(&container.name) {
                debug!(pod = %pod.name, container = %container.name, "container filtered out");
                continue;
            }

            let identity = StreamIdentity::new(&settings.namespace, &pod.name, &container.name);
            let logs = client.container_logs(
                &settings.namespace,
                &pod.name,
                &container.name,
                settings.since,
            );
            let stream = logs.open().await?;

            let tables = render_stream(stream, &identity, &settings.source_filter, &mut out)
                .await
                .context(format!(
                    "Failed to process logs of {}/{}",
                    pod.name, container.name
                ))?;

            debug!(%identity, tables, "rendered container");
            streams += 1;
        }
    }

    if streams == 0 && !pods.is_empty() {
        warn!(
            pattern = settings.container_filter.pattern(),
            "no container matched the container filter"
        );
    }

    Ok(())
}
