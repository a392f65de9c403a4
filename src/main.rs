// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use url::Url;

use objcheck::bootstrap::{run_driver, run_probe, run_server, DriveOptions, ProbeOptions};
use objcheck::{CheckRequest, ObjcheckConfig, ObjcheckConfigBuilder, Telemetry};

#[derive(Parser)]
#[command(
    name = "objcheck",
    version,
    about = "Object-storage latency probes",
    long_about = "Serve object and endpoint checks over HTTP, drive remote check\n\
                  functions on a burst schedule, or run checks locally."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve POST /ObjCheck and POST /HTTPCheck
    Serve {
        /// Listen address, overrides OBJCHECK_BIND / PORT
        #[arg(long)]
        bind: Option<String>,
    },
    /// Post scheduled endpoint checks to the check functions
    Drive {
        /// Check function URL; repeat to replace the configured set
        #[arg(long = "url")]
        urls: Vec<Url>,
        /// Storage type named in each job
        #[arg(long, default_value = "GCS")]
        endpoint: String,
        /// Object size tag of each target
        #[arg(long, default_value = "1k")]
        size_tag: String,
    },
    /// Run object checks locally through the worker pool
    Probe {
        #[arg(long, default_value = "gcs")]
        service: String,
        #[arg(long, default_value = "us-central1")]
        region: String,
        #[arg(long, default_value_t = 10)]
        pool: i64,
        #[arg(long, default_value_t = 10)]
        count: i64,
        /// Number of checks to run
        #[arg(long, default_value_t = 1)]
        repeat: usize,
        /// Serve objects from memory instead of the real services
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ObjcheckConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("objcheck: {e}");
            return ExitCode::from(2);
        }
    };

    let telemetry = match Telemetry::init(&config.telemetry) {
        Ok(telemetry) => telemetry,
        Err(e) => {
            eprintln!("objcheck: {e}");
            return ExitCode::from(2);
        }
    };

    let outcome = run(cli.command, config).await;
    telemetry.shutdown();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("objcheck failed: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(command: Commands, config: ObjcheckConfig) -> anyhow::Result<()> {
    match command {
        Commands::Serve { bind } => {
            let mut builder = ObjcheckConfigBuilder::from_config(config);
            if let Some(bind) = bind {
                builder = builder.bind_addr(bind);
            }
            run_server(builder.build()).await
        }
        Commands::Drive {
            urls,
            endpoint,
            size_tag,
        } => {
            let config = if urls.is_empty() {
                config
            } else {
                ObjcheckConfigBuilder::from_config(config)
                    .function_urls(urls)
                    .build()
            };
            run_driver(config, DriveOptions { endpoint, size_tag }).await?;
            Ok(())
        }
        Commands::Probe {
            service,
            region,
            pool,
            count,
            repeat,
            dry_run,
        } => {
            let options = ProbeOptions {
                request: CheckRequest::new(service, region, pool, count),
                repeat,
                dry_run,
            };
            run_probe(config, options).await?;
            Ok(())
        }
    }
}
