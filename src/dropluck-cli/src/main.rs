mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Configure {
            set,
            unset,
            catalog,
            show,
        } => {
            commands::configure::handle(&set, &unset, catalog, show)?;
        }

        Commands::Evaluate {
            item,
            quantity,
            kill_counts,
            snapshot,
            catalog,
            foreign,
        } => {
            let config = Config::load()?;
            commands::evaluate::evaluate(
                commands::evaluate::EvaluateArgs {
                    item: item.join(" "),
                    quantity,
                    kill_counts,
                    snapshot,
                    catalog,
                    foreign,
                },
                &config,
            )?;
        }

        Commands::Report {
            snapshot,
            catalog,
            foreign,
            json,
        } => {
            let config = Config::load()?;
            commands::evaluate::report(&snapshot, catalog, foreign, json, &config)?;
        }

        Commands::Catalog { command } => {
            let config = Config::load()?;
            commands::catalog::handle(command, &config)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "dropluck=warn",
        1 => "dropluck=info",
        _ => "dropluck=debug",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
