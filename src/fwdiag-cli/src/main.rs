mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, DbCommand};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fwdiag=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode {
            db,
            input,
            fw_version,
            console,
            logfile,
            max_records,
            bus,
            silent,
            debug,
        } => {
            commands::decode::handle(
                &db,
                &input,
                fw_version,
                console,
                logfile.as_deref(),
                max_records,
                bus,
                silent,
                debug,
            )?;
        }

        Commands::Db { command } => match command {
            DbCommand::Info { db, json } => {
                commands::db::info(&db, json)?;
            }
            DbCommand::Lookup { db, id } => {
                commands::db::lookup(&db, id)?;
            }
            DbCommand::Expand { pack } => {
                commands::db::expand(&pack);
            }
        },
    }

    Ok(())
}
