mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wordlistctl_core::{load_catalog, load_config, resolve_category};

use cli::{Cli, Operation};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Error while running operation: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if std::env::args_os().len() <= 1 {
        Cli::command().print_help()?;
        return Ok(());
    }

    let cli = Cli::parse();
    let operation = cli.operation()?;

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);

    if let Operation::SearchLocal(pattern) = &operation {
        return commands::search_local(&config.retrieval.base_dir, pattern);
    }

    let catalog = load_catalog(&config.catalog)
        .await
        .with_context(|| format!("Failed to load catalog from {:?}", config.catalog))?;

    if let Some(key) = cli.category_key() {
        let category = resolve_category(&catalog, key).context("Error while changing category")?;
        info!(category = %category.name, "Category selected");
        config.retrieval.category = Some(category.name.clone());
    }
    let active = config.retrieval.category.clone();

    match operation {
        Operation::Fetch(id) => commands::fetch(&config, &catalog, id).await,
        Operation::ListEntries => commands::print_entries(&catalog, active.as_deref()),
        Operation::ListCategories => {
            commands::print_categories(&catalog);
            Ok(())
        }
        Operation::ListNamed(names) => commands::print_named(&catalog, &names),
        Operation::SearchCatalog(pattern) => {
            commands::search_catalog(&catalog, active.as_deref(), &pattern)
        }
        Operation::SearchLocal(_) => Ok(()),
    }
}
