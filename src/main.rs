// src/main.rs - DishHub entry point

use std::sync::Arc;

use clap::Parser;

use dishhub::backend::http::HttpBackend;
use dishhub::backend::DishBackend;
use dishhub::cli::{Cli, Commands};
use dishhub::infra::config::Config;
use dishhub::infra::errors::{error_report, exit_code};
use dishhub::infra::logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Respects RUST_LOG; -v flags raise the default
    logger::init_logging(logger::level_for_verbosity(cli.verbose));

    if let Err(e) = run(cli).await {
        tracing::debug!("Command failed: {e:?}");
        eprintln!("{}", error_report(&e));
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };
    let config = config.with_base_url(cli.base_url)?;

    tracing::debug!("Using backend at {}", config.backend.base_url);
    let backend: Arc<dyn DishBackend> = Arc::new(HttpBackend::from_config(&config.backend)?);

    match cli.command {
        Commands::Dishes => dishhub::cli::dishes::list_dishes(backend).await,
        Commands::Ingredients => dishhub::cli::dishes::list_ingredients(backend).await,
        Commands::Show { dish } => dishhub::cli::dishes::show_dish(backend, &dish).await,
        Commands::Cook { dish, quantities } => {
            dishhub::cli::cook::run_cook(backend, &dish, quantities).await
        }
        Commands::AddIngredient {
            dish,
            ingredient,
            grams,
        } => dishhub::cli::dishes::add_ingredient(backend, &dish, &ingredient, grams).await,
        Commands::RemoveIngredient {
            dish,
            ingredient,
            yes,
        } => dishhub::cli::dishes::remove_ingredient(backend, &dish, &ingredient, yes).await,
        Commands::CreateDish { name, ingredients } => {
            dishhub::cli::dishes::create_dish(backend, &name, ingredients).await
        }
        Commands::EditDish {
            dish,
            name,
            ingredients,
        } => dishhub::cli::dishes::edit_dish(backend, &dish, name, ingredients).await,
        Commands::DeleteDish { dish, yes } => {
            dishhub::cli::dishes::delete_dish(backend, &dish, yes).await
        }
        Commands::CreateIngredient { name, stock } => {
            dishhub::cli::dishes::create_ingredient(backend, &name, stock).await
        }
        Commands::EditIngredient {
            ingredient,
            name,
            stock,
        } => dishhub::cli::dishes::edit_ingredient(backend, &ingredient, name, stock).await,
        Commands::History {
            page,
            search,
            status,
        } => dishhub::cli::history::show_history(backend, &config, page, search, status).await,
    }
}
