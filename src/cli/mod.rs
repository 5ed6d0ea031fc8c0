// src/cli/mod.rs - CLI definition (clap derive)

pub mod cook;
pub mod dishes;
pub mod history;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dishhub", about = "Kitchen back-of-house client", version)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Backend base URL (overrides config)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List dishes
    Dishes,
    /// List ingredients and their stock
    Ingredients,
    /// Show a dish's ingredients and availability
    Show {
        /// Dish id
        dish: String,
    },
    /// Cook a dish: consume stock and time the session
    Cook {
        /// Dish id
        dish: String,
        /// Quantity to consume, as <ingredient-id>=<grams>; repeatable
        #[arg(short, long = "qty", value_parser = parse_quantity)]
        quantities: Vec<(String, u64)>,
    },
    /// Add an ingredient to a dish
    AddIngredient {
        /// Dish id
        dish: String,
        /// Ingredient id
        ingredient: String,
        /// Recipe quantity in grams
        grams: u64,
    },
    /// Remove an ingredient from a dish
    RemoveIngredient {
        /// Dish id
        dish: String,
        /// Ingredient id
        ingredient: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Create a dish from existing ingredients
    CreateDish {
        /// Dish name
        name: String,
        /// Ingredient id; repeatable, each at most once
        #[arg(short, long = "ingredient", required = true)]
        ingredients: Vec<String>,
    },
    /// Rename a dish or replace its ingredient list
    EditDish {
        /// Dish id
        dish: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// Ingredient id; repeatable. Replaces the whole list when given
        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,
    },
    /// Delete a dish
    DeleteDish {
        /// Dish id
        dish: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Create an ingredient
    CreateIngredient {
        /// Ingredient name
        name: String,
        /// Grams in stock
        #[arg(long, default_value = "0")]
        stock: u64,
    },
    /// Rename an ingredient or set its stock
    EditIngredient {
        /// Ingredient id
        ingredient: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// Grams in stock
        #[arg(long)]
        stock: Option<u64>,
    },
    /// Show cooking history
    History {
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Filter by dish name
        #[arg(long)]
        search: Option<String>,
        /// Filter by status (e.g. "cooking started")
        #[arg(long)]
        status: Option<String>,
    },
}

/// Parse `<ingredient-id>=<grams>`.
pub fn parse_quantity(s: &str) -> Result<(String, u64), String> {
    let (id, grams) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <ingredient-id>=<grams>, got '{s}'"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing ingredient id in '{s}'"));
    }
    let grams = grams
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("'{}' is not a whole number of grams", grams.trim()))?;
    Ok((id.to_string(), grams))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("tomato=40"), Ok(("tomato".into(), 40)));
        assert_eq!(parse_quantity(" salt = 3 "), Ok(("salt".into(), 3)));
        assert!(parse_quantity("tomato").is_err());
        assert!(parse_quantity("=40").is_err());
        assert!(parse_quantity("tomato=-1").is_err());
        assert!(parse_quantity("tomato=a lot").is_err());
    }

    #[test]
    fn test_cli_parses_cook() {
        let cli = Cli::try_parse_from(["dishhub", "cook", "d1", "-q", "tomato=40", "--qty", "basil=2"])
            .unwrap();
        match cli.command {
            Commands::Cook { dish, quantities } => {
                assert_eq!(dish, "d1");
                assert_eq!(quantities.len(), 2);
                assert_eq!(quantities[1], ("basil".to_string(), 2));
            }
            _ => panic!("expected cook"),
        }
    }

    #[test]
    fn test_cli_parses_create_dish() {
        let cli = Cli::try_parse_from([
            "dishhub", "create-dish", "Pasta", "-i", "tomato", "--ingredient", "basil",
        ])
        .unwrap();
        match cli.command {
            Commands::CreateDish { name, ingredients } => {
                assert_eq!(name, "Pasta");
                assert_eq!(ingredients, vec!["tomato", "basil"]);
            }
            _ => panic!("expected create-dish"),
        }
        assert!(Cli::try_parse_from(["dishhub", "create-dish", "Pasta"]).is_err());
    }

    #[test]
    fn test_cli_parses_edit_ingredient() {
        let cli =
            Cli::try_parse_from(["dishhub", "edit-ingredient", "basil", "--stock", "75"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::EditIngredient { name: None, stock: Some(75), .. }
        ));
        assert!(Cli::try_parse_from(["dishhub", "create-ingredient", "Salt", "--stock", "-1"]).is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from(["dishhub", "-vv", "history", "--base-url", "http://x:1"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.base_url.as_deref(), Some("http://x:1"));
        assert!(matches!(cli.command, Commands::History { page: 1, .. }));
    }
}
