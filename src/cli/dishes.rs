// src/cli/dishes.rs - Dish and ingredient listing and maintenance

use std::fmt::Write as _;
use std::sync::Arc;

use crate::backend::{Dish, DishBackend, DishDraft, DishSummary, Ingredient};
use crate::catalog;
use crate::cooking::session::{AssumeYes, Confirm, CookingSession, DeleteOutcome};
use crate::util::truncate_str;

/// Prompts on the terminal via inquire. Defaults to "no".
pub struct InquireConfirm {
    help: &'static str,
}

impl InquireConfirm {
    pub const INGREDIENT: Self = Self {
        help: "You will not be able to recover this ingredient.",
    };
    pub const DISH: Self = Self {
        help: "You will not be able to recover this dish.",
    };
}

impl Confirm for InquireConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        inquire::Confirm::new(prompt)
            .with_default(false)
            .with_help_message(self.help)
            .prompt()
            .unwrap_or(false)
    }
}

pub async fn list_dishes(backend: Arc<dyn DishBackend>) -> anyhow::Result<()> {
    let dishes = backend.dishes().await?;
    print!("{}", render_dish_list(&dishes));
    Ok(())
}

pub async fn list_ingredients(backend: Arc<dyn DishBackend>) -> anyhow::Result<()> {
    let ingredients = backend.ingredients().await?;
    print!("{}", render_ingredient_list(&ingredients));
    Ok(())
}

pub async fn show_dish(backend: Arc<dyn DishBackend>, dish_id: &str) -> anyhow::Result<()> {
    let dish = backend.dish(dish_id).await?;
    print!("{}", render_dish(&dish));
    Ok(())
}

pub async fn add_ingredient(
    backend: Arc<dyn DishBackend>,
    dish_id: &str,
    ingredient_id: &str,
    grams: u64,
) -> anyhow::Result<()> {
    let mut session = CookingSession::open(backend, dish_id).await?;
    session.add_ingredient(ingredient_id, grams).await?;
    println!("Ingredient added successfully.");
    print!("{}", render_dish(session.dish()));
    Ok(())
}

pub async fn remove_ingredient(
    backend: Arc<dyn DishBackend>,
    dish_id: &str,
    ingredient_id: &str,
    yes: bool,
) -> anyhow::Result<()> {
    let mut session = CookingSession::open(backend, dish_id).await?;
    let outcome = if yes {
        session.delete_ingredient(ingredient_id, &AssumeYes).await?
    } else {
        session
            .delete_ingredient(ingredient_id, &InquireConfirm::INGREDIENT)
            .await?
    };
    match outcome {
        DeleteOutcome::Deleted => {
            println!("The ingredient has been removed.");
            print!("{}", render_dish(session.dish()));
        }
        DeleteOutcome::Declined => println!("Nothing deleted."),
        DeleteOutcome::Blocked => println!("Cannot delete ingredients while cooking."),
    }
    Ok(())
}

pub async fn create_dish(
    backend: Arc<dyn DishBackend>,
    name: &str,
    ingredient_ids: Vec<String>,
) -> anyhow::Result<()> {
    catalog::create_dish(backend.as_ref(), DishDraft::new(name, ingredient_ids)).await?;
    println!("Dish '{}' created.", name.trim());
    Ok(())
}

pub async fn edit_dish(
    backend: Arc<dyn DishBackend>,
    dish_id: &str,
    name: Option<String>,
    ingredient_ids: Vec<String>,
) -> anyhow::Result<()> {
    if name.is_none() && ingredient_ids.is_empty() {
        anyhow::bail!("Nothing to change: pass --name and/or --ingredient");
    }
    let ingredient_ids = (!ingredient_ids.is_empty()).then_some(ingredient_ids);
    let dish = catalog::edit_dish(backend.as_ref(), dish_id, name, ingredient_ids).await?;
    println!("Dish updated successfully.");
    print!("{}", render_dish(&dish));
    Ok(())
}

pub async fn delete_dish(
    backend: Arc<dyn DishBackend>,
    dish_id: &str,
    yes: bool,
) -> anyhow::Result<()> {
    let deleted = if yes {
        catalog::delete_dish(backend.as_ref(), dish_id, &AssumeYes).await?
    } else {
        catalog::delete_dish(backend.as_ref(), dish_id, &InquireConfirm::DISH).await?
    };
    if deleted {
        println!("The dish has been deleted.");
    } else {
        println!("Nothing deleted.");
    }
    Ok(())
}

pub async fn create_ingredient(
    backend: Arc<dyn DishBackend>,
    name: &str,
    stock: u64,
) -> anyhow::Result<()> {
    catalog::create_ingredient(backend.as_ref(), name, stock).await?;
    println!("Ingredient '{}' created with {} g in stock.", name.trim(), stock);
    Ok(())
}

pub async fn edit_ingredient(
    backend: Arc<dyn DishBackend>,
    ingredient_id: &str,
    name: Option<String>,
    stock: Option<u64>,
) -> anyhow::Result<()> {
    if name.is_none() && stock.is_none() {
        anyhow::bail!("Nothing to change: pass --name and/or --stock");
    }
    let ingredient = catalog::edit_ingredient(backend.as_ref(), ingredient_id, name, stock).await?;
    println!("Ingredient updated successfully.");
    print!("{}", render_ingredient_list(std::slice::from_ref(&ingredient)));
    Ok(())
}

pub fn render_dish_list(dishes: &[DishSummary]) -> String {
    if dishes.is_empty() {
        return "No dishes.\n".to_string();
    }
    let mut out = String::new();
    for d in dishes {
        let _ = writeln!(out, "{:<26} {}", d.id, truncate_str(&d.name, 40));
    }
    out
}

pub fn render_ingredient_list(ingredients: &[Ingredient]) -> String {
    if ingredients.is_empty() {
        return "No ingredients.\n".to_string();
    }
    let mut out = String::new();
    for ing in ingredients {
        let stock = match ing.stock_quantity {
            Some(q) => format!("{q} g"),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<26} {:<24} {:>8}",
            ing.id,
            truncate_str(&ing.name, 24),
            stock
        );
    }
    out
}

/// Dish name, one line per ingredient, and whether it can be cooked.
pub fn render_dish(dish: &Dish) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", dish.name);
    if dish.ingredients.is_empty() {
        let _ = writeln!(out, "  (no ingredients)");
    }
    for link in &dish.ingredients {
        match &link.ingredient {
            Some(ing) => {
                let stock = match ing.available_stock() {
                    Some(q) => format!("{q} g"),
                    None => "out of stock".to_string(),
                };
                let _ = writeln!(out, "  {:<20} {:<16} ({})", ing.name, ing.id, stock);
            }
            None => {
                let _ = writeln!(out, "  (ingredient no longer exists)");
            }
        }
    }
    if crate::cooking::validation::is_any_ingredient_unavailable(Some(dish)) {
        let _ = writeln!(out, "Cannot cook: one or more ingredients are unavailable.");
    }
    out
}
