// src/cooking/validation.rs - Ingredient availability and quantity checks
//
// Pure functions over a dish snapshot. Nothing here talks to the backend.

use std::collections::HashMap;

use thiserror::Error;

use crate::backend::{Dish, DishIngredientLink};

/// Name shown for a link whose ingredient reference is gone.
const MISSING_INGREDIENT: &str = "(missing ingredient)";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Dish has no ingredients")]
    NoIngredients,

    #[error("Ingredient '{ingredient}' is unavailable")]
    Unavailable { ingredient: String },

    #[error("Please enter a quantity for '{ingredient}'")]
    QuantityRequired { ingredient: String },

    #[error("Not enough '{ingredient}' in stock: requested {requested} g, only {available} g available")]
    InsufficientStock {
        ingredient: String,
        requested: u64,
        available: u64,
    },

    #[error("Ingredient '{ingredient_id}' is not part of this dish")]
    UnknownIngredient { ingredient_id: String },

    #[error("Please select an ingredient and enter a quantity")]
    IncompleteSelection,

    #[error("Ingredient '{ingredient}' is already part of this dish")]
    AlreadyInDish { ingredient: String },

    // Dish and ingredient forms
    #[error("Dish name is required")]
    DishNameRequired,

    #[error("You must add at least one valid ingredient")]
    NoValidIngredients,

    #[error("Ingredient '{ingredient}' is selected more than once")]
    DuplicateIngredient { ingredient: String },

    #[error("No ingredient with id '{ingredient_id}'")]
    NoSuchIngredient { ingredient_id: String },

    #[error("Ingredient name is required")]
    IngredientNameRequired,
}

/// True when the dish cannot be cooked at all: no snapshot, no ingredients,
/// a dangling ingredient reference, or a null/non-positive stock quantity.
pub fn is_any_ingredient_unavailable(snapshot: Option<&Dish>) -> bool {
    match snapshot {
        Some(dish) => check_availability(dish).is_err(),
        None => true,
    }
}

/// First availability problem of the dish, in link order.
pub fn check_availability(dish: &Dish) -> Result<(), ValidationError> {
    if dish.ingredients.is_empty() {
        return Err(ValidationError::NoIngredients);
    }
    for link in &dish.ingredients {
        match &link.ingredient {
            None => {
                return Err(ValidationError::Unavailable {
                    ingredient: MISSING_INGREDIENT.into(),
                })
            }
            Some(ing) if ing.available_stock().is_none() => {
                return Err(ValidationError::Unavailable {
                    ingredient: ing.name.clone(),
                })
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Lazily yields one issue per ingredient whose requested quantity is
/// missing, zero, or above its stock. Links without an ingredient are the
/// availability check's concern and are skipped here.
fn quantity_checks<'a>(
    links: &'a [DishIngredientLink],
    quantities: &'a HashMap<String, u64>,
) -> impl Iterator<Item = ValidationError> + 'a {
    links
        .iter()
        .filter_map(|link| link.ingredient.as_ref())
        .filter_map(move |ing| {
            let requested = quantities.get(&ing.id).copied().unwrap_or(0);
            let available = ing.available_stock().unwrap_or(0);
            if requested == 0 {
                Some(ValidationError::QuantityRequired {
                    ingredient: ing.name.clone(),
                })
            } else if requested > available {
                Some(ValidationError::InsufficientStock {
                    ingredient: ing.name.clone(),
                    requested,
                    available,
                })
            } else {
                None
            }
        })
}

/// Stops at the first failing ingredient.
pub fn validate_quantities(
    links: &[DishIngredientLink],
    quantities: &HashMap<String, u64>,
) -> Result<(), ValidationError> {
    match quantity_checks(links, quantities).next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Every quantity problem at once, for showing next to each input.
pub fn quantity_issues(
    links: &[DishIngredientLink],
    quantities: &HashMap<String, u64>,
) -> Vec<ValidationError> {
    quantity_checks(links, quantities).collect()
}

/// Checks for adding `ingredient_id` to `dish` with a recipe quantity.
pub fn validate_addition(
    dish: &Dish,
    ingredient_id: &str,
    quantity: u64,
) -> Result<(), ValidationError> {
    if ingredient_id.trim().is_empty() || quantity == 0 {
        return Err(ValidationError::IncompleteSelection);
    }
    if let Some(existing) = dish.ingredient(ingredient_id) {
        return Err(ValidationError::AlreadyInDish {
            ingredient: existing.name.clone(),
        });
    }
    Ok(())
}
