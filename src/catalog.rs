// src/catalog.rs - Dish and ingredient maintenance
//
// Create, edit and delete the catalog entries that cooking sessions read.
// Form checks run before any write request; edits start from the current
// server copy so omitted fields keep their value.

use std::collections::HashSet;

use crate::backend::{Dish, DishBackend, DishDraft, Ingredient, IngredientDraft};
use crate::cooking::session::Confirm;
use crate::cooking::validation::ValidationError;
use crate::infra::errors::DishHubError;

pub const DELETE_DISH_PROMPT: &str = "Are you sure you want to delete this dish?";

/// Check a dish form against the known ingredients.
///
/// The name must not be blank, every selected id must exist and appear
/// once, and at least one ingredient must be selected.
pub fn validate_dish_draft(draft: &DishDraft, known: &[Ingredient]) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::DishNameRequired);
    }
    if draft.ingredient_ids().all(|id| id.trim().is_empty()) {
        return Err(ValidationError::NoValidIngredients);
    }

    let mut seen = HashSet::new();
    for id in draft.ingredient_ids() {
        if id.trim().is_empty() {
            return Err(ValidationError::IncompleteSelection);
        }
        let Some(ingredient) = known.iter().find(|i| i.id == id) else {
            return Err(ValidationError::NoSuchIngredient {
                ingredient_id: id.to_string(),
            });
        };
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateIngredient {
                ingredient: ingredient.name.clone(),
            });
        }
    }
    Ok(())
}

pub fn validate_ingredient_draft(draft: &IngredientDraft) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::IngredientNameRequired);
    }
    Ok(())
}

fn normalized(mut draft: DishDraft) -> DishDraft {
    draft.name = draft.name.trim().to_string();
    draft
}

pub async fn create_dish(backend: &dyn DishBackend, draft: DishDraft) -> Result<(), DishHubError> {
    let known = backend.ingredients().await?;
    validate_dish_draft(&draft, &known)?;
    let draft = normalized(draft);
    backend.create_dish(&draft).await?;
    tracing::info!("Created dish '{}'", draft.name);
    Ok(())
}

/// Rename a dish and/or replace its ingredient list. Returns the dish as
/// stored after the update.
pub async fn edit_dish(
    backend: &dyn DishBackend,
    dish_id: &str,
    name: Option<String>,
    ingredient_ids: Option<Vec<String>>,
) -> Result<Dish, DishHubError> {
    let current = backend.dish(dish_id).await?;
    let mut draft = DishDraft::from(&current);
    if let Some(name) = name {
        draft.name = name;
    }
    if let Some(ids) = ingredient_ids {
        draft = DishDraft::new(draft.name, ids);
    }

    let known = backend.ingredients().await?;
    validate_dish_draft(&draft, &known)?;
    let draft = normalized(draft);
    backend.update_dish(dish_id, &draft).await?;
    tracing::info!("Updated dish '{}'", draft.name);
    backend.dish(dish_id).await
}

/// Delete a dish after confirmation. Returns false if the user declined.
pub async fn delete_dish(
    backend: &dyn DishBackend,
    dish_id: &str,
    confirm: &(dyn Confirm + Sync),
) -> Result<bool, DishHubError> {
    let dish = backend.dish(dish_id).await?;
    if !confirm.confirm(&format!("{DELETE_DISH_PROMPT} ({})", dish.name)) {
        return Ok(false);
    }
    backend.delete_dish(dish_id).await?;
    tracing::info!("Deleted dish '{}'", dish.name);
    Ok(true)
}

pub async fn create_ingredient(
    backend: &dyn DishBackend,
    name: &str,
    stock_quantity: u64,
) -> Result<(), DishHubError> {
    let draft = IngredientDraft {
        name: name.trim().to_string(),
        stock_quantity,
    };
    validate_ingredient_draft(&draft)?;
    backend.create_ingredient(&draft).await?;
    tracing::info!("Created ingredient '{}' ({} g)", draft.name, stock_quantity);
    Ok(())
}

/// Change an ingredient's name and/or stock. Returns the stored ingredient.
pub async fn edit_ingredient(
    backend: &dyn DishBackend,
    ingredient_id: &str,
    name: Option<String>,
    stock_quantity: Option<u64>,
) -> Result<Ingredient, DishHubError> {
    let current = backend.ingredient(ingredient_id).await?;
    let draft = IngredientDraft {
        name: name.unwrap_or(current.name).trim().to_string(),
        stock_quantity: stock_quantity
            .or_else(|| current.stock_quantity.and_then(|q| u64::try_from(q).ok()))
            .unwrap_or(0),
    };
    validate_ingredient_draft(&draft)?;
    backend.update_ingredient(ingredient_id, &draft).await?;
    tracing::info!("Updated ingredient '{}'", draft.name);
    backend.ingredient(ingredient_id).await
}
