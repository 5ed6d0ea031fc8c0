// src/backend/mod.rs - DishHub REST backend: trait and wire types

pub mod envelope;
pub mod http;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::infra::errors::DishHubError;

/// Everything the client needs from the kitchen backend.
///
/// The backend owns stock quantities. Callers only read snapshots and submit
/// consumption requests; stock changes happen server-side.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DishBackend: Send + Sync {
    /// `GET /dish/{dishId}`
    async fn dish(&self, dish_id: &str) -> Result<Dish, DishHubError>;

    /// `PUT /dishes/{dishId}/start`
    async fn start_cooking(
        &self,
        dish_id: &str,
        request: &ConsumptionRequest,
    ) -> Result<(), DishHubError>;

    /// `PUT /dishes/{dishId}/stop`
    async fn stop_cooking(
        &self,
        dish_id: &str,
        request: &ConsumptionRequest,
    ) -> Result<(), DishHubError>;

    /// `DELETE /dishes/{dishId}/ingredients/{ingredientId}`
    async fn delete_ingredient(&self, dish_id: &str, ingredient_id: &str)
        -> Result<(), DishHubError>;

    /// `PUT /dishes/{dishId}/add-ing`
    async fn add_ingredient(
        &self,
        dish_id: &str,
        request: &ConsumptionRequest,
    ) -> Result<(), DishHubError>;

    /// `GET /dishes`
    async fn dishes(&self) -> Result<Vec<DishSummary>, DishHubError>;

    /// `GET /ing`
    async fn ingredients(&self) -> Result<Vec<Ingredient>, DishHubError>;

    /// `GET /dishes/history`
    async fn history(&self, query: &HistoryQuery) -> Result<HistoryPage, DishHubError>;

    /// `POST /dish`
    async fn create_dish(&self, draft: &DishDraft) -> Result<(), DishHubError>;

    /// `PUT /dish/{dishId}`
    async fn update_dish(&self, dish_id: &str, draft: &DishDraft) -> Result<(), DishHubError>;

    /// `DELETE /dish/{dishId}`
    async fn delete_dish(&self, dish_id: &str) -> Result<(), DishHubError>;

    /// `GET /ing/{ingredientId}`
    async fn ingredient(&self, ingredient_id: &str) -> Result<Ingredient, DishHubError>;

    /// `POST /ing`
    async fn create_ingredient(&self, draft: &IngredientDraft) -> Result<(), DishHubError>;

    /// `PUT /ing/{ingredientId}`
    async fn update_ingredient(
        &self,
        ingredient_id: &str,
        draft: &IngredientDraft,
    ) -> Result<(), DishHubError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Grams on hand. Null, missing or non-positive means unavailable.
    #[serde(rename = "stockQuantity", default, deserialize_with = "whole_number")]
    pub stock_quantity: Option<i64>,
}

impl Ingredient {
    /// Stock usable for cooking, or `None` if the ingredient is unavailable.
    pub fn available_stock(&self) -> Option<u64> {
        self.stock_quantity
            .filter(|q| *q > 0)
            .and_then(|q| u64::try_from(q).ok())
    }
}

/// One entry of a dish's composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishIngredientLink {
    #[serde(rename = "_id", default)]
    pub id: String,
    /// `None` when the referenced ingredient has been deleted server-side.
    #[serde(default)]
    pub ingredient: Option<Ingredient>,
    /// Recipe quantity; display only.
    #[serde(default, deserialize_with = "whole_number")]
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<DishIngredientLink>,
}

impl Dish {
    pub fn contains_ingredient(&self, ingredient_id: &str) -> bool {
        self.ingredients
            .iter()
            .filter_map(|link| link.ingredient.as_ref())
            .any(|ing| ing.id == ingredient_id)
    }

    pub fn ingredient(&self, ingredient_id: &str) -> Option<&Ingredient> {
        self.ingredients
            .iter()
            .filter_map(|link| link.ingredient.as_ref())
            .find(|ing| ing.id == ingredient_id)
    }
}

/// Row of `GET /dishes`; the list view only needs identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Body of `POST /dish` and `PUT /dish/{id}`: a name and the ingredient
/// ids that make up the dish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishDraft {
    pub name: String,
    pub ingredients: Vec<DraftIngredient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftIngredient {
    pub ingredient: String,
}

impl DishDraft {
    pub fn new<I, S>(name: impl Into<String>, ingredient_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            ingredients: ingredient_ids
                .into_iter()
                .map(|id| DraftIngredient {
                    ingredient: id.into(),
                })
                .collect(),
        }
    }

    pub fn ingredient_ids(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|i| i.ingredient.as_str())
    }
}

/// Current composition of an existing dish. Dangling links are dropped.
impl From<&Dish> for DishDraft {
    fn from(dish: &Dish) -> Self {
        Self::new(
            dish.name.clone(),
            dish.ingredients
                .iter()
                .filter_map(|link| link.ingredient.as_ref())
                .map(|ing| ing.id.clone()),
        )
    }
}

/// Body of `POST /ing` and `PUT /ing/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientDraft {
    pub name: String,
    #[serde(rename = "stockQuantity")]
    pub stock_quantity: u64,
}

/// Body of the start/stop/add-ing calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionRequest {
    pub ingredients: Vec<ConsumptionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionEntry {
    #[serde(rename = "ingredientId")]
    pub ingredient_id: String,
    #[serde(rename = "newQuantity")]
    pub new_quantity: u64,
}

impl ConsumptionRequest {
    pub fn single(ingredient_id: impl Into<String>, quantity: u64) -> Self {
        Self {
            ingredients: vec![ConsumptionEntry {
                ingredient_id: ingredient_id.into(),
                new_quantity: quantity,
            }],
        }
    }

    pub fn quantity_for(&self, ingredient_id: &str) -> Option<u64> {
        self.ingredients
            .iter()
            .find(|e| e.ingredient_id == ingredient_id)
            .map(|e| e.new_quantity)
    }
}

impl FromIterator<(String, u64)> for ConsumptionRequest {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            ingredients: iter
                .into_iter()
                .map(|(ingredient_id, new_quantity)| ConsumptionEntry {
                    ingredient_id,
                    new_quantity,
                })
                .collect(),
        }
    }
}

/// Query string of `GET /dishes/history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl HistoryQuery {
    /// Page numbers are 1-based; anything lower is clamped to the first page.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            search: None,
            status: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
}

/// One cooking-session entry recorded by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ingredients: Vec<HistoryIngredient>,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "inputedQuantity", default, deserialize_with = "whole_number")]
    pub inputed_quantity: Option<i64>,
    /// Seconds.
    #[serde(rename = "totalCookingTime", default, deserialize_with = "whole_number")]
    pub total_cooking_time: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryIngredient {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub ingredient: Option<NamedRef>,
    #[serde(default, deserialize_with = "whole_number")]
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: String,
}

/// Accept any JSON number and round fractions down (`12.5` -> 12).
/// Values that do not fit the target type decode as `None`.
fn whole_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let Some(n) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let whole = match (n.as_i64(), n.as_u64()) {
        (Some(i), _) => i,
        (None, Some(_)) => i64::MAX,
        (None, None) => n.as_f64().map_or(0, |f| f.floor() as i64),
    };
    Ok(T::try_from(whole).ok())
}
