// src/cooking/session.rs - Cooking session state machine
//
// Idle --start_cooking--> Cooking --stop_cooking--> Stopped --start_cooking--> Cooking ...
//
// The session owns a read-only snapshot of the dish. Stock is only ever
// changed server-side through the consumption requests sent on start/stop,
// so the snapshot is re-fetched after every successful mutating call.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::timer::{CancellationToken, CookingTimer};
use super::validation::{self, ValidationError};
use crate::backend::{ConsumptionEntry, ConsumptionRequest, Dish, DishBackend};
use crate::infra::errors::DishHubError;

/// Externally visible phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Cooking,
    Stopped,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Cooking => "cooking",
            Phase::Stopped => "stopped",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The timer only exists inside `Cooking`.
enum CookingState {
    Idle,
    Cooking {
        timer: CookingTimer,
        /// (ingredient id, stock when cooking started), in link order.
        baseline: Vec<(String, u64)>,
    },
    Stopped,
}

impl CookingState {
    fn phase(&self) -> Phase {
        match self {
            CookingState::Idle => Phase::Idle,
            CookingState::Cooking { .. } => Phase::Cooking,
            CookingState::Stopped => Phase::Stopped,
        }
    }
}

/// Asks the user to confirm a destructive action.
#[cfg_attr(test, mockall::automock)]
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything; for `--yes` style invocations.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Not attempted because the dish is cooking.
    Blocked,
    /// The user declined the confirmation.
    Declined,
    Deleted,
}

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this ingredient?";

pub struct CookingSession {
    backend: Arc<dyn DishBackend>,
    dish_id: String,
    snapshot: Dish,
    /// True when the last refresh after a mutation failed.
    stale: bool,
    quantities: HashMap<String, u64>,
    state: CookingState,
    total_cooking_seconds: u64,
    cancel: CancellationToken,
}

impl CookingSession {
    /// Fetch the dish and open a session in `Idle`.
    pub async fn open(
        backend: Arc<dyn DishBackend>,
        dish_id: impl Into<String>,
    ) -> Result<Self, DishHubError> {
        let dish_id = dish_id.into();
        let snapshot = backend.dish(&dish_id).await?;
        tracing::info!(
            "Opened dish '{}' ({} ingredient(s))",
            snapshot.name,
            snapshot.ingredients.len()
        );
        Ok(Self {
            backend,
            dish_id,
            snapshot,
            stale: false,
            quantities: HashMap::new(),
            state: CookingState::Idle,
            total_cooking_seconds: 0,
            cancel: CancellationToken::new(),
        })
    }

    pub fn dish_id(&self) -> &str {
        &self.dish_id
    }

    pub fn dish(&self) -> &Dish {
        &self.snapshot
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_cooking(&self) -> bool {
        self.phase() == Phase::Cooking
    }

    /// Seconds in the current cooking run; 0 unless cooking.
    pub fn elapsed_seconds(&self) -> u64 {
        match &self.state {
            CookingState::Cooking { timer, .. } => timer.elapsed_seconds(),
            _ => 0,
        }
    }

    /// Sum of all completed cooking runs in this session.
    pub fn total_cooking_seconds(&self) -> u64 {
        self.total_cooking_seconds
    }

    pub fn quantity(&self, ingredient_id: &str) -> Option<u64> {
        self.quantities.get(ingredient_id).copied()
    }

    /// Handle for abandoning the session from outside its owner.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_any_ingredient_unavailable(&self) -> bool {
        validation::is_any_ingredient_unavailable(Some(&self.snapshot))
    }

    /// Whether a start control should be enabled.
    pub fn can_start(&self) -> bool {
        !self.is_closed() && !self.is_cooking() && !self.is_any_ingredient_unavailable()
    }

    pub fn can_delete(&self) -> bool {
        !self.is_closed() && !self.is_cooking()
    }

    /// Every quantity problem for the current inputs, for per-field display.
    pub fn quantity_issues(&self) -> Vec<ValidationError> {
        validation::quantity_issues(&self.snapshot.ingredients, &self.quantities)
    }

    /// Record the amount the user wants to consume. Allowed in any phase.
    pub fn set_quantity(&mut self, ingredient_id: &str, quantity: u64) -> Result<(), DishHubError> {
        if !self.snapshot.contains_ingredient(ingredient_id) {
            return Err(ValidationError::UnknownIngredient {
                ingredient_id: ingredient_id.to_string(),
            }
            .into());
        }
        self.quantities.insert(ingredient_id.to_string(), quantity);
        Ok(())
    }

    /// Forget an entered quantity, as if the field were left blank.
    pub fn clear_quantity(&mut self, ingredient_id: &str) {
        self.quantities.remove(ingredient_id);
    }

    /// Validate the entered quantities, ask the backend to consume them and
    /// start the timer.
    ///
    /// Nothing changes locally unless the backend acknowledges.
    pub async fn start_cooking(&mut self) -> Result<(), DishHubError> {
        self.ensure_open()?;
        if self.is_cooking() {
            return Err(DishHubError::InvalidTransition {
                action: "start cooking",
                state: Phase::Cooking.as_str(),
            });
        }

        let checked = validation::check_availability(&self.snapshot).and_then(|_| {
            validation::validate_quantities(&self.snapshot.ingredients, &self.quantities)
        });
        if let Err(e) = checked {
            tracing::warn!("Start rejected for '{}': {}", self.snapshot.name, e);
            return Err(e.into());
        }

        let mut baseline = Vec::with_capacity(self.snapshot.ingredients.len());
        let mut request = ConsumptionRequest::default();
        for ing in self
            .snapshot
            .ingredients
            .iter()
            .filter_map(|link| link.ingredient.as_ref())
        {
            let requested = self.quantities.get(&ing.id).copied().unwrap_or(0);
            baseline.push((ing.id.clone(), ing.available_stock().unwrap_or(0)));
            request.ingredients.push(ConsumptionEntry {
                ingredient_id: ing.id.clone(),
                new_quantity: requested,
            });
        }

        tracing::debug!(
            "Starting '{}' with {} ingredient(s)",
            self.snapshot.name,
            request.ingredients.len()
        );
        if let Err(e) = self.backend.start_cooking(&self.dish_id, &request).await {
            tracing::warn!("Backend refused start for '{}': {}", self.snapshot.name, e);
            return Err(e);
        }
        self.ensure_open()?;

        self.state = CookingState::Cooking {
            timer: CookingTimer::start(self.cancel.clone()),
            baseline,
        };
        tracing::info!("Cooking started: '{}'", self.snapshot.name);

        self.refresh_after_mutation().await;
        Ok(())
    }

    /// Submit the final quantities, stop the timer and add the run to the
    /// total. Returns the seconds of the run that just ended.
    ///
    /// Ingredients without an entered quantity fall back to the stock they
    /// had when cooking started.
    pub async fn stop_cooking(&mut self) -> Result<u64, DishHubError> {
        self.ensure_open()?;
        let request: ConsumptionRequest = match &self.state {
            CookingState::Cooking { baseline, .. } => baseline
                .iter()
                .map(|(id, stock)| {
                    let qty = self.quantities.get(id).copied().unwrap_or(*stock);
                    (id.clone(), qty)
                })
                .collect(),
            other => {
                return Err(DishHubError::InvalidTransition {
                    action: "stop cooking",
                    state: other.phase().as_str(),
                })
            }
        };

        if let Err(e) = self.backend.stop_cooking(&self.dish_id, &request).await {
            tracing::warn!("Backend refused stop for '{}': {}", self.snapshot.name, e);
            return Err(e);
        }
        self.ensure_open()?;

        let mut elapsed = 0;
        if let CookingState::Cooking { timer, .. } =
            std::mem::replace(&mut self.state, CookingState::Stopped)
        {
            elapsed = timer.stop();
        }
        self.total_cooking_seconds += elapsed;
        tracing::info!(
            "Cooking stopped: '{}' after {}s (total {}s)",
            self.snapshot.name,
            elapsed,
            self.total_cooking_seconds
        );

        self.refresh_after_mutation().await;
        Ok(elapsed)
    }

    /// Remove an ingredient from the dish after confirmation.
    ///
    /// While cooking this does nothing: no prompt, no request.
    pub async fn delete_ingredient(
        &mut self,
        ingredient_id: &str,
        confirm: &(dyn Confirm + Sync),
    ) -> Result<DeleteOutcome, DishHubError> {
        self.ensure_open()?;
        if self.is_cooking() {
            tracing::debug!("Ignoring delete of '{}' while cooking", ingredient_id);
            return Ok(DeleteOutcome::Blocked);
        }
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(DeleteOutcome::Declined);
        }

        self.backend
            .delete_ingredient(&self.dish_id, ingredient_id)
            .await?;
        self.ensure_open()?;

        self.quantities.remove(ingredient_id);
        tracing::info!("Removed ingredient '{}' from '{}'", ingredient_id, self.snapshot.name);
        self.refresh_after_mutation().await;
        Ok(DeleteOutcome::Deleted)
    }

    /// Add an ingredient link to the dish. Not allowed while cooking.
    pub async fn add_ingredient(
        &mut self,
        ingredient_id: &str,
        quantity: u64,
    ) -> Result<(), DishHubError> {
        self.ensure_open()?;
        if self.is_cooking() {
            return Err(DishHubError::InvalidTransition {
                action: "add an ingredient",
                state: Phase::Cooking.as_str(),
            });
        }
        validation::validate_addition(&self.snapshot, ingredient_id, quantity)?;

        let request = ConsumptionRequest::single(ingredient_id, quantity);
        self.backend.add_ingredient(&self.dish_id, &request).await?;
        self.ensure_open()?;

        tracing::info!("Added ingredient '{}' to '{}'", ingredient_id, self.snapshot.name);
        self.refresh_after_mutation().await;
        Ok(())
    }

    /// Re-fetch the dish snapshot.
    pub async fn refresh(&mut self) -> Result<(), DishHubError> {
        self.ensure_open()?;
        let dish = self.backend.dish(&self.dish_id).await?;
        self.ensure_open()?;
        self.snapshot = dish;
        self.stale = false;
        Ok(())
    }

    /// Tear the session down: stops the timer and ignores late responses.
    pub fn close(self) {
        tracing::debug!("Closing session for '{}'", self.snapshot.name);
        // Drop does the work.
    }

    async fn refresh_after_mutation(&mut self) {
        if let Err(e) = self.refresh().await {
            self.stale = true;
            tracing::warn!("Could not refresh '{}' after update: {}", self.snapshot.name, e);
        }
    }

    fn ensure_open(&self) -> Result<(), DishHubError> {
        if self.cancel.is_cancelled() {
            Err(DishHubError::SessionClosed)
        } else {
            Ok(())
        }
    }
}

impl Drop for CookingSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DishIngredientLink, Ingredient, MockDishBackend};

    fn pasta() -> Dish {
        Dish {
            id: "d1".into(),
            name: "Pasta".into(),
            ingredients: vec![DishIngredientLink {
                id: "l1".into(),
                ingredient: Some(Ingredient {
                    id: "tomato".into(),
                    name: "Tomato".into(),
                    stock_quantity: Some(100),
                }),
                quantity: Some(40),
            }],
        }
    }

    async fn open_with(mock: MockDishBackend) -> CookingSession {
        CookingSession::open(Arc::new(mock), "d1").await.unwrap()
    }

    #[tokio::test]
    async fn test_validation_failure_sends_nothing() {
        let mut mock = MockDishBackend::new();
        mock.expect_dish().times(1).returning(|_| Ok(pasta()));
        mock.expect_start_cooking().never();

        let mut session = open_with(mock).await;
        session.set_quantity("tomato", 0).unwrap();
        let err = session.start_cooking().await.unwrap_err();
        assert!(matches!(
            err,
            DishHubError::Validation(ValidationError::QuantityRequired { .. })
        ));
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_start_sends_requested_quantities() {
        let mut mock = MockDishBackend::new();
        mock.expect_dish().returning(|_| Ok(pasta()));
        mock.expect_start_cooking()
            .withf(|dish_id, req| dish_id == "d1" && req.quantity_for("tomato") == Some(40))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut session = open_with(mock).await;
        session.set_quantity("tomato", 40).unwrap();
        tokio_test::assert_ok!(session.start_cooking().await);
        assert_eq!(session.phase(), Phase::Cooking);
        assert_eq!(session.elapsed_seconds(), 0);
    }

    #[tokio::test]
    async fn test_backend_rejection_keeps_idle() {
        let mut mock = MockDishBackend::new();
        mock.expect_dish().returning(|_| Ok(pasta()));
        mock.expect_start_cooking()
            .returning(|_, _| Err(DishHubError::rejection(Some("Kitchen closed".into()))));

        let mut session = open_with(mock).await;
        session.set_quantity("tomato", 40).unwrap();
        let err = session.start_cooking().await.unwrap_err();
        assert_eq!(err.to_string(), "Kitchen closed");
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.elapsed_seconds(), 0);
    }

    #[tokio::test]
    async fn test_stop_falls_back_to_starting_stock() {
        let mut mock = MockDishBackend::new();
        mock.expect_dish().returning(|_| Ok(pasta()));
        mock.expect_start_cooking().returning(|_, _| Ok(()));
        mock.expect_stop_cooking()
            .withf(|_, req| req.quantity_for("tomato") == Some(100))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut session = open_with(mock).await;
        session.set_quantity("tomato", 40).unwrap();
        session.start_cooking().await.unwrap();
        session.clear_quantity("tomato");
        session.stop_cooking().await.unwrap();
        assert_eq!(session.phase(), Phase::Stopped);
    }

    #[tokio::test]
    async fn test_stop_when_idle_is_invalid() {
        let mut mock = MockDishBackend::new();
        mock.expect_dish().returning(|_| Ok(pasta()));
        mock.expect_stop_cooking().never();

        let mut session = open_with(mock).await;
        let err = tokio_test::assert_err!(session.stop_cooking().await);
        assert!(matches!(
            err,
            DishHubError::InvalidTransition { state: "idle", .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_while_cooking_never_prompts() {
        let mut mock = MockDishBackend::new();
        mock.expect_dish().returning(|_| Ok(pasta()));
        mock.expect_start_cooking().returning(|_, _| Ok(()));
        mock.expect_delete_ingredient().never();

        let mut confirm = MockConfirm::new();
        confirm.expect_confirm().never();

        let mut session = open_with(mock).await;
        session.set_quantity("tomato", 40).unwrap();
        session.start_cooking().await.unwrap();

        let outcome = session.delete_ingredient("tomato", &confirm).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Blocked);
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let mut mock = MockDishBackend::new();
        mock.expect_dish().times(1).returning(|_| Ok(pasta()));
        mock.expect_delete_ingredient().never();

        let mut confirm = MockConfirm::new();
        confirm
            .expect_confirm()
            .withf(|prompt| prompt == DELETE_PROMPT)
            .times(1)
            .return_const(false);

        let mut session = open_with(mock).await;
        let outcome = session.delete_ingredient("tomato", &confirm).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Declined);
    }

    #[tokio::test]
    async fn test_confirmed_delete_refetches() {
        let mut mock = MockDishBackend::new();
        let mut fetches = 0;
        mock.expect_dish().times(2).returning(move |_| {
            fetches += 1;
            let mut dish = pasta();
            if fetches > 1 {
                dish.ingredients.clear();
            }
            Ok(dish)
        });
        mock.expect_delete_ingredient()
            .withf(|dish_id, ing| dish_id == "d1" && ing == "tomato")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut session = open_with(mock).await;
        let outcome = session.delete_ingredient("tomato", &AssumeYes).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(session.dish().ingredients.is_empty());
        assert!(!session.is_stale());
    }

    #[tokio::test]
    async fn test_failed_refresh_marks_stale() {
        let mut mock = MockDishBackend::new();
        let mut fetches = 0;
        mock.expect_dish().returning(move |_| {
            fetches += 1;
            if fetches == 1 {
                Ok(pasta())
            } else {
                Err(DishHubError::transport("Network error"))
            }
        });
        mock.expect_add_ingredient().times(1).returning(|_, _| Ok(()));

        let mut session = open_with(mock).await;
        session.add_ingredient("basil", 5).await.unwrap();
        assert!(session.is_stale());
    }

    #[tokio::test]
    async fn test_add_while_cooking_is_invalid() {
        let mut mock = MockDishBackend::new();
        mock.expect_dish().returning(|_| Ok(pasta()));
        mock.expect_start_cooking().returning(|_, _| Ok(()));
        mock.expect_add_ingredient().never();

        let mut session = open_with(mock).await;
        session.set_quantity("tomato", 40).unwrap();
        session.start_cooking().await.unwrap();
        assert!(matches!(
            session.add_ingredient("basil", 5).await,
            Err(DishHubError::InvalidTransition { state: "cooking", .. })
        ));
    }

    #[tokio::test]
    async fn test_set_quantity_rejects_unknown_ingredient() {
        let mut mock = MockDishBackend::new();
        mock.expect_dish().returning(|_| Ok(pasta()));

        let mut session = open_with(mock).await;
        assert!(matches!(
            session.set_quantity("saffron", 1),
            Err(DishHubError::Validation(ValidationError::UnknownIngredient { .. }))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_session_rejects_operations() {
        let mut mock = MockDishBackend::new();
        mock.expect_dish().returning(|_| Ok(pasta()));
        mock.expect_start_cooking().never();

        let mut session = open_with(mock).await;
        session.set_quantity("tomato", 40).unwrap();
        session.cancellation_token().cancel();

        assert!(!session.can_start());
        assert!(matches!(
            session.start_cooking().await,
            Err(DishHubError::SessionClosed)
        ));
    }
}
