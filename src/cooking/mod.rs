// src/cooking/mod.rs - Dish cooking workflow

pub mod session;
pub mod timer;
pub mod validation;

pub use session::{AssumeYes, Confirm, CookingSession, DeleteOutcome, Phase};
pub use timer::{CancellationToken, CookingTimer};
