// src/lib.rs - Library root for DishHub

pub mod backend;
pub mod catalog;
pub mod cli;
pub mod cooking;
pub mod infra;
pub mod util;
