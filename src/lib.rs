//! Factorio Production Calculator
//!
//! Turns a recipe catalogue and a target output rate into a tree of machines
//! and raw inputs.

pub mod calculator;
pub mod config;
pub mod db;
pub mod error;
pub mod file_output;
pub mod loader;
pub mod logging;
pub mod models;
pub mod printer;
pub mod sample;
pub mod selector;
pub mod summary;
pub mod util;

pub use calculator::{Calculator, calculate, calculate_at_depth};
pub use error::{Error, Result};
pub use models::{IngredientRequirement, ProductionPlan, RecipeDatabase};
pub use selector::select_machine;
