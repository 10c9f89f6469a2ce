//! Data models for Factorio recipes, machines and production plans

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: f64, // per craft cycle
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub amount: f64, // per craft cycle
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub name: String,
    pub preferred_machine_category: String,
    pub display_categories: Vec<String>,
    pub craft_time: f64,
    pub ingredients: Vec<Ingredient>,
    pub products: Vec<Product>,
    pub allow_productivity: bool,
}

impl Recipe {
    /// The first listed product; the only one used for rate math
    pub fn main_product(&self) -> Option<&Product> {
        self.products.first()
    }

    /// Positive craft time and at least one product
    pub fn validate(&self) -> Result<()> {
        if !(self.craft_time > 0.0) {
            return Err(Error::InvalidRecipe {
                name: self.name.clone(),
                reason: format!("craft time must be positive, got {}", self.craft_time),
            });
        }
        if self.products.is_empty() {
            return Err(Error::InvalidRecipe {
                name: self.name.clone(),
                reason: "recipe has no products".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub speed: f64,
    pub productivity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Machine {
    pub name: String,
    pub crafting_speed: f64,
    pub module_slots: u32,
    pub categories: BTreeSet<String>,
    pub base_productivity: f64,
}

impl Machine {
    pub fn supports(&self, category: &str) -> bool {
        self.categories.contains(category)
    }
}

/// Throughput presets in items/s, one per belt tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeltSpeeds {
    pub yellow: f64,
    pub red: f64,
    pub blue: f64,
    pub green: f64,
}

impl BeltSpeeds {
    pub const NAMES: [&'static str; 4] = ["yellow", "red", "blue", "green"];

    pub fn speed(&self, color: &str) -> Option<f64> {
        match color {
            "yellow" => Some(self.yellow),
            "red" => Some(self.red),
            "blue" => Some(self.blue),
            "green" => Some(self.green),
            _ => None,
        }
    }

    pub fn resolve(&self, color: &str) -> Result<f64> {
        self.speed(color)
            .ok_or_else(|| Error::UnknownBelt(color.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Self::NAMES
            .into_iter()
            .filter_map(|name| self.speed(name).map(|speed| (name, speed)))
    }
}

/// Read-only catalogue the calculator works against.
///
/// Machines and recipes keep insertion order, which makes machine selection
/// deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDatabase {
    pub belt_speeds: BeltSpeeds,
    pub modules: IndexMap<String, Module>,
    pub machines: IndexMap<String, Machine>,
    pub recipes: IndexMap<String, Recipe>,
}

impl RecipeDatabase {
    pub fn recipe(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(name)
    }

    pub fn is_craftable(&self, item: &str) -> bool {
        self.recipes.contains_key(item)
    }
}

/// Result of a production chain calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionPlan {
    pub item_name: String,
    pub target_rate: f64,
    pub machine_type: String,
    pub machine_speed: f64,
    pub base_productivity: f64,
    pub craft_time: f64,
    pub product_amount: f64,
    pub output_rate_per_machine: f64,
    pub machines_required: f64,
    pub ingredient_plans: Vec<IngredientRequirement>,
    pub depth: usize,
    pub error: Option<String>,
}

impl ProductionPlan {
    /// Terminal plan for an item with no recipe
    pub fn not_found(item_name: &str, target_rate: f64, depth: usize) -> Self {
        Self::failed(item_name, target_rate, depth, format!("recipe '{}' not found", item_name))
    }

    /// Terminal plan carrying `error`; every other numeric field is zero
    pub fn failed(item_name: &str, target_rate: f64, depth: usize, error: String) -> Self {
        Self {
            item_name: item_name.to_string(),
            target_rate,
            machine_type: String::new(),
            machine_speed: 0.0,
            base_productivity: 0.0,
            craft_time: 0.0,
            product_amount: 0.0,
            output_rate_per_machine: 0.0,
            machines_required: 0.0,
            ingredient_plans: Vec::new(),
            depth,
            error: Some(error),
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whole machines needed to meet the target rate
    pub fn machines_rounded_up(&self) -> f64 {
        self.machines_required.ceil()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientRequirement {
    pub item_name: String,
    pub required_rate: f64,
    /// Present iff the ingredient has its own recipe
    pub sub_plan: Option<Box<ProductionPlan>>,
}

impl IngredientRequirement {
    pub fn is_raw(&self) -> bool {
        self.sub_plan.is_none()
    }
}
