//! Production plan calculator logic

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{IngredientRequirement, ProductionPlan, RecipeDatabase};
use crate::selector::select_machine;

/// Calculate the production plan for an item at a given rate (items/s)
///
/// Returns a tree of machines needed to produce the item, including every
/// craftable ingredient. An unknown item yields a plan with `error` set
/// rather than an `Err`.
pub fn calculate(db: &RecipeDatabase, item_name: &str, target_rate: f64) -> Result<ProductionPlan> {
    Calculator::new(db).calculate(item_name, target_rate)
}

/// Same as [`calculate`], with the root node placed at `depth`
pub fn calculate_at_depth(
    db: &RecipeDatabase,
    item_name: &str,
    target_rate: f64,
    depth: usize,
) -> Result<ProductionPlan> {
    Calculator::new(db).calculate_at_depth(item_name, target_rate, depth)
}

/// Recursive rate propagation over a read-only recipe database
#[derive(Debug, Clone, Copy)]
pub struct Calculator<'a> {
    db: &'a RecipeDatabase,
}

impl<'a> Calculator<'a> {
    pub fn new(db: &'a RecipeDatabase) -> Self {
        Self { db }
    }

    pub fn calculate(&self, item_name: &str, target_rate: f64) -> Result<ProductionPlan> {
        self.calculate_at_depth(item_name, target_rate, 0)
    }

    pub fn calculate_at_depth(
        &self,
        item_name: &str,
        target_rate: f64,
        depth: usize,
    ) -> Result<ProductionPlan> {
        let mut path = Vec::new();
        self.expand(item_name, target_rate, depth, &mut path)
    }

    fn expand(
        &self,
        item_name: &str,
        target_rate: f64,
        depth: usize,
        path: &mut Vec<String>,
    ) -> Result<ProductionPlan> {
        debug!(item = item_name, rate = target_rate, depth, "calculating plan");

        let Some(recipe) = self.db.recipe(item_name) else {
            warn!(item = item_name, depth, "recipe not found");
            return Ok(ProductionPlan::not_found(item_name, target_rate, depth));
        };

        if path.iter().any(|seen| seen == item_name) {
            let mut cycle = path.clone();
            cycle.push(item_name.to_string());
            return Err(Error::CyclicRecipe { path: cycle });
        }

        let machine_type = select_machine(&recipe.preferred_machine_category, &self.db.machines)?;
        let machine = &self.db.machines[machine_type];

        // Recipes without products behave like a zero-amount main product
        let product_amount = recipe.main_product().map_or(0.0, |p| p.amount);

        let output_rate_per_machine = product_amount
            * machine.crafting_speed
            * (1.0 + machine.base_productivity)
            / recipe.craft_time;

        let machines_required = if output_rate_per_machine > 0.0 {
            target_rate / output_rate_per_machine
        } else {
            0.0
        };

        path.push(item_name.to_string());
        let mut ingredient_plans = Vec::with_capacity(recipe.ingredients.len());
        for ingredient in &recipe.ingredients {
            let required_rate = if product_amount > 0.0 {
                ingredient.amount * target_rate / product_amount
            } else {
                0.0
            };

            let sub_plan = if self.db.is_craftable(&ingredient.name) {
                let plan = self.expand(&ingredient.name, required_rate, depth + 1, path)?;
                Some(Box::new(plan))
            } else {
                None // Raw resource
            };

            ingredient_plans.push(IngredientRequirement {
                item_name: ingredient.name.clone(),
                required_rate,
                sub_plan,
            });
        }
        path.pop();

        Ok(ProductionPlan {
            item_name: item_name.to_string(),
            target_rate,
            machine_type: machine_type.to_string(),
            machine_speed: machine.crafting_speed,
            base_productivity: machine.base_productivity,
            craft_time: recipe.craft_time,
            product_amount,
            output_rate_per_machine,
            machines_required,
            ingredient_plans,
            depth,
            error: None,
        })
    }
}
