//! JSON game data and user configuration loading
//!
//! Parses `base.json` into a validated [`RecipeDatabase`]. Object key order
//! from the file is kept so machine selection stays deterministic.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::UserConfig;
use crate::error::{Error, Result};
use crate::models::{BeltSpeeds, Ingredient, Machine, Module, Product, Recipe, RecipeDatabase};

const DEFAULT_MACHINE_CATEGORY: &str = "crafting";
const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Deserialize)]
struct RawGameData {
    belt_speeds: BeltSpeeds,
    #[serde(default)]
    modules: IndexMap<String, RawModule>,
    #[serde(default)]
    machines: IndexMap<String, RawMachine>,
    #[serde(default)]
    recipes: IndexMap<String, RawRecipe>,
}

#[derive(Debug, Deserialize)]
struct RawModule {
    speed: f64,
    productivity: f64,
}

#[derive(Debug, Deserialize)]
struct RawMachine {
    crafting_speed: f64,
    module_slots: u32,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    base_productivity: f64,
}

/// The recipe `category` field is either a machine category or a list of
/// display categories
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CategoryField {
    Single(String),
    List(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct RawRecipe {
    #[serde(default)]
    category: Option<CategoryField>,
    #[serde(default)]
    preferred_machine: Option<String>,
    #[serde(default)]
    display_category: Option<Vec<String>>,
    time: f64,
    #[serde(default)]
    ingredients: Vec<Ingredient>,
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default = "default_allow_productivity")]
    allow_productivity: bool,
}

fn default_allow_productivity() -> bool {
    true
}

/// Resolve the raw category shapes into (machine category, display categories)
fn resolve_categories(
    category: Option<CategoryField>,
    preferred_machine: Option<String>,
    display_category: Option<Vec<String>>,
) -> (String, Vec<String>) {
    match category {
        Some(CategoryField::Single(machine_category)) => (
            preferred_machine.unwrap_or(machine_category),
            vec![UNCATEGORIZED.to_string()],
        ),
        Some(CategoryField::List(display)) => (
            preferred_machine.unwrap_or_else(|| DEFAULT_MACHINE_CATEGORY.to_string()),
            display,
        ),
        None => (
            preferred_machine.unwrap_or_else(|| DEFAULT_MACHINE_CATEGORY.to_string()),
            display_category.unwrap_or_else(|| vec![UNCATEGORIZED.to_string()]),
        ),
    }
}

impl RawRecipe {
    fn into_recipe(self, name: String) -> Result<Recipe> {
        let (preferred_machine_category, display_categories) =
            resolve_categories(self.category, self.preferred_machine, self.display_category);

        let recipe = Recipe {
            name,
            preferred_machine_category,
            display_categories,
            craft_time: self.time,
            ingredients: self.ingredients,
            products: self.products,
            allow_productivity: self.allow_productivity,
        };
        recipe.validate()?;
        Ok(recipe)
    }
}

impl RawGameData {
    fn into_database(self) -> Result<RecipeDatabase> {
        let modules = self
            .modules
            .into_iter()
            .map(|(name, m)| {
                let module = Module {
                    name: name.clone(),
                    speed: m.speed,
                    productivity: m.productivity,
                };
                (name, module)
            })
            .collect();

        let machines = self
            .machines
            .into_iter()
            .map(|(name, m)| {
                let machine = Machine {
                    name: name.clone(),
                    crafting_speed: m.crafting_speed,
                    module_slots: m.module_slots,
                    categories: m.categories.into_iter().collect(),
                    base_productivity: m.base_productivity,
                };
                (name, machine)
            })
            .collect();

        let mut recipes = IndexMap::with_capacity(self.recipes.len());
        for (name, raw) in self.recipes {
            let recipe = raw.into_recipe(name.clone())?;
            recipes.insert(name, recipe);
        }

        Ok(RecipeDatabase {
            belt_speeds: self.belt_speeds,
            modules,
            machines,
            recipes,
        })
    }
}

/// Parse game data from a JSON string
pub fn parse_base_data(json: &str) -> Result<RecipeDatabase> {
    let raw: RawGameData = serde_json::from_str(json)?;
    raw.into_database()
}

/// Load the base game data (recipes, machines, modules, belt speeds)
pub fn load_base_data(path: &Path) -> Result<RecipeDatabase> {
    debug!(path = %path.display(), "loading game data");
    let content = read_file(path)?;
    let db = parse_base_data(&content)?;
    info!(
        recipes = db.recipes.len(),
        machines = db.machines.len(),
        modules = db.modules.len(),
        "loaded game data"
    );
    Ok(db)
}

/// Load the user configuration (product, belt color, verbosity)
pub fn load_user_config(path: &Path) -> Result<UserConfig> {
    let content = read_file(path)?;
    let config: UserConfig = serde_json::from_str(&content)?;
    debug!(?config, "configuration loaded");
    Ok(config)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read {}: {}", path.display(), e),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_JSON: &str = r#"{
        "belt_speeds": {"yellow": 15, "red": 30, "blue": 45, "green": 60},
        "modules": {"productivity_module": {"speed": -0.05, "productivity": 0.04}},
        "machines": {
            "stone_furnace": {"crafting_speed": 1, "module_slots": 0, "categories": ["smelting"]},
            "assembling_machine_2": {"crafting_speed": 0.75, "module_slots": 2, "categories": ["crafting"]},
            "assembling_machine_1": {"crafting_speed": 0.5, "module_slots": 0, "categories": ["crafting"]}
        },
        "recipes": {
            "iron_gear_wheel": {
                "category": ["Intermediate products"],
                "time": 0.5,
                "ingredients": [{"name": "iron_plate", "amount": 2}],
                "products": [{"name": "iron_gear_wheel", "amount": 1}]
            },
            "iron_plate": {
                "category": "smelting",
                "time": 3.2,
                "ingredients": [{"name": "iron_ore", "amount": 1}],
                "products": [{"name": "iron_plate", "amount": 1}],
                "allow_productivity": false
            },
            "pipe": {
                "time": 0.5,
                "ingredients": [{"name": "iron_plate", "amount": 1}],
                "products": [{"name": "pipe", "amount": 1}]
            }
        }
    }"#;

    #[test]
    fn parses_game_data_in_file_order() {
        let db = parse_base_data(BASE_JSON).unwrap();

        let machines: Vec<_> = db.machines.keys().map(String::as_str).collect();
        assert_eq!(
            machines,
            vec!["stone_furnace", "assembling_machine_2", "assembling_machine_1"]
        );
        assert_eq!(db.modules["productivity_module"].productivity, 0.04);
        assert_eq!(db.belt_speeds.speed("green"), Some(60.0));
        assert_eq!(db.machines["stone_furnace"].base_productivity, 0.0);
    }

    #[test]
    fn category_list_is_display_only() {
        let db = parse_base_data(BASE_JSON).unwrap();
        let gear = &db.recipes["iron_gear_wheel"];
        assert_eq!(gear.preferred_machine_category, "crafting");
        assert_eq!(gear.display_categories, vec!["Intermediate products"]);
        assert!(gear.allow_productivity);
    }

    #[test]
    fn category_string_becomes_machine_category() {
        let db = parse_base_data(BASE_JSON).unwrap();
        let plate = &db.recipes["iron_plate"];
        assert_eq!(plate.preferred_machine_category, "smelting");
        assert_eq!(plate.display_categories, vec!["Uncategorized"]);
        assert!(!plate.allow_productivity);
    }

    #[test]
    fn missing_category_defaults() {
        let db = parse_base_data(BASE_JSON).unwrap();
        let pipe = &db.recipes["pipe"];
        assert_eq!(pipe.preferred_machine_category, "crafting");
        assert_eq!(pipe.display_categories, vec!["Uncategorized"]);
    }

    #[test]
    fn explicit_preferred_machine_wins_over_category_string() {
        let (machine, display) = resolve_categories(
            Some(CategoryField::Single("smelting".to_string())),
            Some("advanced_smelting".to_string()),
            None,
        );
        assert_eq!(machine, "advanced_smelting");
        assert_eq!(display, vec!["Uncategorized"]);
    }

    #[test]
    fn zero_craft_time_is_rejected() {
        let json = r#"{
            "belt_speeds": {"yellow": 15, "red": 30, "blue": 45, "green": 60},
            "recipes": {"broken": {"time": 0, "products": [{"name": "broken", "amount": 1}]}}
        }"#;
        assert!(matches!(
            parse_base_data(json),
            Err(Error::InvalidRecipe { name, .. }) if name == "broken"
        ));
    }

    #[test]
    fn recipe_without_products_is_rejected() {
        let json = r#"{
            "belt_speeds": {"yellow": 15, "red": 30, "blue": 45, "green": 60},
            "recipes": {"nothing": {"time": 1}}
        }"#;
        assert!(matches!(parse_base_data(json), Err(Error::InvalidRecipe { .. })));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_base_data(Path::new("/nonexistent/base.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/base.json"));
    }
}
