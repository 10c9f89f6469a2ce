//! SQLite catalogue schema and operations
//!
//! Row ids preserve insertion order, so a database read back from the
//! catalogue iterates machines and recipes in the order they were imported.

use std::collections::HashMap;

use indexmap::IndexMap;
use rusqlite::{Connection, params};
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{BeltSpeeds, Ingredient, Machine, Module, Product, Recipe, RecipeDatabase};

/// Initialize the catalogue schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS belt_speeds (
            name TEXT PRIMARY KEY,
            speed REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS modules (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            speed REAL NOT NULL,
            productivity REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS machines (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            crafting_speed REAL NOT NULL,
            module_slots INTEGER NOT NULL,
            base_productivity REAL NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS machine_categories (
            machine_name TEXT NOT NULL,
            category TEXT NOT NULL,
            PRIMARY KEY (machine_name, category)
        );

        CREATE TABLE IF NOT EXISTS recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            preferred_machine_category TEXT NOT NULL,
            craft_time REAL NOT NULL,
            allow_productivity INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS recipe_display_categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_name TEXT NOT NULL,
            category TEXT NOT NULL
        );

        -- What a recipe consumes per craft
        CREATE TABLE IF NOT EXISTS recipe_ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_name TEXT NOT NULL,
            item_name TEXT NOT NULL,
            amount REAL NOT NULL
        );

        -- What a recipe produces per craft; the first row is the main product
        CREATE TABLE IF NOT EXISTS recipe_products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_name TEXT NOT NULL,
            item_name TEXT NOT NULL,
            amount REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_name);
        CREATE INDEX IF NOT EXISTS idx_recipe_products_recipe ON recipe_products(recipe_name);
        "#,
    )?;
    Ok(())
}

/// Clear all catalogue data (for re-import)
pub fn clear_catalog(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM recipe_products;
        DELETE FROM recipe_ingredients;
        DELETE FROM recipe_display_categories;
        DELETE FROM recipes;
        DELETE FROM machine_categories;
        DELETE FROM machines;
        DELETE FROM modules;
        DELETE FROM belt_speeds;
        "#,
    )?;
    Ok(())
}

/// Replace the catalogue contents with `db` in a single transaction
pub fn store_database(conn: &mut Connection, db: &RecipeDatabase) -> Result<()> {
    let tx = conn.transaction()?;
    clear_catalog(&tx)?;

    for (name, speed) in db.belt_speeds.iter() {
        tx.execute(
            "INSERT INTO belt_speeds (name, speed) VALUES (?1, ?2)",
            params![name, speed],
        )?;
    }

    for module in db.modules.values() {
        tx.execute(
            "INSERT INTO modules (name, speed, productivity) VALUES (?1, ?2, ?3)",
            params![module.name, module.speed, module.productivity],
        )?;
    }

    for machine in db.machines.values() {
        upsert_machine(&tx, machine)?;
    }

    for recipe in db.recipes.values() {
        insert_recipe(&tx, recipe)?;
    }

    tx.commit()?;
    info!(
        recipes = db.recipes.len(),
        machines = db.machines.len(),
        "stored catalogue"
    );
    Ok(())
}

/// Insert or replace a machine and its categories
pub fn upsert_machine(conn: &Connection, machine: &Machine) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO machines (name, crafting_speed, module_slots, base_productivity)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            machine.name,
            machine.crafting_speed,
            machine.module_slots,
            machine.base_productivity
        ],
    )?;
    conn.execute(
        "DELETE FROM machine_categories WHERE machine_name = ?1",
        [&machine.name],
    )?;
    for category in &machine.categories {
        conn.execute(
            "INSERT INTO machine_categories (machine_name, category) VALUES (?1, ?2)",
            params![machine.name, category],
        )?;
    }
    Ok(())
}

/// Insert a recipe with its categories, ingredients and products
pub fn insert_recipe(conn: &Connection, recipe: &Recipe) -> Result<()> {
    conn.execute(
        "INSERT INTO recipes (name, preferred_machine_category, craft_time, allow_productivity)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            recipe.name,
            recipe.preferred_machine_category,
            recipe.craft_time,
            recipe.allow_productivity
        ],
    )?;
    for category in &recipe.display_categories {
        conn.execute(
            "INSERT INTO recipe_display_categories (recipe_name, category) VALUES (?1, ?2)",
            params![recipe.name, category],
        )?;
    }
    for ingredient in &recipe.ingredients {
        conn.execute(
            "INSERT INTO recipe_ingredients (recipe_name, item_name, amount) VALUES (?1, ?2, ?3)",
            params![recipe.name, ingredient.name, ingredient.amount],
        )?;
    }
    for product in &recipe.products {
        conn.execute(
            "INSERT INTO recipe_products (recipe_name, item_name, amount) VALUES (?1, ?2, ?3)",
            params![recipe.name, product.name, product.amount],
        )?;
    }
    Ok(())
}

/// Read the whole catalogue back into memory
pub fn load_database(conn: &Connection) -> Result<RecipeDatabase> {
    Ok(RecipeDatabase {
        belt_speeds: load_belt_speeds(conn)?,
        modules: load_modules(conn)?,
        machines: list_machines(conn)?.into_iter().map(|m| (m.name.clone(), m)).collect(),
        recipes: list_recipes(conn)?.into_iter().map(|r| (r.name.clone(), r)).collect(),
    })
}

fn load_belt_speeds(conn: &Connection) -> Result<BeltSpeeds> {
    let mut stmt = conn.prepare("SELECT name, speed FROM belt_speeds")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?;

    let mut speeds = HashMap::new();
    for row in rows {
        let (name, speed) = row?;
        speeds.insert(name, speed);
    }
    if speeds.is_empty() {
        return Err(Error::EmptyCatalog);
    }

    let get = |name: &str| {
        speeds
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownBelt(name.to_string()))
    };
    Ok(BeltSpeeds {
        yellow: get("yellow")?,
        red: get("red")?,
        blue: get("blue")?,
        green: get("green")?,
    })
}

fn load_modules(conn: &Connection) -> Result<IndexMap<String, Module>> {
    let mut stmt = conn.prepare("SELECT name, speed, productivity FROM modules ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(Module {
            name: row.get(0)?,
            speed: row.get(1)?,
            productivity: row.get(2)?,
        })
    })?;

    let mut results = IndexMap::new();
    for row in rows {
        let module = row?;
        results.insert(module.name.clone(), module);
    }
    Ok(results)
}

/// List all machines in import order
pub fn list_machines(conn: &Connection) -> Result<Vec<Machine>> {
    let mut stmt = conn.prepare(
        "SELECT name, crafting_speed, module_slots, base_productivity FROM machines ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Machine {
            name: row.get(0)?,
            crafting_speed: row.get(1)?,
            module_slots: row.get(2)?,
            categories: Default::default(),
            base_productivity: row.get(3)?,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }

    let mut stmt = conn.prepare("SELECT machine_name, category FROM machine_categories")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
    for row in rows {
        let (machine_name, category) = row?;
        if let Some(machine) = results.iter_mut().find(|m| m.name == machine_name) {
            machine.categories.insert(category);
        }
    }
    Ok(results)
}

/// List all recipes in import order
pub fn list_recipes(conn: &Connection) -> Result<Vec<Recipe>> {
    let mut stmt = conn.prepare(
        "SELECT name, preferred_machine_category, craft_time, allow_productivity
         FROM recipes ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Recipe {
            name: row.get(0)?,
            preferred_machine_category: row.get(1)?,
            display_categories: Vec::new(),
            craft_time: row.get(2)?,
            ingredients: Vec::new(),
            products: Vec::new(),
            allow_productivity: row.get(3)?,
        })
    })?;

    let mut results = IndexMap::new();
    for row in rows {
        let recipe = row?;
        results.insert(recipe.name.clone(), recipe);
    }

    let mut stmt = conn.prepare(
        "SELECT recipe_name, category FROM recipe_display_categories ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
    for row in rows {
        let (recipe_name, category) = row?;
        if let Some(recipe) = results.get_mut(&recipe_name) {
            recipe.display_categories.push(category);
        }
    }

    let mut stmt = conn.prepare(
        "SELECT recipe_name, item_name, amount FROM recipe_ingredients ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            Ingredient {
                name: row.get(1)?,
                amount: row.get(2)?,
            },
        ))
    })?;
    for row in rows {
        let (recipe_name, ingredient) = row?;
        if let Some(recipe) = results.get_mut(&recipe_name) {
            recipe.ingredients.push(ingredient);
        }
    }

    let mut stmt = conn.prepare(
        "SELECT recipe_name, item_name, amount FROM recipe_products ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            Product {
                name: row.get(1)?,
                amount: row.get(2)?,
            },
        ))
    })?;
    for row in rows {
        let (recipe_name, product) = row?;
        if let Some(recipe) = results.get_mut(&recipe_name) {
            recipe.products.push(product);
        }
    }

    // Rows may have been edited after import
    for recipe in results.values() {
        recipe.validate()?;
    }

    Ok(results.into_values().collect())
}
