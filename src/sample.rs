//! Built-in sample catalogue for trying the calculator without game data

use crate::error::Result;
use crate::loader::parse_base_data;
use crate::models::RecipeDatabase;

/// Early-game logistics chain: belts, inserters, circuits and plates
pub const SAMPLE_BASE_JSON: &str = include_str!("../data/base.json");

pub fn sample_database() -> Result<RecipeDatabase> {
    parse_base_data(SAMPLE_BASE_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_parses() {
        let db = sample_database().unwrap();
        assert_eq!(db.recipes.len(), 7);
        assert_eq!(db.machines.len(), 4);
        assert!(db.is_craftable("iron_plate"));
        assert!(!db.is_craftable("iron_ore"));
    }
}
