//! Machine selection for a recipe's production category

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::Machine;

/// Pick the machine that crafts recipes of `category`.
///
/// Among machines supporting the category, the one with the strictly highest
/// base productivity wins; ties go to the first in iteration order. When no
/// machine supports the category, the first machine is used regardless.
pub fn select_machine<'a>(category: &str, machines: &'a IndexMap<String, Machine>) -> Result<&'a str> {
    let mut best: Option<(&str, f64)> = None;

    for (name, machine) in machines {
        if !machine.supports(category) {
            continue;
        }
        match best {
            Some((_, productivity)) if machine.base_productivity <= productivity => {}
            _ => best = Some((name.as_str(), machine.base_productivity)),
        }
    }

    if let Some((name, productivity)) = best {
        debug!(category, machine = name, productivity, "selected machine");
        return Ok(name);
    }

    let (fallback, _) = machines.first().ok_or(Error::EmptyMachineDatabase)?;
    warn!(category, machine = %fallback, "no machine supports category, using fallback");
    Ok(fallback.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(name: &str, productivity: f64, categories: &[&str]) -> (String, Machine) {
        (
            name.to_string(),
            Machine {
                name: name.to_string(),
                crafting_speed: 1.0,
                module_slots: 0,
                categories: categories.iter().map(|c| c.to_string()).collect(),
                base_productivity: productivity,
            },
        )
    }

    #[test]
    fn highest_productivity_wins() {
        let machines: IndexMap<_, _> = [
            machine("assembler", 0.0, &["crafting"]),
            machine("foundry", 0.5, &["crafting", "metallurgy"]),
            machine("furnace", 0.9, &["smelting"]),
        ]
        .into_iter()
        .collect();

        assert_eq!(select_machine("crafting", &machines).unwrap(), "foundry");
        assert_eq!(select_machine("smelting", &machines).unwrap(), "furnace");
    }

    #[test]
    fn ties_go_to_first_in_order() {
        let machines: IndexMap<_, _> = [
            machine("assembler_2", 0.0, &["crafting"]),
            machine("assembler_1", 0.0, &["crafting"]),
        ]
        .into_iter()
        .collect();

        for _ in 0..10 {
            assert_eq!(select_machine("crafting", &machines).unwrap(), "assembler_2");
        }
    }

    #[test]
    fn unsupported_category_falls_back_to_first_machine() {
        let machines: IndexMap<_, _> = [
            machine("furnace", 0.0, &["smelting"]),
            machine("assembler", 0.0, &["crafting"]),
        ]
        .into_iter()
        .collect();

        assert_eq!(select_machine("chemistry", &machines).unwrap(), "furnace");
    }

    #[test]
    fn empty_machine_database_is_an_error() {
        let machines = IndexMap::new();
        assert!(matches!(
            select_machine("crafting", &machines),
            Err(Error::EmptyMachineDatabase)
        ));
    }
}
