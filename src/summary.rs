//! Whole-tree totals for a production plan

use std::collections::BTreeMap;
use std::fmt;

use crate::models::ProductionPlan;
use crate::util::format_name;

/// Summary of a production plan calculation
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSummary {
    pub target_item: String,
    pub target_rate: f64,
    pub machine_counts: Vec<(String, f64)>,
    pub raw_inputs: Vec<(String, f64)>,
}

/// Aggregate machine counts per machine type and raw input rates per item
pub fn summarize(plan: &ProductionPlan) -> PlanSummary {
    let mut machines = BTreeMap::new();
    let mut raw_inputs = BTreeMap::new();

    collect(plan, &mut machines, &mut raw_inputs);

    PlanSummary {
        target_item: plan.item_name.clone(),
        target_rate: plan.target_rate,
        machine_counts: machines.into_iter().collect(),
        raw_inputs: raw_inputs.into_iter().collect(),
    }
}

fn collect(
    plan: &ProductionPlan,
    machines: &mut BTreeMap<String, f64>,
    raw_inputs: &mut BTreeMap<String, f64>,
) {
    if plan.has_error() {
        return;
    }

    *machines.entry(plan.machine_type.clone()).or_default() += plan.machines_required;

    for ingredient in &plan.ingredient_plans {
        match &ingredient.sub_plan {
            Some(sub_plan) => collect(sub_plan, machines, raw_inputs),
            None => *raw_inputs.entry(ingredient.item_name.clone()).or_default() += ingredient.required_rate,
        }
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Production Summary ===")?;
        writeln!(
            f,
            "Target: {} @ {:.2} items/s",
            format_name(&self.target_item),
            self.target_rate
        )?;
        writeln!(f)?;

        writeln!(f, "Machines required:")?;
        for (name, count) in &self.machine_counts {
            writeln!(f, "  {:.2}x {}", count, format_name(name))?;
        }
        writeln!(f)?;

        writeln!(f, "Raw inputs required:")?;
        for (name, rate) in &self.raw_inputs {
            writeln!(f, "  {} @ {:.2}/s", format_name(name), rate)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientRequirement;

    fn plan(item: &str, machine: &str, count: f64, ingredients: Vec<IngredientRequirement>) -> ProductionPlan {
        let mut plan = ProductionPlan::not_found(item, count, 0);
        plan.error = None;
        plan.machine_type = machine.to_string();
        plan.machines_required = count;
        plan.ingredient_plans = ingredients;
        plan
    }

    fn raw(item: &str, rate: f64) -> IngredientRequirement {
        IngredientRequirement {
            item_name: item.to_string(),
            required_rate: rate,
            sub_plan: None,
        }
    }

    #[test]
    fn totals_accumulate_across_tree() {
        let gear = plan("gear", "assembler", 1.5, vec![raw("iron_plate", 6.0)]);
        let belt = plan(
            "transport_belt",
            "assembler",
            0.5,
            vec![
                IngredientRequirement {
                    item_name: "gear".to_string(),
                    required_rate: 3.0,
                    sub_plan: Some(Box::new(gear)),
                },
                raw("iron_plate", 3.0),
            ],
        );

        let summary = summarize(&belt);
        assert_eq!(summary.machine_counts, vec![("assembler".to_string(), 2.0)]);
        assert_eq!(summary.raw_inputs, vec![("iron_plate".to_string(), 9.0)]);
    }

    #[test]
    fn error_plan_has_empty_summary() {
        let summary = summarize(&ProductionPlan::not_found("ghost", 1.0, 0));
        assert!(summary.machine_counts.is_empty());
        assert!(summary.raw_inputs.is_empty());
        assert!(summary.to_string().contains("Target: Ghost @ 1.00 items/s"));
    }
}
