//! Console rendering of production plans as ASCII trees

use std::fmt::Write;

use crate::models::{IngredientRequirement, ProductionPlan};
use crate::util::format_name;

pub fn format_header(belt_color: &str, belt_speed: f64) -> String {
    format!(
        "=== Machine Calculation with {} Belt ({} items/s) ===",
        format_name(belt_color),
        belt_speed
    )
}

/// Format a production plan as a readable tree
pub fn format_plan(plan: &ProductionPlan, verbose: bool) -> String {
    let mut output = String::new();
    write_plan(&mut output, plan, verbose, "", true);
    output
}

fn write_plan(out: &mut String, plan: &ProductionPlan, verbose: bool, prefix: &str, is_last: bool) {
    if let Some(error) = &plan.error {
        let _ = writeln!(out, "{}{}", prefix, error);
        return;
    }

    let branch = if is_last { "└─" } else { "├─" };
    let pipe = if is_last { "   " } else { "│  " };
    let _ = writeln!(out, "{}{} Product: {}", prefix, branch, format_name(&plan.item_name));

    let indent = format!("{}{}", prefix, pipe);
    if verbose {
        let _ = writeln!(
            out,
            "{}Machine: {} (Speed: {}, Productivity: {:.0}%)",
            indent,
            format_name(&plan.machine_type),
            plan.machine_speed,
            plan.base_productivity * 100.0
        );
        let _ = writeln!(out, "{}Target rate: {:.2} items/s", indent, plan.target_rate);
        let _ = writeln!(
            out,
            "{}Each machine produces {:.2} items/s",
            indent, plan.output_rate_per_machine
        );
    } else {
        let _ = writeln!(out, "{}Machine: {}", indent, format_name(&plan.machine_type));
        let _ = writeln!(out, "{}Target rate: {:.2} items/s", indent, plan.target_rate);
    }
    let _ = writeln!(out, "{}Machines needed: {:.2}", indent, plan.machines_required);

    if !plan.ingredient_plans.is_empty() {
        let _ = writeln!(out, "{}Ingredients:", indent);
        write_ingredients(out, &plan.ingredient_plans, verbose, &indent);
    }
}

fn write_ingredients(out: &mut String, ingredients: &[IngredientRequirement], verbose: bool, indent: &str) {
    for (idx, ingredient) in ingredients.iter().enumerate() {
        let is_last = idx == ingredients.len() - 1;
        let branch = if is_last { "└─" } else { "├─" };
        let _ = writeln!(
            out,
            "{}{} {} ({:.2}/s)",
            indent,
            branch,
            format_name(&ingredient.item_name),
            ingredient.required_rate
        );

        if let Some(sub_plan) = &ingredient.sub_plan {
            let child_prefix = format!("{}{}", indent, if is_last { "   " } else { "│  " });
            write_plan(out, sub_plan, verbose, &child_prefix, is_last);
        }
    }
}
