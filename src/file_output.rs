//! Saving calculation trees to text files

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use regex::Regex;
use tracing::info;

use crate::error::Result;
use crate::models::ProductionPlan;
use crate::util::format_name;

const RULE_WIDTH: usize = 80;

/// `{recipe}_{belt}_belt_{mode}_{timestamp}.txt`, with spaces and slashes in
/// the recipe name replaced by underscores
pub fn generate_filename(
    recipe_name: &str,
    belt_color: &str,
    verbose: bool,
    timestamp: &DateTime<Local>,
) -> Result<String> {
    let unsafe_chars = Regex::new(r"[ /]")?;
    let safe_name = unsafe_chars.replace_all(recipe_name, "_");
    let mode = if verbose { "verbose" } else { "compact" };
    Ok(format!(
        "{}_{}_belt_{}_{}.txt",
        safe_name,
        belt_color,
        mode,
        timestamp.format("%Y%m%d_%H%M%S")
    ))
}

/// Write the plan tree into `output_dir`, creating it if needed.
///
/// Returns the path of the written file.
pub fn save_calculation(
    plan: &ProductionPlan,
    belt_color: &str,
    belt_speed: f64,
    verbose: bool,
    output_dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let now = Local::now();
    let filename = generate_filename(&plan.item_name, belt_color, verbose, &now)?;
    let filepath = output_dir.join(&filename);
    info!(path = %filepath.display(), "saving calculation");

    let rule = "═".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "  FACTORIO PRODUCTION CALCULATOR");
    let _ = writeln!(out, "{}\n", rule);
    let _ = writeln!(out, "Recipe:      {}", format_name(&plan.item_name));
    let _ = writeln!(
        out,
        "Belt:        {} Belt ({} items/s)",
        format_name(belt_color),
        belt_speed
    );
    let _ = writeln!(out, "Generated:   {}", now.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "Mode:        {}", if verbose { "Verbose" } else { "Compact" });
    let _ = writeln!(out, "\n{}\n", rule);

    out.push_str(&format_plan_tree(plan, verbose));

    let _ = writeln!(out, "\n{}", rule);
    let _ = writeln!(out, "  End of calculation");
    let _ = writeln!(out, "{}", rule);

    fs::write(&filepath, out)?;
    info!(file = %filename, "calculation saved");
    Ok(filepath)
}

/// Tree body of a saved calculation, with `[Crafted]`/`[Raw]` markers
pub fn format_plan_tree(plan: &ProductionPlan, verbose: bool) -> String {
    let mut out = String::new();
    write_plan_tree(&mut out, plan, verbose, "", true);
    out
}

fn write_plan_tree(out: &mut String, plan: &ProductionPlan, verbose: bool, prefix: &str, is_last: bool) {
    let branch = if is_last { "└── " } else { "├── " };
    let pipe = if is_last { "    " } else { "│   " };

    if let Some(error) = &plan.error {
        let _ = writeln!(out, "{}{}[ERROR] {}", prefix, branch, error);
        return;
    }

    let _ = writeln!(out, "{}{}[Product] {}", prefix, branch, format_name(&plan.item_name));
    let indent = format!("{}{}", prefix, pipe);
    let machine_name = format_name(&plan.machine_type);

    if verbose {
        let _ = writeln!(out, "{}┌─ Machine Configuration", indent);
        let _ = writeln!(out, "{}│  Type:         {}", indent, machine_name);
        let _ = writeln!(out, "{}│  Speed:        {}x", indent, plan.machine_speed);
        let _ = writeln!(
            out,
            "{}│  Productivity: {:.0}%",
            indent,
            plan.base_productivity * 100.0
        );
        let _ = writeln!(out, "{}│", indent);
        let _ = writeln!(out, "{}├─ Production Details", indent);
        let _ = writeln!(out, "{}│  Target Rate:  {:.2} items/s", indent, plan.target_rate);
        let _ = writeln!(
            out,
            "{}│  Per Machine:  {:.2} items/s",
            indent, plan.output_rate_per_machine
        );
        let _ = writeln!(out, "{}│  Machines:     {:.2}", indent, plan.machines_required);
    } else {
        let _ = writeln!(out, "{}Machine: {} x{:.2}", indent, machine_name, plan.machines_required);
        let _ = writeln!(out, "{}Target:  {:.2} items/s", indent, plan.target_rate);
    }

    if plan.ingredient_plans.is_empty() {
        return;
    }

    if verbose {
        let _ = writeln!(out, "{}│", indent);
        let _ = writeln!(
            out,
            "{}└─ Required Ingredients ({})",
            indent,
            plan.ingredient_plans.len()
        );
    } else {
        let _ = writeln!(out, "{}", indent);
        let _ = writeln!(out, "{}Ingredients:", indent);
    }

    let count = plan.ingredient_plans.len();
    for (idx, ingredient) in plan.ingredient_plans.iter().enumerate() {
        let is_last_ing = idx == count - 1;
        let ing_branch = if is_last_ing { "   └── " } else { "   ├── " };
        let name = format_name(&ingredient.item_name);

        match &ingredient.sub_plan {
            Some(sub_plan) => {
                let _ = writeln!(
                    out,
                    "{}{}[Crafted] {} ({:.2}/s)",
                    indent, ing_branch, name, ingredient.required_rate
                );
                let child = format!("{}{}", indent, if is_last_ing { "       " } else { "   │   " });
                write_plan_tree(out, sub_plan, verbose, &child, is_last_ing);
            }
            None => {
                let _ = writeln!(
                    out,
                    "{}{}[Raw] {} ({:.2}/s)",
                    indent, ing_branch, name, ingredient.required_rate
                );
            }
        }
    }
}
