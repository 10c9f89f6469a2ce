//! Factorio Production Calculator
//!
//! A production chain calculator for Factorio recipe graphs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing::{info, warn};

use factorio_calculator::config::{RunContext, RunOptions, Settings, UserConfig, parse_target_rate};
use factorio_calculator::models::ProductionPlan;
use factorio_calculator::util::format_name;
use factorio_calculator::{
    Calculator, Error, db, file_output, loader, logging, printer, sample, summary,
};

#[derive(Parser)]
#[command(name = "factorio-calculator")]
#[command(about = "Production chain calculator for Factorio recipe graphs")]
struct Cli {
    /// Path to the SQLite catalogue
    #[arg(short, long, default_value = "factorio_data.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import game data (recipes, machines, modules, belts) from JSON
    Import {
        /// Path to base.json (defaults to $BASE_JSON or data/base.json)
        source: Option<PathBuf>,
    },

    /// Load the built-in sample catalogue
    LoadSample,

    /// Calculate the production plan for an item
    Calc {
        /// Item to produce (e.g., "transport_belt", "electronic_circuit")
        item: String,

        /// Belt preset giving the target rate (yellow, red, blue, green)
        #[arg(short, long, conflicts_with = "rate")]
        belt: Option<String>,

        /// Explicit target rate in items/s
        #[arg(short, long, value_parser = parse_target_rate)]
        rate: Option<f64>,

        /// Show machine details for every node
        #[arg(short, long)]
        verbose: bool,

        /// Save the tree to the output folder
        #[arg(short, long)]
        save: bool,

        /// Print machine and raw input totals
        #[arg(long = "summary")]
        show_summary: bool,
    },

    /// Calculate using the product and belt from Config.json
    Run,

    /// List all recipes in the catalogue
    ListRecipes,

    /// List all machines in the catalogue
    ListMachines,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env();

    // Config.json decides console logging, so it is read before the logger exists
    let (user_config, config_error) = match cli.command {
        Commands::Run => match loader::load_user_config(&settings.config_json) {
            Ok(config) => (config, None),
            Err(e) => (UserConfig::default(), Some(e)),
        },
        _ => (UserConfig::default(), None),
    };
    let options = RunOptions::resolve(&user_config, &settings);

    let log_file = logging::init(&settings.log_dir, options.console_logging)?;
    info!(command = ?std::env::args().nth(1), "factorio calculator starting");
    if let Some(e) = config_error {
        warn!(error = %e, "could not read user configuration, using defaults");
    }

    let mut conn = Connection::open(&cli.database)
        .with_context(|| format!("Failed to open {}", cli.database.display()))?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Import { source } => {
            let source = source.unwrap_or_else(|| settings.base_json.clone());
            let data = loader::load_base_data(&source)
                .with_context(|| format!("Failed to import {}", source.display()))?;
            db::store_database(&mut conn, &data)?;
            println!(
                "Imported {} recipes, {} machines, {} modules",
                data.recipes.len(),
                data.machines.len(),
                data.modules.len()
            );
        }

        Commands::LoadSample => {
            let data = sample::sample_database()?;
            db::store_database(&mut conn, &data)?;
            println!("Loaded {} sample recipes", data.recipes.len());
        }

        Commands::Calc {
            item,
            belt,
            rate,
            verbose,
            save,
            show_summary,
        } => {
            let ctx = RunContext::new(settings, db::load_database(&conn)?);
            let (label, speed) = match rate {
                Some(rate) => ("custom".to_string(), rate),
                None => {
                    let belt = belt.unwrap_or_else(|| ctx.settings.default_belt.clone());
                    let speed = ctx.database.belt_speeds.resolve(&belt)?;
                    (belt, speed)
                }
            };

            info!(item = %item, rate = speed, "starting calculation");
            let plan = Calculator::new(&ctx.database).calculate(&item, speed)?;
            report(&ctx, &plan, &label, speed, verbose, save)?;

            if show_summary && !plan.has_error() {
                println!("\n{}", summary::summarize(&plan));
            }
        }

        Commands::Run => {
            let ctx = RunContext::new(settings, db::load_database(&conn)?);
            info!(
                product = %options.product,
                belt_color = %options.belt_color,
                verbose = options.verbose,
                "configuration"
            );

            let (plan, speed) = match ctx.database.belt_speeds.resolve(&options.belt_color) {
                Ok(speed) => {
                    info!(product = %options.product, "starting calculation");
                    let plan = Calculator::new(&ctx.database).calculate(&options.product, speed)?;
                    (plan, speed)
                }
                Err(e @ Error::UnknownBelt(_)) => {
                    warn!(error = %e, "belt lookup failed");
                    (ProductionPlan::failed(&options.product, 0.0, 0, e.to_string()), 0.0)
                }
                Err(e) => return Err(e.into()),
            };

            report(&ctx, &plan, &options.belt_color, speed, options.verbose, true)?;
        }

        Commands::ListRecipes => {
            let recipes = db::list_recipes(&conn)?;
            if recipes.is_empty() {
                println!("No recipes in catalogue. Run 'import' or 'load-sample' first.");
            } else {
                println!("{:<30} {:<20} {}", "Recipe", "Machine category", "Categories");
                println!("{}", "-".repeat(72));
                for r in recipes {
                    println!(
                        "{:<30} {:<20} {}",
                        format_name(&r.name),
                        r.preferred_machine_category,
                        r.display_categories.join(", ")
                    );
                }
            }
        }

        Commands::ListMachines => {
            let machines = db::list_machines(&conn)?;
            if machines.is_empty() {
                println!("No machines in catalogue. Run 'import' or 'load-sample' first.");
            } else {
                println!(
                    "{:<28} {:>6} {:>6} {:>6}  {}",
                    "Machine", "Speed", "Slots", "Prod", "Categories"
                );
                println!("{}", "-".repeat(72));
                for m in machines {
                    let categories: Vec<_> = m.categories.iter().map(String::as_str).collect();
                    println!(
                        "{:<28} {:>6} {:>6} {:>5.0}%  {}",
                        format_name(&m.name),
                        m.crafting_speed,
                        m.module_slots,
                        m.base_productivity * 100.0,
                        categories.join(", ")
                    );
                }
            }
        }
    }

    println!("Log file saved to: {}", log_file.display());
    Ok(())
}

/// Print the plan and, when it is valid and `save` is set, write it to a file
fn report(
    ctx: &RunContext,
    plan: &ProductionPlan,
    belt_color: &str,
    belt_speed: f64,
    verbose: bool,
    save: bool,
) -> Result<()> {
    println!("\n{}", printer::format_header(belt_color, belt_speed));
    print!("{}", printer::format_plan(plan, verbose));

    if plan.has_error() {
        warn!(error = ?plan.error, "calculation aborted");
        return Ok(());
    }

    if save {
        let path = file_output::save_calculation(
            plan,
            belt_color,
            belt_speed,
            verbose,
            &ctx.settings.output_folder,
        )?;
        println!("\nCalculation saved to: {}", path.display());
    }
    info!("calculation completed successfully");
    Ok(())
}
