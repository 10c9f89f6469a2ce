//! Import JSON game data into an on-disk catalogue and calculate from it

use std::fs;

use factorio_calculator::config::{RunOptions, Settings};
use factorio_calculator::{Error, calculate, db, file_output, loader, summary};
use rusqlite::Connection;

const MOD_JSON: &str = r#"{
    "belt_speeds": {"yellow": 15, "red": 30, "blue": 45, "green": 60},
    "machines": {
        "assembling_machine_3": {"crafting_speed": 1.25, "module_slots": 4, "categories": ["crafting"]},
        "foundry": {"crafting_speed": 4, "module_slots": 4, "categories": ["metallurgy"], "base_productivity": 0.5}
    },
    "recipes": {
        "iron_stick": {
            "category": ["Intermediate products"],
            "time": 0.5,
            "ingredients": [{"name": "iron_plate", "amount": 1}],
            "products": [{"name": "iron_stick", "amount": 2}]
        },
        "iron_plate": {
            "category": "metallurgy",
            "time": 3.2,
            "ingredients": [{"name": "molten_iron", "amount": 10}],
            "products": [{"name": "iron_plate", "amount": 1}]
        },
        "a": {"time": 1, "ingredients": [{"name": "b", "amount": 1}], "products": [{"name": "a", "amount": 1}]},
        "b": {"time": 1, "ingredients": [{"name": "a", "amount": 1}], "products": [{"name": "b", "amount": 1}]}
    }
}"#;

#[test]
fn imported_catalogue_drives_calculation() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("base.json");
    fs::write(&json_path, MOD_JSON).unwrap();

    let data = loader::load_base_data(&json_path).unwrap();
    let mut conn = Connection::open(dir.path().join("catalog.db")).unwrap();
    db::init_schema(&conn).unwrap();
    db::store_database(&mut conn, &data).unwrap();
    drop(conn);

    let conn = Connection::open(dir.path().join("catalog.db")).unwrap();
    let catalogue = db::load_database(&conn).unwrap();
    let speed = catalogue.belt_speeds.resolve("yellow").unwrap();

    let plan = calculate(&catalogue, "iron_stick", speed).unwrap();
    assert_eq!(plan.machine_type, "assembling_machine_3");
    assert_eq!(plan.output_rate_per_machine, 5.0);
    assert_eq!(plan.machines_required, 3.0);

    let plate = plan.ingredient_plans[0].sub_plan.as_ref().unwrap();
    assert_eq!(plate.machine_type, "foundry");
    assert_eq!(plate.target_rate, 7.5);
    assert_eq!(plate.output_rate_per_machine, 1.875);
    assert_eq!(plate.machines_required, 4.0);
    assert_eq!(plate.ingredient_plans[0].required_rate, 75.0);

    let totals = summary::summarize(&plan);
    assert_eq!(totals.raw_inputs, vec![("molten_iron".to_string(), 75.0)]);
}

#[test]
fn cyclic_recipes_fail_fast() {
    let data = loader::parse_base_data(MOD_JSON).unwrap();
    match calculate(&data, "a", 1.0) {
        Err(Error::CyclicRecipe { path }) => assert_eq!(path, vec!["a", "b", "a"]),
        other => panic!("expected cycle, got {:?}", other),
    }
}

#[test]
fn config_file_drives_run_options() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("Config.json");
    fs::write(
        &config_path,
        r#"{"product": "iron_stick", "belt_color": "red", "verbose": "false"}"#,
    )
    .unwrap();

    let config = loader::load_user_config(&config_path).unwrap();
    let options = RunOptions::resolve(&config, &Settings::default());
    assert_eq!(options.product, "iron_stick");
    assert_eq!(options.belt_color, "red");
    assert!(!options.verbose);

    let data = loader::parse_base_data(MOD_JSON).unwrap();
    let speed = data.belt_speeds.resolve(&options.belt_color).unwrap();
    let plan = calculate(&data, &options.product, speed).unwrap();

    let out = dir.path().join("trees");
    let path = file_output::save_calculation(&plan, "red", speed, options.verbose, &out).unwrap();
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("iron_stick_red_belt_compact_"));
    assert!(fs::read_to_string(&path).unwrap().contains("[Raw] Molten Iron (150.00/s)"));
}
