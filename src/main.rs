use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

use mealplan_engine::catalog::data_loader::load_food_catalog;
use mealplan_engine::cli::parse_args;
use mealplan_engine::generator::generate_with_builtin_templates;
use mealplan_engine::model::{NutritionalGoals, PatientProfile};
use mealplan_engine::rules::RulesConfig;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli_args = parse_args();

    let catalog = load_food_catalog(Path::new(&cli_args.catalog))
        .with_context(|| format!("Failed to load food catalog from '{}'", cli_args.catalog))?;

    let patient = match &cli_args.patient {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read patient file '{}'", path))?;
            serde_json::from_str::<PatientProfile>(&content)
                .with_context(|| format!("Failed to parse patient profile '{}'", path))?
        }
        None => PatientProfile::default(),
    };

    let goals = NutritionalGoals::with_target(cli_args.target_kcal);
    let rules = RulesConfig::default();
    let mut rng = match cli_args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let plan = generate_with_builtin_templates(
        &goals,
        &catalog,
        &patient,
        &cli_args.day,
        &rules,
        &mut rng,
    );

    println!("{}", serde_json::to_string_pretty(&plan)?);

    Ok(())
}
