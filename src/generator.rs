//! Pipeline orchestrator. One `generate` call builds one day's plan:
//! filter -> compose -> bound -> plate -> gastric clamp -> calibrate ->
//! force-adjust -> bromatology -> aggregate. Each stage is a pure
//! function over a cloned meal list; no stage reaches backward, and the
//! call never fails: degraded plans carry warnings instead.

use rand::Rng;
use tracing::{debug, info};

use crate::catalog::FoodItem;
use crate::compose::compose_day;
use crate::model::{total_day_kcal, DailyPlan, NutritionalGoals, PatientProfile, RecipeTemplate};
use crate::optim::bounding::bound_portions;
use crate::optim::calibrate::{calibrate_day, force_adjust};
use crate::optim::plating::apply_plating_rules;
use crate::optim::volume::{audit_gastric_volume, clamp_gastric_volume};
use crate::plan_aggregator::{aggregate_day, micro_floor_warnings};
use crate::rules::RulesConfig;
use crate::safety::filter::filter_catalog;
use crate::safety::interactions::get_medication_warnings;
use crate::{bromatology, compose};

/// Builds a single day's meal plan. Pure computation over the inputs;
/// the RNG is the only source of non-determinism, injected so callers
/// and tests can seed it.
pub fn generate(
    goals: &NutritionalGoals,
    catalog: &[FoodItem],
    templates: &[RecipeTemplate],
    patient: &PatientProfile,
    day_label: &str,
    rules: &RulesConfig,
    rng: &mut impl Rng,
) -> DailyPlan {
    let mut warnings = Vec::new();

    if goals.target_kcal < rules.min_viable_target_kcal {
        // Flagged, not rejected: a very low target may be intentional
        // (pediatric, post-bariatric).
        warnings.push(format!(
            "Target of {:.0} kcal is below {:.0} kcal and may be insufficient; verify it is intentional.",
            goals.target_kcal, rules.min_viable_target_kcal
        ));
    }
    warnings.extend(get_medication_warnings(&patient.medications));

    // 1. Safety filter.
    let outcome = filter_catalog(catalog, patient);
    warnings.extend(outcome.warnings);
    debug!(
        safe = outcome.safe_catalog.len(),
        raw = catalog.len(),
        "catalog filtered"
    );

    // 2. Compose meals.
    let meals = compose_day(
        patient,
        templates,
        &outcome.safe_catalog,
        goals,
        rules,
        rng,
        &mut warnings,
    );

    // 3-5. Bound, plate, clamp volume.
    let meals = bound_portions(&meals, rules);
    let meals = apply_plating_rules(&meals, rules);
    let meals = clamp_gastric_volume(&meals, patient.patient_type, rules);

    // 6-7. Calibrate, then escalate if still out of tolerance.
    let meals = calibrate_day(&meals, goals.target_kcal, rules);
    let meals = force_adjust(&meals, goals.target_kcal, rules);

    let total = total_day_kcal(&meals);
    let band = rules.calibration.outer_band * goals.target_kcal;
    if (total - goals.target_kcal).abs() > band {
        warnings.push(format!(
            "Calibration did not converge: plan totals {:.0} kcal against a target of {:.0} kcal (tolerance {:.0}).",
            total, goals.target_kcal, band
        ));
    }

    audit_gastric_volume(&meals, patient.patient_type, rules, &mut warnings);

    // 8-9. Display conversions and final totals.
    let meals = bromatology::apply_bromatology(&meals, rules);
    let stats = aggregate_day(&meals);
    if let Some(floors) = &goals.micro_floors {
        warnings.extend(micro_floor_warnings(&stats.totals, floors));
    }

    info!(
        day = day_label,
        total_kcal = stats.totals.energy_kcal,
        warnings = warnings.len(),
        "plan generated"
    );

    DailyPlan {
        day_label: day_label.to_string(),
        meals,
        stats,
        goals: goals.clone(),
        warnings,
    }
}

/// Convenience wrapper using the built-in template store.
pub fn generate_with_builtin_templates(
    goals: &NutritionalGoals,
    catalog: &[FoodItem],
    patient: &PatientProfile,
    day_label: &str,
    rules: &RulesConfig,
    rng: &mut impl Rng,
) -> DailyPlan {
    let templates = compose::templates::builtin_templates();
    generate(goals, catalog, &templates, patient, day_label, rules, rng)
}
