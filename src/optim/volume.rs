//! Gastric volume safety clamp. Runs before calibration so the
//! calibration's carbohydrate corrections cannot silently re-violate
//! gastric limits; a post-calibration audit re-checks and warns.

use tracing::debug;

use crate::model::{Meal, PatientType};
use crate::optim::calibrate::is_scalable;
use crate::rules::{round_to_step, RulesConfig};

fn estimated_volume_ml(meal: &Meal, rules: &RulesConfig) -> f32 {
    meal.items.iter().map(|i| i.quantity_g).sum::<f32>() * rules.volume.density_ml_per_g
}

/// Scales down the scalable items of any meal whose estimated volume
/// exceeds the patient-type ceiling by more than the clamp slack.
pub fn clamp_gastric_volume(
    meals: &[Meal],
    patient_type: PatientType,
    rules: &RulesConfig,
) -> Vec<Meal> {
    let ceiling = rules.volume.ceiling_ml(patient_type);
    meals
        .iter()
        .map(|meal| {
            let volume = estimated_volume_ml(meal, rules);
            if volume <= ceiling + rules.volume.clamp_slack_ml {
                return meal.clone();
            }
            let factor = ceiling / volume;
            debug!(meal = %meal.label, volume, ceiling, "gastric volume clamp");
            let mut out = meal.clone();
            for item in &mut out.items {
                if is_scalable(item, rules) {
                    item.quantity_g = round_to_step(item.quantity_g * factor, 5.0).max(5.0);
                }
            }
            out
        })
        .collect()
}

/// Post-calibration audit: emits a split-meal recommendation for any
/// meal still over its ceiling by more than the audit slack. Warning
/// only, never a hard failure.
pub fn audit_gastric_volume(
    meals: &[Meal],
    patient_type: PatientType,
    rules: &RulesConfig,
    warnings: &mut Vec<String>,
) {
    let ceiling = rules.volume.ceiling_ml(patient_type);
    for meal in meals {
        let volume = estimated_volume_ml(meal, rules);
        if volume > ceiling + rules.volume.audit_slack_ml {
            warnings.push(format!(
                "{}: estimated volume {:.0} mL exceeds the {:.0} mL gastric ceiling; consider splitting this meal.",
                meal.label, volume, ceiling
            ));
        }
    }
}
