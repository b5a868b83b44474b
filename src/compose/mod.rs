//! Meal composition engine: picks a recipe template per meal moment,
//! resolves its ingredient roles against the safe catalog, converts
//! relative weights into target grams, and enforces the balanced-plate
//! guarantee twice (on roles before resolution, on resolved items
//! after).

pub mod templates;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::catalog::food_groups::FoodGroup;
use crate::catalog::FoodItem;
use crate::model::{
    IngredientRole, Meal, MealItem, MealMoment, NutritionalGoals, PatientProfile, RecipeTemplate,
    RiskMarker,
};
use crate::resolver::resolve_ingredient;
use crate::rules::RulesConfig;

/// Grams used when a resolved food reports zero energy; keeps the item
/// on the plate without dividing by zero.
const ZERO_ENERGY_FALLBACK_G: f32 = 50.0;

const REQUIRED_GROUPS: [FoodGroup; 3] = [
    FoodGroup::Protein,
    FoodGroup::Carbohydrate,
    FoodGroup::Vegetable,
];

/// Risk markers vetoed by the patient's pathologies.
fn vetoed_markers(patient: &PatientProfile) -> Vec<RiskMarker> {
    let mut vetoed = Vec::new();
    let has = |fragment: &str| {
        patient
            .pathologies
            .iter()
            .any(|p| p.to_lowercase().contains(fragment))
    };
    if has("hypertens") || has("renal") || has("kidney") {
        vetoed.push(RiskMarker::HighSodium);
    }
    if has("cardio") || has("obes") || has("cholesterol") {
        vetoed.push(RiskMarker::HighFat);
    }
    if has("gout") || has("uric") {
        vetoed.push(RiskMarker::HighPurine);
    }
    vetoed
}

fn marker_label(marker: RiskMarker) -> &'static str {
    match marker {
        RiskMarker::HighSodium => "high sodium",
        RiskMarker::HighFat => "high fat",
        RiskMarker::HighPurine => "high purine",
    }
}

/// True when `role` can stand in for `group` on this plate: tagged with
/// the group or carrying a term the lexicon recognizes, and actually
/// resolvable in the safe catalog.
fn role_covers_group(
    role: &IngredientRole,
    group: FoodGroup,
    catalog: &[FoodItem],
    rules: &RulesConfig,
) -> bool {
    let detectable = role.group == group
        || role
            .candidate_terms
            .iter()
            .any(|t| rules.lexicon.matches(group, t));
    detectable && resolve_ingredient(&role.candidate_terms, role.group, catalog, rules).is_some()
}

/// True when a resolved item satisfies `group`, by tag or by the
/// stricter name-pattern check against the resolved catalog name.
pub fn item_covers_group(item: &MealItem, group: FoodGroup, rules: &RulesConfig) -> bool {
    item.group == group || rules.lexicon.matches(group, &item.food.name)
}

/// Composes one meal for a scheduled moment. Always returns a meal;
/// degraded results (fewer items) are preferred over failure.
pub fn compose_meal(
    moment: &MealMoment,
    template_pool: &[RecipeTemplate],
    safe_catalog: &[FoodItem],
    goals: &NutritionalGoals,
    patient: &PatientProfile,
    rules: &RulesConfig,
    rng: &mut impl Rng,
    warnings: &mut Vec<String>,
) -> Meal {
    // 1. Slot filter, then medical-risk veto.
    let slot_pool: Vec<&RecipeTemplate> = template_pool
        .iter()
        .filter(|t| t.slots.contains(&moment.slot))
        .collect();
    let vetoed = vetoed_markers(patient);
    let eligible: Vec<&RecipeTemplate> = slot_pool
        .iter()
        .copied()
        .filter(|t| !t.risk_markers.iter().any(|m| vetoed.contains(m)))
        .collect();
    // One warning per vetoed marker; a recipe with several markers
    // counts toward each.
    for marker in &vetoed {
        let count = slot_pool
            .iter()
            .filter(|t| t.risk_markers.contains(marker))
            .count();
        if count > 0 {
            warnings.push(format!(
                "{}: excluded {} recipe(s) marked {}.",
                moment.label,
                count,
                marker_label(*marker)
            ));
        }
    }

    // 2. Uniform random pick; fall back to the whole unfiltered pool so
    // a meal is always produced.
    let template = match eligible.choose(rng) {
        Some(t) => *t,
        None => match template_pool.choose(rng) {
            Some(t) => {
                warnings.push(format!(
                    "{}: no eligible recipe for this slot; picked from the full pool.",
                    moment.label
                ));
                t
            }
            None => {
                warnings.push(format!("{}: recipe pool is empty; meal left blank.", moment.label));
                return Meal {
                    label: moment.label.clone(),
                    slot: moment.slot,
                    items: Vec::new(),
                };
            }
        },
    };
    debug!(meal = %moment.label, template = %template.name, "template selected");

    // 3. Balanced-plate guarantee on roles (main meals only): append a
    // filler role for each required group no existing role covers.
    let mut roles: Vec<IngredientRole> = template.roles.clone();
    if moment.slot.is_main() {
        for group in REQUIRED_GROUPS {
            let covered = roles
                .iter()
                .any(|r| role_covers_group(r, group, safe_catalog, rules));
            if !covered {
                if let Some(filler) = rules.filler_for(group) {
                    roles.push(IngredientRole {
                        group: filler.group,
                        candidate_terms: filler.candidate_terms.clone(),
                        relative_weight: filler.role_weight,
                    });
                }
            }
        }
    }

    // 4. Resolve roles; unresolvable ones are dropped and their weight
    // excluded, so the remaining items absorb the slack. Items are
    // tagged by their resolved name's category, not the role's: a mixed
    // dish picked for its vegetable fragment still gets its dominant
    // category's caps.
    let resolved: Vec<(FoodItem, FoodGroup, f32)> = roles
        .iter()
        .filter_map(|role| {
            resolve_ingredient(&role.candidate_terms, role.group, safe_catalog, rules).map(|food| {
                let group = rules.lexicon.detect(&food.name).unwrap_or(role.group);
                (food, group, role.relative_weight)
            })
        })
        .collect();

    // 5. Split the meal's calorie budget across resolved roles by
    // relative weight.
    let meal_budget_kcal = goals.target_kcal * moment.calorie_share;
    let total_weight: f32 = resolved.iter().map(|(_, _, w)| w).sum();
    let mut items: Vec<MealItem> = Vec::with_capacity(resolved.len());
    if total_weight > 0.0 {
        for (food, group, weight) in resolved {
            let ingredient_kcal = meal_budget_kcal * weight / total_weight;
            let grams = if food.energy_kcal > 0.0 {
                ingredient_kcal / (food.energy_kcal / 100.0)
            } else {
                ZERO_ENERGY_FALLBACK_G
            };
            items.push(MealItem::new(food, group, grams));
        }
    }

    // 6. Post-hoc safety net on the assembled items: the role-level
    // check can pass while the resolved names fail the stricter
    // category patterns.
    if moment.slot.is_main() {
        for group in REQUIRED_GROUPS {
            if items.iter().any(|i| item_covers_group(i, group, rules)) {
                continue;
            }
            if let Some(filler) = rules.filler_for(group) {
                match resolve_ingredient(&filler.candidate_terms, filler.group, safe_catalog, rules)
                {
                    Some(food) => {
                        let tagged = rules.lexicon.detect(&food.name).unwrap_or(filler.group);
                        items.push(MealItem::new(food, tagged, filler.default_grams));
                    }
                    None => warnings.push(format!(
                        "{}: no safe {:?} ingredient available; plate left unbalanced.",
                        moment.label, group
                    )),
                }
            }
        }
    }

    Meal {
        label: moment.label.clone(),
        slot: moment.slot,
        items,
    }
}

/// Composes every enabled meal moment of the day.
pub fn compose_day(
    patient: &PatientProfile,
    template_pool: &[RecipeTemplate],
    safe_catalog: &[FoodItem],
    goals: &NutritionalGoals,
    rules: &RulesConfig,
    rng: &mut impl Rng,
    warnings: &mut Vec<String>,
) -> Vec<Meal> {
    patient
        .meal_moments
        .iter()
        .filter(|m| m.enabled)
        .map(|moment| {
            compose_meal(
                moment,
                template_pool,
                safe_catalog,
                goals,
                patient,
                rules,
                rng,
                warnings,
            )
        })
        .collect()
}
