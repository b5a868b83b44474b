//! Safety filter pipeline. Five fixed stages, each narrowing the
//! catalog by case-insensitive substring matching against term lists.
//!
//! Availability stages fail open: if filtering would empty the catalog
//! they skip and keep the pool intact. Fatal allergies and critical
//! drug interactions are exempt from that escape and always filter.

use tracing::{debug, warn};

use crate::catalog::FoodItem;
use crate::model::{AllergySeverity, PatientProfile, TextureRequirement};
use crate::safety::interactions::check_food_interaction;

#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub safe_catalog: Vec<FoodItem>,
    pub warnings: Vec<String>,
}

/// Pathology label fragment -> forbidden name fragments.
fn pathology_exclusions(label: &str) -> Option<(&'static str, &'static [&'static str])> {
    let lower = label.to_lowercase();
    if lower.contains("diabet") {
        return Some(("diabetes", &["sugar", "honey", "syrup", "sweetened", "candy", "jam"]));
    }
    if lower.contains("renal") || lower.contains("kidney") {
        return Some(("renal disease", &["banana", "avocado", "spinach", "dried fruit", "beet"]));
    }
    if lower.contains("hypertens") {
        return Some(("hypertension", &["salt", "cured", "bacon", "sausage", "canned", "salami"]));
    }
    if lower.contains("gout") || lower.contains("uric") {
        return Some(("gout", &["liver", "anchovy", "sardine", "offal", "kidney"]));
    }
    if lower.contains("cardio") || lower.contains("cholesterol") {
        return Some(("cardiovascular disease", &["butter", "lard", "bacon", "cream"]));
    }
    None
}

/// Full derivative/synonym set for a fatal allergy.
fn allergen_derivatives(allergen: &str) -> Vec<&'static str> {
    let lower = allergen.to_lowercase();
    if lower.contains("dairy") || lower.contains("milk") || lower.contains("lactose") {
        return vec!["milk", "cheese", "yogurt", "whey", "casein", "butter", "cream", "curd", "kefir"];
    }
    if lower.contains("gluten") || lower.contains("wheat") {
        return vec!["wheat", "barley", "rye", "bread", "pasta", "flour", "couscous", "seitan", "cracker"];
    }
    if lower.contains("egg") {
        return vec!["egg", "albumin", "mayonnaise", "meringue"];
    }
    if lower.contains("peanut") {
        return vec!["peanut", "groundnut"];
    }
    if lower.contains("nut") {
        return vec!["almond", "walnut", "hazelnut", "cashew", "pistachio", "pecan", "nut"];
    }
    if lower.contains("fish") && !lower.contains("shellfish") {
        return vec!["fish", "cod", "hake", "salmon", "tuna", "sardine", "anchovy"];
    }
    if lower.contains("shellfish") || lower.contains("seafood") {
        return vec!["shrimp", "prawn", "crab", "lobster", "mussel", "clam", "oyster", "squid"];
    }
    if lower.contains("soy") {
        return vec!["soy", "soya", "tofu", "edamame", "tempeh", "miso"];
    }
    Vec::new()
}

/// Direct-source terms for an intolerance. A strict subset of
/// [`allergen_derivatives`]: intolerances remove the obvious sources
/// (milk, cheese) but keep trace-level derivatives (whey, casein) that
/// a fatal allergy would also exclude.
fn intolerance_sources(allergen: &str) -> Vec<&'static str> {
    let lower = allergen.to_lowercase();
    if lower.contains("dairy") || lower.contains("milk") || lower.contains("lactose") {
        return vec!["milk", "cheese", "yogurt"];
    }
    if lower.contains("gluten") || lower.contains("wheat") {
        return vec!["wheat", "bread", "pasta"];
    }
    if lower.contains("egg") {
        return vec!["egg"];
    }
    if lower.contains("peanut") {
        return vec!["peanut"];
    }
    if lower.contains("nut") {
        return vec!["nut", "almond", "walnut", "hazelnut"];
    }
    if lower.contains("fish") && !lower.contains("shellfish") {
        return vec!["fish", "cod", "hake", "salmon", "tuna"];
    }
    if lower.contains("shellfish") || lower.contains("seafood") {
        return vec!["shrimp", "prawn", "crab", "mussel"];
    }
    if lower.contains("soy") {
        return vec!["soy", "tofu"];
    }
    Vec::new()
}

/// Choking-risk / hard-texture fragments removed for modified-texture
/// diets.
const TEXTURE_UNSAFE_TERMS: &[&str] = &[
    "nut", "seed", "toast", "cracker", "popcorn", "granola", "crust", "raw carrot", "raw celery",
    "dried fruit",
];

fn matches_any(name: &str, terms: &[&str]) -> bool {
    let lower = name.to_lowercase();
    terms.iter().any(|t| lower.contains(t))
}

/// Removes matching foods unless that would empty the catalog.
/// Returns the (possibly unchanged) catalog, the removed count, and
/// whether the stage was skipped.
fn retain_fail_open(
    catalog: Vec<FoodItem>,
    exclude: impl Fn(&FoodItem) -> bool,
) -> (Vec<FoodItem>, usize, bool) {
    let kept: Vec<FoodItem> = catalog.iter().filter(|f| !exclude(f)).cloned().collect();
    if kept.is_empty() && !catalog.is_empty() {
        warn!("safety filter stage would empty the catalog; failing open");
        return (catalog, 0, true);
    }
    let removed = catalog.len() - kept.len();
    (kept, removed, false)
}

/// Removes matching foods unconditionally. Used for fatal allergies and
/// critical drug interactions, where availability never overrides
/// safety.
fn retain_fail_closed(
    catalog: Vec<FoodItem>,
    exclude: impl Fn(&FoodItem) -> bool,
) -> (Vec<FoodItem>, usize) {
    let before = catalog.len();
    let kept: Vec<FoodItem> = catalog.into_iter().filter(|f| !exclude(f)).collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Reduces the raw catalog to foods that are safe for this patient.
/// Stage order is fixed: dislikes, pathologies, allergies, texture,
/// drug interactions. Warnings accumulate in that order.
pub fn filter_catalog(
    catalog: &[FoodItem],
    patient: &PatientProfile,
) -> FilterOutcome {
    let mut warnings = Vec::new();
    let mut pool: Vec<FoodItem> = catalog.to_vec();

    // 1. Disliked foods. Preference only, no warning.
    if !patient.disliked_foods.is_empty() {
        let disliked: Vec<String> = patient
            .disliked_foods
            .iter()
            .map(|d| d.to_lowercase())
            .collect();
        let (next, removed, _) = retain_fail_open(pool, |f| {
            let lower = f.name.to_lowercase();
            disliked.iter().any(|d| lower.contains(d.as_str()))
        });
        debug!(removed, "disliked-food stage");
        pool = next;
    }

    // 2. Pathology exclusions.
    for pathology in &patient.pathologies {
        if let Some((label, terms)) = pathology_exclusions(pathology) {
            let (next, removed, skipped) = retain_fail_open(pool, |f| matches_any(&f.name, terms));
            pool = next;
            if skipped {
                warnings.push(format!(
                    "Pathology filter for {} skipped: it would have removed every available food.",
                    label
                ));
            } else if removed > 0 {
                warnings.push(format!(
                    "Excluded {} food(s) contraindicated for {}.",
                    removed, label
                ));
            }
        }
    }

    // 3. Allergy severity.
    for allergy in &patient.allergies {
        match allergy.severity {
            AllergySeverity::Fatal => {
                let terms = allergen_derivatives(&allergy.allergen);
                let (next, removed) = retain_fail_closed(pool, |f| {
                    let lower = f.name.to_lowercase();
                    lower.contains(&allergy.allergen.to_lowercase())
                        || matches_any(&f.name, &terms)
                });
                pool = next;
                warnings.push(format!(
                    "Fatal allergy to {}: removed {} food(s) including all derivatives.",
                    allergy.allergen, removed
                ));
            }
            AllergySeverity::Intolerance => {
                let term = allergy.allergen.to_lowercase();
                let sources = intolerance_sources(&allergy.allergen);
                let (next, removed, skipped) = retain_fail_open(pool, |f| {
                    f.name.to_lowercase().contains(term.as_str())
                        || matches_any(&f.name, &sources)
                });
                pool = next;
                if !skipped {
                    warnings.push(format!(
                        "Intolerance to {}: removed {} direct-source food(s).",
                        allergy.allergen, removed
                    ));
                }
            }
            AllergySeverity::Preference => {
                // Noted on the plan but never force-filtered.
                warnings.push(format!(
                    "Preference-level sensitivity to {} noted; not filtered.",
                    allergy.allergen
                ));
            }
        }
    }

    // 4. Texture / dysphagia.
    if matches!(
        patient.texture,
        TextureRequirement::Puree | TextureRequirement::Minced
    ) {
        let (next, removed, skipped) =
            retain_fail_open(pool, |f| matches_any(&f.name, TEXTURE_UNSAFE_TERMS));
        pool = next;
        if !skipped && removed > 0 {
            warnings.push(format!(
                "Modified-texture diet: removed {} hard or choking-risk food(s).",
                removed
            ));
        }
    }

    // 5. Critical drug-food interactions.
    if !patient.medications.is_empty() {
        let (next, removed) = retain_fail_closed(pool, |f| {
            check_food_interaction(&f.name, &patient.medications).critical_count > 0
        });
        pool = next;
        if removed > 0 {
            warnings.push(format!(
                "Removed {} food(s) with critical interactions against active medication.",
                removed
            ));
        }
    }

    FilterOutcome {
        safe_catalog: pool,
        warnings,
    }
}
