//! Drug-food interaction lookup. Consumed by the filter pipeline as
//! pure functions; the tables are a curated clinical subset, not a full
//! formulary.

struct DrugFoodRule {
    med_fragment: &'static str,
    food_fragments: &'static [&'static str],
    critical: bool,
    advisory: &'static str,
}

const DRUG_FOOD_RULES: &[DrugFoodRule] = &[
    DrugFoodRule {
        med_fragment: "warfarin",
        food_fragments: &["spinach", "kale", "broccoli", "chard", "liver", "brussels"],
        critical: true,
        advisory: "Warfarin: vitamin-K-dense foods blunt anticoagulation and are excluded.",
    },
    DrugFoodRule {
        med_fragment: "maoi",
        food_fragments: &["aged cheese", "cured", "salami", "fermented", "soy sauce"],
        critical: true,
        advisory: "MAOI: tyramine-rich aged or cured foods risk hypertensive crisis and are excluded.",
    },
    DrugFoodRule {
        med_fragment: "statin",
        food_fragments: &["grapefruit"],
        critical: true,
        advisory: "Statin: grapefruit inhibits CYP3A4 metabolism and is excluded.",
    },
    DrugFoodRule {
        med_fragment: "levothyroxine",
        food_fragments: &["soy", "walnut"],
        critical: false,
        advisory: "Levothyroxine: separate soy and walnut intake from the dose by 4 hours.",
    },
    DrugFoodRule {
        med_fragment: "metformin",
        food_fragments: &["alcohol", "wine", "beer"],
        critical: false,
        advisory: "Metformin: limit alcohol to reduce lactic acidosis risk.",
    },
    DrugFoodRule {
        med_fragment: "lithium",
        food_fragments: &["coffee", "caffeine"],
        critical: false,
        advisory: "Lithium: keep caffeine intake stable to avoid serum level swings.",
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionCheck {
    pub critical_count: usize,
    pub advisory_count: usize,
}

fn rules_for<'a>(meds: &'a [String]) -> impl Iterator<Item = &'static DrugFoodRule> + 'a {
    DRUG_FOOD_RULES.iter().filter(move |rule| {
        meds.iter()
            .any(|m| m.to_lowercase().contains(rule.med_fragment))
    })
}

/// Advisory texts for every active medication with a known food
/// interaction, critical or not.
pub fn get_medication_warnings(meds: &[String]) -> Vec<String> {
    rules_for(meds).map(|r| r.advisory.to_string()).collect()
}

/// Counts interactions between one food and the active medication list.
/// Critical interactions make the food ineligible; advisories never
/// filter.
pub fn check_food_interaction(food_name: &str, meds: &[String]) -> InteractionCheck {
    let lower = food_name.to_lowercase();
    let mut check = InteractionCheck::default();
    for rule in rules_for(meds) {
        if rule.food_fragments.iter().any(|f| lower.contains(f)) {
            if rule.critical {
                check.critical_count += 1;
            } else {
                check.advisory_count += 1;
            }
        }
    }
    check
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warfarin_spinach_is_critical() {
        let meds = vec!["Warfarin 5mg".to_string()];
        let check = check_food_interaction("Spinach, raw", &meds);
        assert_eq!(check.critical_count, 1);
    }

    #[test]
    fn test_levothyroxine_soy_is_advisory_only() {
        let meds = vec!["levothyroxine".to_string()];
        let check = check_food_interaction("Soy, tofu", &meds);
        assert_eq!(check.critical_count, 0);
        assert_eq!(check.advisory_count, 1);
    }

    #[test]
    fn test_no_meds_no_interactions() {
        let check = check_food_interaction("Spinach, raw", &[]);
        assert_eq!(check.critical_count, 0);
    }

    #[test]
    fn test_medication_warnings_one_per_rule() {
        let meds = vec!["warfarin".to_string(), "metformin".to_string()];
        let warnings = get_medication_warnings(&meds);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("Warfarin")));
    }
}
