//! Bromatology conversions: net edible grams to as-purchased (gross)
//! and cooked display weights. Runs after calibration so shopping and
//! cooked weights reflect the final portions. Nutrient math always uses
//! the net raw quantity; these values are display-only.

use crate::catalog::food_groups::FoodGroup;
use crate::model::Meal;
use crate::rules::RulesConfig;

/// Cooking yield factor for a food. 1.0 when the catalog name already
/// indicates a prepared state; otherwise a group/name table (grains and
/// legumes expand when boiled, proteins contract, tubers barely move).
pub fn yield_factor(food_name: &str, group: FoodGroup, rules: &RulesConfig) -> f32 {
    let lower = food_name.to_lowercase();
    let y = &rules.yields;
    if y.prepared_markers.iter().any(|m| lower.contains(m.as_str())) {
        return 1.0;
    }
    if rules.legume_terms.iter().any(|t| lower.contains(t.as_str())) {
        return y.legume_factor;
    }
    if rules.tuber_terms.iter().any(|t| lower.contains(t.as_str())) {
        return y.tuber_factor;
    }
    if rules.grain_terms.iter().any(|t| lower.contains(t.as_str())) {
        return y.grain_factor;
    }
    match group {
        FoodGroup::Protein => y.protein_factor,
        FoodGroup::Vegetable => y.vegetable_factor,
        _ => 1.0,
    }
}

/// Pure stage: fills in gross and cooked display weights for every
/// item.
pub fn apply_bromatology(meals: &[Meal], rules: &RulesConfig) -> Vec<Meal> {
    meals
        .iter()
        .map(|meal| {
            let mut out = meal.clone();
            for item in &mut out.items {
                item.gross_quantity_g = Some((item.quantity_g * item.food.waste_factor).round());
                let factor = yield_factor(&item.food.name, item.group, rules);
                item.cooked_quantity_g = Some((item.quantity_g * factor).round());
            }
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FoodItem, Micronutrients};
    use crate::model::{MealItem, MealSlot};

    fn food(name: &str, waste: f32) -> FoodItem {
        FoodItem {
            id: 0,
            name: name.to_string(),
            energy_kcal: 100.0,
            protein_g: 0.0,
            fat_g: 0.0,
            carbohydrate_g: 0.0,
            fiber_g: 0.0,
            micros: Micronutrients::default(),
            waste_factor: waste,
        }
    }

    #[test]
    fn test_yield_factors() {
        let rules = RulesConfig::default();
        assert_eq!(
            yield_factor("Rice, white, raw", FoodGroup::Carbohydrate, &rules),
            rules.yields.grain_factor
        );
        assert_eq!(
            yield_factor("Lentils, dried", FoodGroup::Protein, &rules),
            rules.yields.legume_factor
        );
        assert_eq!(
            yield_factor("Potato, white, raw", FoodGroup::Carbohydrate, &rules),
            rules.yields.tuber_factor
        );
        assert_eq!(
            yield_factor("Chicken breast, raw", FoodGroup::Protein, &rules),
            rules.yields.protein_factor
        );
    }

    #[test]
    fn test_prepared_state_yields_one() {
        let rules = RulesConfig::default();
        assert_eq!(
            yield_factor("Chicken breast, grilled", FoodGroup::Protein, &rules),
            1.0
        );
        assert_eq!(
            yield_factor("Rice, white, cooked", FoodGroup::Carbohydrate, &rules),
            1.0
        );
    }

    #[test]
    fn test_gross_and_cooked_weights() {
        let rules = RulesConfig::default();
        let meal = Meal {
            label: "Lunch".to_string(),
            slot: MealSlot::Lunch,
            items: vec![MealItem::new(
                food("Banana", 1.54),
                FoodGroup::Fruit,
                100.0,
            )],
        };
        let out = apply_bromatology(&[meal], &rules);
        let item = &out[0].items[0];
        assert_eq!(item.gross_quantity_g, Some(154.0));
        assert_eq!(item.cooked_quantity_g, Some(100.0)); // fruit: no yield change
        // Net quantity untouched; nutrient math stays on it.
        assert_eq!(item.quantity_g, 100.0);
    }
}
