//! Practitioner plating conventions, applied after portion bounding:
//! 5 g rounding, protein and vegetable floors, added-fat ceiling, and
//! removal of redundant tiny starch sides.

use crate::catalog::food_groups::FoodGroup;
use crate::model::{Meal, MealSlot};
use crate::rules::{round_to_step, RulesConfig};

fn plate_meal(meal: &Meal, rules: &RulesConfig) -> Meal {
    let p = &rules.plating;
    let mut out = meal.clone();

    for item in &mut out.items {
        // Round to the serving step, with the step as a floor for any
        // nonzero quantity.
        if item.quantity_g > 0.0 {
            item.quantity_g = round_to_step(item.quantity_g, p.round_step_g).max(p.round_step_g);
        }

        // Floors yield to the item's hard cap: a 30 g-capped protein
        // concentrate must not be lifted to the 80 g plate floor.
        let cap = rules.hard_cap(&item.food.name, item.group);
        match item.group {
            FoodGroup::Protein
                if matches!(meal.slot, MealSlot::Lunch | MealSlot::Dinner)
                    && item.quantity_g < p.protein_floor_g =>
            {
                item.quantity_g = p.protein_floor_g.min(cap);
            }
            FoodGroup::Vegetable if item.quantity_g < p.vegetable_floor_g => {
                // Flavor-base floor: a 10 g onion is not worth plating.
                item.quantity_g = p.vegetable_floor_g.min(cap);
            }
            FoodGroup::Fat if item.quantity_g > p.fat_cap_g => {
                item.quantity_g = p.fat_cap_g;
            }
            _ => {}
        }
    }

    // Drop tiny duplicate starch sides, but never the last carbohydrate
    // on the plate. Calories are intentionally not redistributed here;
    // calibration recovers the difference.
    let carb_indices: Vec<usize> = out
        .items
        .iter()
        .enumerate()
        .filter(|(_, i)| i.group == FoodGroup::Carbohydrate)
        .map(|(idx, _)| idx)
        .collect();
    if carb_indices.len() > 1 {
        let mut tiny_indices: Vec<usize> = carb_indices
            .iter()
            .copied()
            .filter(|&idx| out.items[idx].quantity_g < p.tiny_carb_threshold_g)
            .collect();
        tiny_indices.sort_by(|&a, &b| {
            out.items[a]
                .quantity_g
                .partial_cmp(&out.items[b].quantity_g)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        // If every carb is tiny, the largest one survives.
        let droppable = if tiny_indices.len() == carb_indices.len() {
            tiny_indices.len() - 1
        } else {
            tiny_indices.len()
        };
        let mut to_drop: Vec<usize> = tiny_indices.into_iter().take(droppable).collect();
        to_drop.sort_unstable_by(|a, b| b.cmp(a));
        for idx in to_drop {
            out.items.remove(idx);
        }
    }

    out.items.retain(|i| i.quantity_g > 0.0);
    out
}

/// Pure stage: applies plating heuristics to every meal.
pub fn apply_plating_rules(meals: &[Meal], rules: &RulesConfig) -> Vec<Meal> {
    meals.iter().map(|m| plate_meal(m, rules)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FoodItem, Micronutrients};
    use crate::model::MealItem;

    fn food(name: &str, kcal: f32) -> FoodItem {
        FoodItem {
            id: 0,
            name: name.to_string(),
            energy_kcal: kcal,
            protein_g: 0.0,
            fat_g: 0.0,
            carbohydrate_g: 0.0,
            fiber_g: 0.0,
            micros: Micronutrients::default(),
            waste_factor: 1.0,
        }
    }

    fn lunch(items: Vec<MealItem>) -> Meal {
        Meal {
            label: "Lunch".to_string(),
            slot: MealSlot::Lunch,
            items,
        }
    }

    #[test]
    fn test_rounds_to_five_grams() {
        let rules = RulesConfig::default();
        let m = lunch(vec![MealItem::new(
            food("Rice, white, raw", 360.0),
            FoodGroup::Carbohydrate,
            82.4,
        )]);
        let plated = apply_plating_rules(&[m], &rules);
        assert_eq!(plated[0].items[0].quantity_g, 80.0);
    }

    #[test]
    fn test_protein_floor_in_lunch() {
        let rules = RulesConfig::default();
        let m = lunch(vec![MealItem::new(
            food("Chicken breast, raw", 120.0),
            FoodGroup::Protein,
            55.0,
        )]);
        let plated = apply_plating_rules(&[m], &rules);
        assert_eq!(plated[0].items[0].quantity_g, 80.0);
    }

    #[test]
    fn test_protein_floor_not_applied_to_breakfast() {
        let rules = RulesConfig::default();
        let m = Meal {
            label: "Breakfast".to_string(),
            slot: MealSlot::Breakfast,
            items: vec![MealItem::new(
                food("Egg, whole, raw", 155.0),
                FoodGroup::Protein,
                55.0,
            )],
        };
        let plated = apply_plating_rules(&[m], &rules);
        assert_eq!(plated[0].items[0].quantity_g, 55.0);
    }

    #[test]
    fn test_protein_floor_respects_specific_cap() {
        let rules = RulesConfig::default();
        // "protein powder" is capped at 30 g; the 80 g lunch floor must
        // not lift it above that cap.
        let m = lunch(vec![MealItem::new(
            food("Protein powder, whey isolate", 375.0),
            FoodGroup::Protein,
            25.0,
        )]);
        let plated = apply_plating_rules(&[m], &rules);
        let item = &plated[0].items[0];
        let cap = rules.hard_cap(&item.food.name, item.group);
        assert_eq!(item.quantity_g, 30.0);
        assert!(item.quantity_g <= cap);
    }

    #[test]
    fn test_fat_capped_at_fifteen() {
        let rules = RulesConfig::default();
        let m = lunch(vec![MealItem::new(food("Olive oil", 884.0), FoodGroup::Fat, 35.0)]);
        let plated = apply_plating_rules(&[m], &rules);
        assert_eq!(plated[0].items[0].quantity_g, 15.0);
    }

    #[test]
    fn test_tiny_duplicate_carb_dropped() {
        let rules = RulesConfig::default();
        let m = lunch(vec![
            MealItem::new(food("Rice, white, raw", 360.0), FoodGroup::Carbohydrate, 120.0),
            MealItem::new(food("Bread, white", 265.0), FoodGroup::Carbohydrate, 20.0),
        ]);
        let plated = apply_plating_rules(&[m], &rules);
        assert_eq!(plated[0].items.len(), 1);
        assert!(plated[0].items[0].food.name.contains("Rice"));
    }

    #[test]
    fn test_last_carb_survives_even_if_tiny() {
        let rules = RulesConfig::default();
        let m = lunch(vec![
            MealItem::new(food("Rice, white, raw", 360.0), FoodGroup::Carbohydrate, 20.0),
            MealItem::new(food("Bread, white", 265.0), FoodGroup::Carbohydrate, 20.0),
        ]);
        let plated = apply_plating_rules(&[m], &rules);
        // Both are tiny; one must remain so the plate keeps a starch.
        assert_eq!(plated[0].items.len(), 1);
    }

    #[test]
    fn test_vegetable_floor() {
        let rules = RulesConfig::default();
        let m = lunch(vec![MealItem::new(food("Onion", 40.0), FoodGroup::Vegetable, 10.0)]);
        let plated = apply_plating_rules(&[m], &rules);
        assert_eq!(plated[0].items[0].quantity_g, 30.0);
    }
}
