//! Caloric calibration: iterative proportional rescaling of the
//! scalable ingredients toward the daily target, escalating to a
//! targeted carbohydrate correction and, as a last resort, one uniform
//! scale. Uniform scaling alone oscillates once many items sit at their
//! caps, hence the escalation ladder.

use tracing::debug;

use crate::catalog::food_groups::FoodGroup;
use crate::model::{total_day_kcal, Meal, MealItem, MealSlot};
use crate::rules::{round_to_step, RulesConfig};

/// Condiment-scale threshold: below this a condiment-pattern item is
/// left alone.
const CONDIMENT_SCALE_MIN_G: f32 = 20.0;
/// Fat portions under this are seasoning, not an adjustable portion.
const FAT_SCALE_MIN_G: f32 = 5.0;
/// A single egg; scaling it produces fractional eggs.
const WHOLE_EGG_UNIT_G: f32 = 60.0;
/// General scalability threshold for unrecognized items.
const GENERIC_SCALE_MIN_G: f32 = 20.0;
/// Absolute minimum before an item is considered unscalable at all.
const HARD_SCALE_MIN_G: f32 = 10.0;

/// Whether an item may be proportionally adjusted during calibration.
/// Seasoning, single eggs and sub-portion fats are pinned because
/// scaling them produces nonsensical fractional portions.
pub fn is_scalable(item: &MealItem, rules: &RulesConfig) -> bool {
    let name = &item.food.name;
    if item.quantity_g < HARD_SCALE_MIN_G {
        return false;
    }
    if rules.is_condiment(name) && item.quantity_g < CONDIMENT_SCALE_MIN_G {
        return false;
    }
    if item.group == FoodGroup::Fat && item.quantity_g < FAT_SCALE_MIN_G {
        return false;
    }
    if rules.is_whole_egg(name) && item.quantity_g <= WHOLE_EGG_UNIT_G {
        return false;
    }
    if rules.is_staple_carb(name) || rules.is_main_protein(name) {
        return true;
    }
    item.quantity_g >= GENERIC_SCALE_MIN_G
}

/// Main calibration loop: proportional scaling of scalable items,
/// coarse 5 g rounding early and 1 g rounding late for fine
/// convergence. Bounded iteration count is the termination guarantee.
pub fn calibrate_day(meals: &[Meal], target_kcal: f32, rules: &RulesConfig) -> Vec<Meal> {
    let c = &rules.calibration;
    let mut out: Vec<Meal> = meals.to_vec();

    for iteration in 0..c.max_iterations {
        let current = total_day_kcal(&out);
        if current <= 0.0 {
            break;
        }
        if (current - target_kcal).abs() <= c.inner_band * target_kcal {
            debug!(iteration, current, "calibration converged");
            break;
        }
        let factor = target_kcal / current;
        let step = if iteration < c.coarse_iterations { 5.0 } else { 1.0 };

        for meal in &mut out {
            for item in &mut meal.items {
                if !is_scalable(item, rules) {
                    continue;
                }
                let cap = rules.hard_cap(&item.food.name, item.group);
                let scaled = (item.quantity_g * factor).clamp(c.min_scalable_g, cap);
                item.quantity_g = round_to_step(scaled, step).min(cap);
            }
        }
    }

    out
}

fn slot_priority(slot: MealSlot) -> usize {
    match slot {
        MealSlot::Lunch => 0,
        MealSlot::Dinner => 1,
        MealSlot::Breakfast => 2,
        MealSlot::Snack => 3,
    }
}

fn within_band(current: f32, target: f32, band: f32) -> bool {
    (current - target).abs() <= band * target
}

/// Applies as much of `gap_kcal` as possible to one item, bounded by
/// its cap above and `floor_g` below. Returns the kcal actually moved.
fn adjust_item(item: &mut MealItem, gap_kcal: f32, floor_g: f32, rules: &RulesConfig) -> f32 {
    if item.food.energy_kcal <= 0.0 {
        return 0.0;
    }
    let cap = rules.hard_cap(&item.food.name, item.group);
    let wanted_g = gap_kcal / (item.food.energy_kcal / 100.0);
    let new_g = (item.quantity_g + wanted_g).clamp(floor_g, cap);
    let new_g = round_to_step(new_g, 1.0).min(cap).max(floor_g.min(cap));
    let moved = item.food.kcal_for(new_g - item.quantity_g);
    item.quantity_g = new_g;
    moved
}

/// Force-adjust fallback for when the main loop leaves the day outside
/// the user-facing tolerance band. Staple carbohydrates first in meal
/// priority order, then any carbohydrate anywhere, then one uniform
/// proportional pass over everything adjustable.
pub fn force_adjust(meals: &[Meal], target_kcal: f32, rules: &RulesConfig) -> Vec<Meal> {
    let c = &rules.calibration;
    let mut out: Vec<Meal> = meals.to_vec();

    let current = total_day_kcal(&out);
    if current <= 0.0 || within_band(current, target_kcal, c.outer_band) {
        return out;
    }

    // Pass 1: staple carbohydrates, lunch -> dinner -> breakfast -> snack.
    let mut meal_order: Vec<usize> = (0..out.len()).collect();
    meal_order.sort_by_key(|&i| slot_priority(out[i].slot));

    let mut gap = target_kcal - total_day_kcal(&out);
    for &mi in &meal_order {
        for item in &mut out[mi].items {
            if within_band(target_kcal - gap, target_kcal, c.outer_band) {
                break;
            }
            if item.group == FoodGroup::Carbohydrate && rules.is_staple_carb(&item.food.name) {
                gap -= adjust_item(item, gap, c.force_floor_g, rules);
            }
        }
    }
    if within_band(total_day_kcal(&out), target_kcal, c.outer_band) {
        debug!("force-adjust converged on staple carbohydrates");
        return out;
    }

    // Pass 2: any carbohydrate item, any meal.
    let mut gap = target_kcal - total_day_kcal(&out);
    for &mi in &meal_order {
        for item in &mut out[mi].items {
            if within_band(target_kcal - gap, target_kcal, c.outer_band) {
                break;
            }
            if item.group == FoodGroup::Carbohydrate {
                gap -= adjust_item(item, gap, c.force_floor_g, rules);
            }
        }
    }
    if within_band(total_day_kcal(&out), target_kcal, c.outer_band) {
        debug!("force-adjust converged on carbohydrates");
        return out;
    }

    // Pass 3: one uniform proportional scale over every adjustable item,
    // mainly downward for gastric safety when the day overshoots.
    let current = total_day_kcal(&out);
    if current > 0.0 {
        let factor = target_kcal / current;
        for meal in &mut out {
            for item in &mut meal.items {
                if item.quantity_g < GENERIC_SCALE_MIN_G || rules.is_condiment(&item.food.name) {
                    continue;
                }
                let cap = rules.hard_cap(&item.food.name, item.group);
                let scaled = (item.quantity_g * factor).clamp(c.last_resort_floor_g, cap);
                item.quantity_g = round_to_step(scaled, 1.0).min(cap);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FoodItem, Micronutrients};
    use crate::model::MealSlot;

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

    fn item(name: &str, kcal: f32, group: FoodGroup, grams: f32) -> MealItem {
        MealItem::new(food(name, kcal), group, grams)
    }

    fn day() -> Vec<Meal> {
        vec![
            Meal {
                label: "Lunch".to_string(),
                slot: MealSlot::Lunch,
                items: vec![
                    item("Chicken breast, raw", 120.0, FoodGroup::Protein, 150.0),
                    item("Rice, white, raw", 360.0, FoodGroup::Carbohydrate, 100.0),
                    item("Tomato, ripe", 18.0, FoodGroup::Vegetable, 100.0),
                    item("Olive oil", 884.0, FoodGroup::Fat, 10.0),
                ],
            },
            Meal {
                label: "Dinner".to_string(),
                slot: MealSlot::Dinner,
                items: vec![
                    item("Hake fillet, raw", 90.0, FoodGroup::Protein, 150.0),
                    item("Potato, white, raw", 77.0, FoodGroup::Carbohydrate, 200.0),
                    item("Carrot", 41.0, FoodGroup::Vegetable, 80.0),
                ],
            },
        ]
    }

    #[test]
    fn test_is_scalable_rules() {
        let rules = RulesConfig::default();
        // Below 10 g: never scalable.
        assert!(!is_scalable(&item("Rice, white, raw", 360.0, FoodGroup::Carbohydrate, 8.0), &rules));
        // Small condiment: pinned.
        assert!(!is_scalable(&item("Garlic, clove", 149.0, FoodGroup::Vegetable, 15.0), &rules));
        // Sub-portion fat: pinned. (10 g oil passes the 5 g fat floor but
        // fails every scalable pattern.)
        assert!(!is_scalable(&item("Olive oil", 884.0, FoodGroup::Fat, 4.0), &rules));
        assert!(!is_scalable(&item("Olive oil", 884.0, FoodGroup::Fat, 10.0), &rules));
        // Single egg: pinned.
        assert!(!is_scalable(&item("Egg, whole, raw", 155.0, FoodGroup::Protein, 60.0), &rules));
        // Staple carb: scalable even at small sizes.
        assert!(is_scalable(&item("Rice, white, raw", 360.0, FoodGroup::Carbohydrate, 15.0), &rules));
        // Generic item at 20 g or more: scalable.
        assert!(is_scalable(&item("Tomato, ripe", 18.0, FoodGroup::Vegetable, 60.0), &rules));
    }

    #[test]
    fn test_calibrate_day_converges_upward() {
        let rules = RulesConfig::default();
        let meals = day(); // ~587 kcal lunch + ~322 dinner = ~909
        let target = 1200.0;
        let calibrated = calibrate_day(&meals, target, &rules);
        let total = total_day_kcal(&calibrated);
        assert!(
            (total - target).abs() <= rules.calibration.outer_band * target,
            "total {} not within 5% of {}",
            total,
            target
        );
    }

    #[test]
    fn test_calibrate_day_converges_downward() {
        let rules = RulesConfig::default();
        let meals = day();
        let target = 700.0;
        let calibrated = calibrate_day(&meals, target, &rules);
        let total = total_day_kcal(&calibrated);
        assert!((total - target).abs() <= rules.calibration.outer_band * target);
    }

    #[test]
    fn test_calibration_respects_caps() {
        let rules = RulesConfig::default();
        let meals = day();
        let calibrated = calibrate_day(&meals, 4000.0, &rules);
        for meal in &calibrated {
            for item in &meal.items {
                let cap = rules.hard_cap(&item.food.name, item.group);
                assert!(item.quantity_g <= cap + 1e-3);
            }
        }
    }

    #[test]
    fn test_force_adjust_fills_remaining_gap() {
        let rules = RulesConfig::default();
        // A day the proportional loop cannot fix: only the staple carb
        // is scalable.
        let meals = vec![Meal {
            label: "Lunch".to_string(),
            slot: MealSlot::Lunch,
            items: vec![
                item("Egg, whole, raw", 155.0, FoodGroup::Protein, 60.0),
                item("Rice, white, raw", 360.0, FoodGroup::Carbohydrate, 50.0),
                item("Olive oil", 884.0, FoodGroup::Fat, 10.0),
            ],
        }];
        let target = 600.0;
        let adjusted = force_adjust(&meals, target, &rules);
        let total = total_day_kcal(&adjusted);
        assert!(
            (total - target).abs() <= rules.calibration.outer_band * target,
            "total {}",
            total
        );
    }

    #[test]
    fn test_force_adjust_noop_when_within_band() {
        let rules = RulesConfig::default();
        let meals = day();
        let target = total_day_kcal(&meals);
        let adjusted = force_adjust(&meals, target, &rules);
        assert_eq!(total_day_kcal(&adjusted), target);
    }

    #[test]
    fn test_empty_day_does_not_loop() {
        let rules = RulesConfig::default();
        let calibrated = calibrate_day(&[], 2000.0, &rules);
        assert!(calibrated.is_empty());
        let adjusted = force_adjust(&[], 2000.0, &rules);
        assert!(adjusted.is_empty());
    }
}
