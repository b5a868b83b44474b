//! Portion bounding and calorie redistribution. Every ingredient is
//! clamped to a realistic hard cap; calories lost to clamping are
//! redistributed within the meal onto items with headroom, staple
//! carbohydrates first, then by descending energy density.

use crate::model::Meal;
use crate::rules::RulesConfig;

/// Headroom below which an item is not worth redistributing onto.
const MIN_HEADROOM_G: f32 = 20.0;

fn bound_meal(meal: &Meal, rules: &RulesConfig) -> Meal {
    let mut out = meal.clone();
    let mut overflow_kcal = 0.0_f32;

    for item in &mut out.items {
        let cap = rules.hard_cap(&item.food.name, item.group);
        if item.quantity_g > cap {
            overflow_kcal += item.food.kcal_for(item.quantity_g - cap);
            item.quantity_g = cap;
        }
    }

    if overflow_kcal <= 0.0 {
        return out;
    }

    // Receiver order: staple carbs first, then energy-dense items.
    let mut order: Vec<usize> = (0..out.items.len()).collect();
    order.sort_by(|&a, &b| {
        let item_a = &out.items[a];
        let item_b = &out.items[b];
        let staple_a = rules.is_staple_carb(&item_a.food.name);
        let staple_b = rules.is_staple_carb(&item_b.food.name);
        staple_b
            .cmp(&staple_a)
            .then_with(|| {
                item_b
                    .food
                    .energy_kcal
                    .partial_cmp(&item_a.food.energy_kcal)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });

    for idx in order {
        if overflow_kcal <= 0.0 {
            break;
        }
        let item = &mut out.items[idx];
        if item.food.energy_kcal <= 0.0 {
            continue;
        }
        let cap = rules.hard_cap(&item.food.name, item.group);
        let headroom = cap - item.quantity_g;
        if headroom < MIN_HEADROOM_G {
            continue;
        }
        let wanted_g = overflow_kcal / (item.food.energy_kcal / 100.0);
        let add_g = wanted_g.min(headroom);
        item.quantity_g += add_g;
        overflow_kcal -= item.food.kcal_for(add_g);
    }
    // Unabsorbed overflow is dropped here; calibration recovers it if
    // the day ends up short.

    out
}

/// Pure stage: clamps and redistributes every meal of the day.
pub fn bound_portions(meals: &[Meal], rules: &RulesConfig) -> Vec<Meal> {
    meals.iter().map(|m| bound_meal(m, rules)).collect()
}
