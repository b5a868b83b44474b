//! End-of-pipeline aggregation: per-meal and per-day nutrient totals
//! from net raw quantities. Values are summed at full precision and
//! rounded exactly once, here, to avoid floating-point drift across
//! additions.

use serde::{Deserialize, Serialize};

use crate::catalog::Micronutrients;
use crate::model::Meal;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NutrientTotals {
    pub energy_kcal: f32,
    pub protein_g: f32,
    pub fat_g: f32,
    pub carbohydrate_g: f32,
    pub fiber_g: f32,
    pub micros: Micronutrients,
}

impl NutrientTotals {
    /// Rounding discipline: calories to the integer, macros to one
    /// decimal, micros to two.
    pub fn rounded(&self) -> NutrientTotals {
        let macro1 = |v: f32| (v * 10.0).round() / 10.0;
        NutrientTotals {
            energy_kcal: self.energy_kcal.round(),
            protein_g: macro1(self.protein_g),
            fat_g: macro1(self.fat_g),
            carbohydrate_g: macro1(self.carbohydrate_g),
            fiber_g: macro1(self.fiber_g),
            micros: self.micros.rounded(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct MealStats {
    pub label: String,
    pub totals: NutrientTotals,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DailyStats {
    pub per_meal: Vec<MealStats>,
    pub totals: NutrientTotals,
}

fn sum_meal(meal: &Meal) -> NutrientTotals {
    let mut totals = NutrientTotals::default();
    for item in &meal.items {
        let scale = item.quantity_g / 100.0;
        totals.energy_kcal += item.food.energy_kcal * scale;
        totals.protein_g += item.food.protein_g * scale;
        totals.fat_g += item.food.fat_g * scale;
        totals.carbohydrate_g += item.food.carbohydrate_g * scale;
        totals.fiber_g += item.food.fiber_g * scale;
        totals.micros.add_scaled(&item.food.micros, scale);
    }
    totals
}

/// Aggregates the day. Per-meal and day totals are each rounded once
/// from their full-precision sums.
pub fn aggregate_day(meals: &[Meal]) -> DailyStats {
    let mut day = NutrientTotals::default();
    let mut per_meal = Vec::with_capacity(meals.len());
    for meal in meals {
        let totals = sum_meal(meal);
        day.energy_kcal += totals.energy_kcal;
        day.protein_g += totals.protein_g;
        day.fat_g += totals.fat_g;
        day.carbohydrate_g += totals.carbohydrate_g;
        day.fiber_g += totals.fiber_g;
        day.micros.add_scaled(&totals.micros, 1.0);
        per_meal.push(MealStats {
            label: meal.label.clone(),
            totals: totals.rounded(),
        });
    }
    DailyStats {
        per_meal,
        totals: day.rounded(),
    }
}

/// One advisory per micronutrient whose daily total falls below its
/// prescribed floor.
pub fn micro_floor_warnings(totals: &NutrientTotals, floors: &Micronutrients) -> Vec<String> {
    totals
        .micros
        .named_fields()
        .into_iter()
        .zip(floors.named_fields())
        .filter(|((_, actual), (_, floor))| *floor > 0.0 && actual < floor)
        .map(|((name, actual), (_, floor))| {
            format!(
                "Daily {} of {:.2} is below the prescribed floor of {:.2}.",
                name.replace('_', " "),
                actual,
                floor
            )
        })
        .collect()
}
