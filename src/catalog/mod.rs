pub mod data_loader;
pub mod food_groups;

use serde::{Deserialize, Serialize};

/// Per-100g micronutrient values. Milligrams unless the field name says µg.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct Micronutrients {
    pub calcium_mg: f32,
    pub iron_mg: f32,
    pub zinc_mg: f32,
    pub magnesium_mg: f32,
    pub potassium_mg: f32,
    pub sodium_mg: f32,
    pub vitamin_c_mg: f32,
    pub vitamin_a_ug: f32,
    pub folate_ug: f32,
    pub vitamin_b12_ug: f32,
}

macro_rules! for_each_micro {
    ($macro:ident) => {
        $macro!(calcium_mg);
        $macro!(iron_mg);
        $macro!(zinc_mg);
        $macro!(magnesium_mg);
        $macro!(potassium_mg);
        $macro!(sodium_mg);
        $macro!(vitamin_c_mg);
        $macro!(vitamin_a_ug);
        $macro!(folate_ug);
        $macro!(vitamin_b12_ug);
    };
}

impl Micronutrients {
    /// Adds `other * scale` into `self` field by field.
    pub fn add_scaled(&mut self, other: &Micronutrients, scale: f32) {
        macro_rules! add_field {
            ($field:ident) => {
                self.$field += other.$field * scale;
            };
        }
        for_each_micro!(add_field);
    }

    /// Returns a copy with every field rounded to two decimals.
    pub fn rounded(&self) -> Micronutrients {
        let mut out = *self;
        macro_rules! round_field {
            ($field:ident) => {
                out.$field = (out.$field * 100.0).round() / 100.0;
            };
        }
        for_each_micro!(round_field);
        out
    }

    /// Field name / value pairs, used for floor advisories.
    pub fn named_fields(&self) -> Vec<(&'static str, f32)> {
        let mut out = Vec::with_capacity(10);
        macro_rules! push_field {
            ($field:ident) => {
                out.push((stringify!($field), self.$field));
            };
        }
        for_each_micro!(push_field);
        out
    }
}

/// Immutable catalog entry. All nutrient values are per 100 g of net raw
/// edible weight. `waste_factor` converts edible weight to as-purchased
/// weight (>= 1.0).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FoodItem {
    pub id: u32,
    pub name: String,
    pub energy_kcal: f32,
    pub protein_g: f32,
    pub fat_g: f32,
    pub carbohydrate_g: f32,
    pub fiber_g: f32,
    pub micros: Micronutrients,
    pub waste_factor: f32,
}

impl FoodItem {
    /// Calories contributed by `grams` of this food.
    pub fn kcal_for(&self, grams: f32) -> f32 {
        grams / 100.0 * self.energy_kcal
    }
}
