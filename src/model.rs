use serde::{Deserialize, Serialize};

use crate::catalog::food_groups::FoodGroup;
use crate::catalog::{FoodItem, Micronutrients};
use crate::plan_aggregator::DailyStats;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    /// Snacks are exempt from the balanced-plate guarantee.
    pub fn is_main(&self) -> bool {
        !matches!(self, MealSlot::Snack)
    }
}

/// Medical-risk marker a recipe template can carry. Templates with an
/// active marker are excluded for matching pathologies during
/// composition.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskMarker {
    HighSodium,
    HighFat,
    HighPurine,
}

/// Abstract ingredient slot inside a recipe template. `relative_weight`
/// is a dimensionless share of the meal's calorie budget, not grams.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IngredientRole {
    pub group: FoodGroup,
    pub candidate_terms: Vec<String>,
    pub relative_weight: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecipeTemplate {
    pub id: u32,
    pub name: String,
    pub slots: Vec<MealSlot>,
    #[serde(default)]
    pub risk_markers: Vec<RiskMarker>,
    pub roles: Vec<IngredientRole>,
}

/// One concrete ingredient of a composed meal. `quantity_g` is always
/// the net raw edible weight; gross/cooked weights are display values
/// derived at the end of the pipeline and never feed back into nutrient
/// math.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MealItem {
    pub food: FoodItem,
    pub group: FoodGroup,
    pub quantity_g: f32,
    pub gross_quantity_g: Option<f32>,
    pub cooked_quantity_g: Option<f32>,
}

impl MealItem {
    pub fn new(food: FoodItem, group: FoodGroup, quantity_g: f32) -> Self {
        Self {
            food,
            group,
            quantity_g,
            gross_quantity_g: None,
            cooked_quantity_g: None,
        }
    }

    pub fn energy_kcal(&self) -> f32 {
        self.food.kcal_for(self.quantity_g)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Meal {
    pub label: String,
    pub slot: MealSlot,
    pub items: Vec<MealItem>,
}

impl Meal {
    pub fn total_kcal(&self) -> f32 {
        self.items.iter().map(|i| i.energy_kcal()).sum()
    }
}

pub fn total_day_kcal(meals: &[Meal]) -> f32 {
    meals.iter().map(|m| m.total_kcal()).sum()
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct MacroSplit {
    pub protein_pct: f32,
    pub carbs_pct: f32,
    pub fat_pct: f32,
}

impl Default for MacroSplit {
    fn default() -> Self {
        Self {
            protein_pct: 20.0,
            carbs_pct: 50.0,
            fat_pct: 30.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NutritionalGoals {
    pub target_kcal: f32,
    #[serde(default)]
    pub macro_split: MacroSplit,
    #[serde(default)]
    pub micro_floors: Option<Micronutrients>,
}

impl NutritionalGoals {
    pub fn with_target(target_kcal: f32) -> Self {
        Self {
            target_kcal,
            macro_split: MacroSplit::default(),
            micro_floors: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AllergySeverity {
    Fatal,
    Intolerance,
    Preference,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Allergy {
    pub allergen: String,
    pub severity: AllergySeverity,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextureRequirement {
    #[default]
    Normal,
    Minced,
    Puree,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PatientType {
    #[default]
    Adult,
    Elderly,
    #[serde(alias = "pediatrico")]
    Child,
}

/// Named meal moment of the day. `calorie_share` is this moment's slice
/// of the daily target; shares are not required to sum to 1.0 (caller's
/// responsibility).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MealMoment {
    pub label: String,
    pub slot: MealSlot,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub calorie_share: f32,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PatientProfile {
    #[serde(default)]
    pub allergies: Vec<Allergy>,
    #[serde(default)]
    pub pathologies: Vec<String>,
    #[serde(default)]
    pub texture: TextureRequirement,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub patient_type: PatientType,
    #[serde(default)]
    pub disliked_foods: Vec<String>,
    pub meal_moments: Vec<MealMoment>,
}

impl Default for PatientProfile {
    fn default() -> Self {
        Self {
            allergies: Vec::new(),
            pathologies: Vec::new(),
            texture: TextureRequirement::Normal,
            medications: Vec::new(),
            patient_type: PatientType::Adult,
            disliked_foods: Vec::new(),
            meal_moments: vec![
                MealMoment {
                    label: "Breakfast".to_string(),
                    slot: MealSlot::Breakfast,
                    enabled: true,
                    calorie_share: 0.25,
                },
                MealMoment {
                    label: "Lunch".to_string(),
                    slot: MealSlot::Lunch,
                    enabled: true,
                    calorie_share: 0.35,
                },
                MealMoment {
                    label: "Dinner".to_string(),
                    slot: MealSlot::Dinner,
                    enabled: true,
                    calorie_share: 0.25,
                },
                MealMoment {
                    label: "Snack".to_string(),
                    slot: MealSlot::Snack,
                    enabled: true,
                    calorie_share: 0.15,
                },
            ],
        }
    }
}

/// Final output of one generation request. Constructed fresh per call;
/// never cached.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DailyPlan {
    pub day_label: String,
    pub meals: Vec<Meal>,
    pub stats: DailyStats,
    pub goals: NutritionalGoals,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Micronutrients;

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

    #[test]
    fn test_meal_total_kcal() {
        let meal = Meal {
            label: "Lunch".to_string(),
            slot: MealSlot::Lunch,
            items: vec![
                MealItem::new(food("Rice, white, raw", 360.0), FoodGroup::Carbohydrate, 100.0),
                MealItem::new(food("Tomato", 18.0), FoodGroup::Vegetable, 50.0),
            ],
        };
        assert_eq!(meal.total_kcal(), 369.0);
    }

    #[test]
    fn test_snack_is_not_main() {
        assert!(!MealSlot::Snack.is_main());
        assert!(MealSlot::Breakfast.is_main());
    }

    #[test]
    fn test_patient_type_pediatric_alias() {
        let t: PatientType = serde_json::from_str("\"pediatrico\"").unwrap();
        assert_eq!(t, PatientType::Child);
    }

    #[test]
    fn test_default_profile_moment_shares() {
        let profile = PatientProfile::default();
        let total: f32 = profile.meal_moments.iter().map(|m| m.calorie_share).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }
}
