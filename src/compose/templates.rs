//! Built-in recipe template store. A static pool covering the four meal
//! slots; the snack pool includes the normalized dessert templates.

use crate::catalog::food_groups::FoodGroup;
use crate::model::{IngredientRole, MealSlot, RecipeTemplate, RiskMarker};

fn role(group: FoodGroup, terms: &[&str], weight: f32) -> IngredientRole {
    IngredientRole {
        group,
        candidate_terms: terms.iter().map(|s| s.to_string()).collect(),
        relative_weight: weight,
    }
}

pub fn builtin_templates() -> Vec<RecipeTemplate> {
    use FoodGroup::*;
    use MealSlot::*;

    vec![
        RecipeTemplate {
            id: 1,
            name: "Oatmeal with milk and fruit".to_string(),
            slots: vec![Breakfast],
            risk_markers: vec![],
            roles: vec![
                role(Carbohydrate, &["oat", "oatmeal"], 3.0),
                role(Dairy, &["milk"], 2.0),
                role(Fruit, &["banana", "apple"], 1.0),
            ],
        },
        RecipeTemplate {
            id: 2,
            name: "Scrambled eggs with toast".to_string(),
            slots: vec![Breakfast],
            risk_markers: vec![],
            roles: vec![
                role(Protein, &["egg"], 2.0),
                role(Carbohydrate, &["bread"], 2.0),
                role(Vegetable, &["tomato"], 1.0),
                role(Fat, &["olive oil", "oil"], 0.5),
            ],
        },
        RecipeTemplate {
            id: 3,
            name: "Grilled chicken with rice and salad".to_string(),
            slots: vec![Lunch, Dinner],
            risk_markers: vec![],
            roles: vec![
                role(Protein, &["chicken breast", "chicken"], 3.0),
                role(Carbohydrate, &["rice"], 3.0),
                role(Vegetable, &["tomato"], 1.0),
                role(Vegetable, &["onion"], 0.5),
                role(Fat, &["olive oil", "oil"], 0.5),
            ],
        },
        RecipeTemplate {
            id: 4,
            name: "Baked fish with potatoes".to_string(),
            slots: vec![Lunch, Dinner],
            risk_markers: vec![],
            roles: vec![
                role(Protein, &["hake", "cod", "fish"], 3.0),
                role(Carbohydrate, &["potato"], 3.0),
                role(Vegetable, &["carrot", "tomato"], 1.0),
                role(Fat, &["olive oil", "oil"], 0.5),
            ],
        },
        RecipeTemplate {
            id: 5,
            name: "Lentil stew".to_string(),
            slots: vec![Lunch, Dinner],
            risk_markers: vec![],
            roles: vec![
                role(Protein, &["lentil"], 3.0),
                role(Carbohydrate, &["rice", "potato"], 2.0),
                role(Vegetable, &["tomato"], 1.0),
                role(Vegetable, &["onion"], 0.5),
            ],
        },
        RecipeTemplate {
            id: 6,
            name: "Pasta with tomato and cheese".to_string(),
            slots: vec![Lunch, Dinner],
            risk_markers: vec![RiskMarker::HighSodium],
            roles: vec![
                role(Carbohydrate, &["pasta", "noodle"], 3.0),
                role(Dairy, &["cheese"], 1.5),
                role(Vegetable, &["tomato"], 1.5),
                role(Fat, &["olive oil", "oil"], 0.5),
            ],
        },
        RecipeTemplate {
            id: 7,
            name: "Beef stew with vegetables".to_string(),
            slots: vec![Lunch, Dinner],
            risk_markers: vec![RiskMarker::HighFat, RiskMarker::HighPurine],
            roles: vec![
                role(Protein, &["beef"], 3.0),
                role(Carbohydrate, &["potato"], 2.0),
                role(Vegetable, &["carrot"], 1.0),
                role(Vegetable, &["onion"], 0.5),
                role(Fat, &["olive oil", "oil"], 0.5),
            ],
        },
        RecipeTemplate {
            id: 8,
            name: "Cured ham sandwich".to_string(),
            slots: vec![Snack],
            risk_markers: vec![RiskMarker::HighSodium],
            roles: vec![
                role(Carbohydrate, &["bread"], 2.0),
                role(Protein, &["ham"], 1.0),
                role(Vegetable, &["tomato"], 0.5),
            ],
        },
        RecipeTemplate {
            id: 9,
            name: "Yogurt with fruit".to_string(),
            slots: vec![Snack],
            risk_markers: vec![],
            roles: vec![
                role(Dairy, &["yogurt"], 2.0),
                role(Fruit, &["apple", "banana"], 1.0),
            ],
        },
        RecipeTemplate {
            id: 10,
            name: "Fruit with nuts".to_string(),
            slots: vec![Snack],
            risk_markers: vec![],
            roles: vec![
                role(Fruit, &["apple", "banana", "pear"], 2.0),
                role(Fat, &["walnut", "almond"], 1.0),
            ],
        },
        // Dessert subset, normalized into the snack pool.
        RecipeTemplate {
            id: 11,
            name: "Rice pudding".to_string(),
            slots: vec![Snack],
            risk_markers: vec![],
            roles: vec![
                role(Carbohydrate, &["rice"], 2.0),
                role(Dairy, &["milk"], 2.0),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_slot_has_templates() {
        let templates = builtin_templates();
        for slot in [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner, MealSlot::Snack] {
            assert!(
                templates.iter().any(|t| t.slots.contains(&slot)),
                "no template for {:?}",
                slot
            );
        }
    }

    #[test]
    fn test_template_ids_unique() {
        let templates = builtin_templates();
        let mut ids: Vec<u32> = templates.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), templates.len());
    }

    #[test]
    fn test_weights_positive() {
        for template in builtin_templates() {
            for role in &template.roles {
                assert!(role.relative_weight > 0.0, "{}", template.name);
            }
        }
    }
}
