use crate::catalog::food_groups::{FoodGroup, GroupLexicon};

/// Group-specific disambiguation preference applied when a search term
/// matches several catalog entries. The first rule whose `term_fragment`
/// appears in the search term wins if some candidate contains
/// `prefer_fragment`.
#[derive(Debug, Clone)]
pub struct DisambiguationRule {
    pub term_fragment: String,
    pub prefer_fragment: String,
}

/// Synthetic ingredient used to satisfy the balanced-plate guarantee
/// when a meal is missing a required group.
#[derive(Debug, Clone)]
pub struct FillerSpec {
    pub group: FoodGroup,
    pub candidate_terms: Vec<String>,
    pub role_weight: f32,
    pub default_grams: f32,
}

#[derive(Debug, Clone)]
pub struct PlatingRules {
    pub round_step_g: f32,
    pub protein_floor_g: f32,
    pub vegetable_floor_g: f32,
    pub fat_cap_g: f32,
    pub tiny_carb_threshold_g: f32,
}

#[derive(Debug, Clone)]
pub struct CalibrationRules {
    pub max_iterations: u32,
    /// Stop band of the main loop, as a fraction of the target.
    pub inner_band: f32,
    /// User-facing tolerance band, as a fraction of the target.
    pub outer_band: f32,
    /// Iterations rounded to 5 g before switching to 1 g steps.
    pub coarse_iterations: u32,
    pub min_scalable_g: f32,
    pub force_floor_g: f32,
    pub last_resort_floor_g: f32,
}

#[derive(Debug, Clone)]
pub struct VolumeRules {
    /// Estimated millilitres per gram of food.
    pub density_ml_per_g: f32,
    /// Overshoot tolerated before the pre-calibration clamp kicks in.
    pub clamp_slack_ml: f32,
    /// Overshoot tolerated by the post-calibration audit.
    pub audit_slack_ml: f32,
    pub child_ceiling_ml: f32,
    pub elderly_ceiling_ml: f32,
    pub adult_ceiling_ml: f32,
}

#[derive(Debug, Clone)]
pub struct YieldRules {
    /// Name fragments indicating the food is already in a prepared state.
    pub prepared_markers: Vec<String>,
    pub grain_factor: f32,
    pub legume_factor: f32,
    pub tuber_factor: f32,
    pub protein_factor: f32,
    pub vegetable_factor: f32,
}

/// Immutable rule tables injected into every pipeline stage. Swappable
/// per region or clinical guideline without code changes; the defaults
/// below encode the practitioner conventions the engine ships with.
#[derive(Debug, Clone)]
pub struct RulesConfig {
    pub lexicon: GroupLexicon,
    /// Fragments that disqualify a candidate when resolving a solid-food
    /// role (keeps juices and flours out of solid slots).
    pub solid_denylist: Vec<String>,
    pub disambiguation: Vec<DisambiguationRule>,
    /// Specific-ingredient caps checked before group caps. Grams.
    pub specific_caps: Vec<(String, f32)>,
    pub group_caps: Vec<(FoodGroup, f32)>,
    pub default_cap_g: f32,
    pub fillers: Vec<FillerSpec>,
    pub staple_carb_terms: Vec<String>,
    pub main_protein_terms: Vec<String>,
    pub condiment_terms: Vec<String>,
    pub egg_terms: Vec<String>,
    pub grain_terms: Vec<String>,
    pub legume_terms: Vec<String>,
    pub tuber_terms: Vec<String>,
    pub plating: PlatingRules,
    pub calibration: CalibrationRules,
    pub volume: VolumeRules,
    pub yields: YieldRules,
    pub min_viable_target_kcal: f32,
}

fn strings(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|s| s.to_string()).collect()
}

fn contains_any(name_lower: &str, terms: &[String]) -> bool {
    terms.iter().any(|t| name_lower.contains(t.as_str()))
}

impl RulesConfig {
    /// Hard portion cap for an item: specific name pattern first, then
    /// group default, then the global default.
    pub fn hard_cap(&self, food_name: &str, group: FoodGroup) -> f32 {
        let lower = food_name.to_lowercase();
        if let Some((_, cap)) = self
            .specific_caps
            .iter()
            .find(|(pattern, _)| lower.contains(pattern.as_str()))
        {
            return *cap;
        }
        if let Some((_, cap)) = self.group_caps.iter().find(|(g, _)| *g == group) {
            return *cap;
        }
        self.default_cap_g
    }

    pub fn is_staple_carb(&self, food_name: &str) -> bool {
        contains_any(&food_name.to_lowercase(), &self.staple_carb_terms)
    }

    pub fn is_main_protein(&self, food_name: &str) -> bool {
        contains_any(&food_name.to_lowercase(), &self.main_protein_terms)
    }

    pub fn is_condiment(&self, food_name: &str) -> bool {
        contains_any(&food_name.to_lowercase(), &self.condiment_terms)
    }

    pub fn is_whole_egg(&self, food_name: &str) -> bool {
        contains_any(&food_name.to_lowercase(), &self.egg_terms)
    }

    pub fn filler_for(&self, group: FoodGroup) -> Option<&FillerSpec> {
        self.fillers.iter().find(|f| f.group == group)
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        // Registration order decides lexicon ties: fat before vegetable
        // so "olive oil" never reads as produce, protein before dairy so
        // "chicken in milk sauce" stays a protein.
        let lexicon = GroupLexicon::new(vec![
            (
                FoodGroup::Fat,
                strings(&[
                    "oil", "butter", "margarine", "lard", "mayonnaise", "walnut", "almond",
                    "hazelnut", "cashew", "peanut", "avocado",
                ]),
            ),
            (
                FoodGroup::Protein,
                strings(&[
                    "chicken", "beef", "pork", "turkey", "fish", "hake", "cod", "salmon", "tuna",
                    "sardine", "egg", "lentil", "bean", "chickpea", "tofu", "ham",
                ]),
            ),
            (
                FoodGroup::Dairy,
                strings(&["milk", "cheese", "yogurt", "curd", "kefir", "cream"]),
            ),
            (
                FoodGroup::Carbohydrate,
                strings(&[
                    "rice", "potato", "pasta", "noodle", "bread", "oat", "quinoa", "couscous",
                    "barley", "corn", "tortilla", "cracker", "cereal", "flour", "cassava",
                ]),
            ),
            (
                FoodGroup::Vegetable,
                strings(&[
                    "tomato", "onion", "carrot", "spinach", "lettuce", "broccoli", "zucchini",
                    "pepper", "cabbage", "cucumber", "pumpkin", "green bean", "chard", "celery",
                    "garlic", "beet", "cauliflower", "leek",
                ]),
            ),
            (
                FoodGroup::Fruit,
                strings(&[
                    "apple", "banana", "orange", "pear", "strawberry", "grape", "melon", "peach",
                    "mango", "kiwi", "plum", "pineapple",
                ]),
            ),
        ]);

        Self {
            lexicon,
            solid_denylist: strings(&[
                "juice", "drink", "beverage", "nectar", "flour", "milkshake", "smoothie", "soup",
            ]),
            disambiguation: vec![
                DisambiguationRule {
                    term_fragment: "potato".to_string(),
                    prefer_fragment: "white".to_string(),
                },
                DisambiguationRule {
                    term_fragment: "rice".to_string(),
                    prefer_fragment: "white".to_string(),
                },
                DisambiguationRule {
                    term_fragment: "chicken".to_string(),
                    prefer_fragment: "breast".to_string(),
                },
            ],
            specific_caps: vec![
                ("protein powder".to_string(), 30.0),
                ("oat".to_string(), 120.0),
                ("rice".to_string(), 250.0),
                ("pasta".to_string(), 250.0),
                ("noodle".to_string(), 250.0),
                ("bread".to_string(), 150.0),
                ("potato".to_string(), 250.0),
                ("granola".to_string(), 60.0),
                ("cacao".to_string(), 20.0),
                ("walnut".to_string(), 40.0),
                ("almond".to_string(), 40.0),
                ("hazelnut".to_string(), 40.0),
                ("cashew".to_string(), 40.0),
            ],
            group_caps: vec![
                (FoodGroup::Fruit, 200.0),
                (FoodGroup::Dairy, 250.0),
                (FoodGroup::Fat, 15.0),
                (FoodGroup::Vegetable, 150.0),
            ],
            default_cap_g: 500.0,
            fillers: vec![
                FillerSpec {
                    group: FoodGroup::Protein,
                    candidate_terms: strings(&["egg", "chicken breast", "chicken", "lentil"]),
                    role_weight: 1.0,
                    default_grams: 80.0,
                },
                FillerSpec {
                    group: FoodGroup::Carbohydrate,
                    candidate_terms: strings(&["rice", "potato", "bread"]),
                    role_weight: 1.0,
                    default_grams: 100.0,
                },
                FillerSpec {
                    group: FoodGroup::Vegetable,
                    candidate_terms: strings(&["tomato", "carrot", "onion"]),
                    role_weight: 1.0,
                    default_grams: 100.0,
                },
            ],
            staple_carb_terms: strings(&[
                "rice", "potato", "pasta", "noodle", "bread", "oat", "couscous", "quinoa",
            ]),
            main_protein_terms: strings(&[
                "chicken", "beef", "pork", "turkey", "fish", "hake", "cod", "salmon", "tuna",
            ]),
            condiment_terms: strings(&["salt", "garlic", "pepper", "spice", "herb", "vinegar"]),
            egg_terms: strings(&["egg"]),
            grain_terms: strings(&["rice", "pasta", "noodle", "oat", "quinoa", "barley", "couscous"]),
            legume_terms: strings(&["lentil", "bean", "chickpea"]),
            tuber_terms: strings(&["potato", "cassava", "yam"]),
            plating: PlatingRules {
                round_step_g: 5.0,
                protein_floor_g: 80.0,
                vegetable_floor_g: 30.0,
                fat_cap_g: 15.0,
                tiny_carb_threshold_g: 30.0,
            },
            calibration: CalibrationRules {
                max_iterations: 10,
                inner_band: 0.02,
                outer_band: 0.05,
                coarse_iterations: 6,
                min_scalable_g: 15.0,
                force_floor_g: 40.0,
                last_resort_floor_g: 15.0,
            },
            volume: VolumeRules {
                density_ml_per_g: 1.2,
                clamp_slack_ml: 20.0,
                audit_slack_ml: 50.0,
                child_ceiling_ml: 300.0,
                elderly_ceiling_ml: 400.0,
                adult_ceiling_ml: 600.0,
            },
            yields: YieldRules {
                prepared_markers: strings(&[
                    "cooked", "grilled", "steamed", "boiled", "roasted", "baked", "fried",
                ]),
                grain_factor: 2.5,
                legume_factor: 2.8,
                tuber_factor: 1.05,
                protein_factor: 0.78,
                vegetable_factor: 0.9,
            },
            min_viable_target_kcal: 1000.0,
        }
    }
}

impl VolumeRules {
    pub fn ceiling_ml(&self, patient_type: crate::model::PatientType) -> f32 {
        use crate::model::PatientType;
        match patient_type {
            PatientType::Child => self.child_ceiling_ml,
            PatientType::Elderly => self.elderly_ceiling_ml,
            PatientType::Adult => self.adult_ceiling_ml,
        }
    }
}

/// Rounds to the nearest multiple of `step`. Used by plating, the
/// calibration loop, and the gastric clamp.
pub fn round_to_step(value: f32, step: f32) -> f32 {
    (value / step).round() * step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_cap_specific_beats_group() {
        let rules = RulesConfig::default();
        // "potato" has a specific 250 g cap even though Carbohydrate has
        // no group cap.
        assert_eq!(rules.hard_cap("Potato, white, raw", FoodGroup::Carbohydrate), 250.0);
        assert_eq!(rules.hard_cap("Tomato, ripe", FoodGroup::Vegetable), 150.0);
        assert_eq!(rules.hard_cap("Chicken breast, raw", FoodGroup::Protein), 500.0);
    }

    #[test]
    fn test_group_cap_fat() {
        let rules = RulesConfig::default();
        assert_eq!(rules.hard_cap("Olive oil", FoodGroup::Fat), 15.0);
    }

    #[test]
    fn test_staple_and_condiment_detection() {
        let rules = RulesConfig::default();
        assert!(rules.is_staple_carb("Rice, white, raw"));
        assert!(!rules.is_staple_carb("Tomato"));
        assert!(rules.is_condiment("Garlic, clove"));
    }

    #[test]
    fn test_round_to_step() {
        assert_eq!(round_to_step(82.4, 5.0), 80.0);
        assert_eq!(round_to_step(82.5, 5.0), 85.0);
        assert_eq!(round_to_step(17.3, 1.0), 17.0);
    }

    #[test]
    fn test_caps_are_step_aligned() {
        // Calibration rounds capped values to 5 g; a cap off the 5 g grid
        // could round above itself.
        let rules = RulesConfig::default();
        for (_, cap) in &rules.specific_caps {
            assert_eq!(cap % 5.0, 0.0);
        }
        for (_, cap) in &rules.group_caps {
            assert_eq!(cap % 5.0, 0.0);
        }
        assert_eq!(rules.default_cap_g % 5.0, 0.0);
    }
}
