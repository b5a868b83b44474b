use serde::{Deserialize, Serialize};

/// Closed set of coarse food categories used for plate balancing and
/// portion capping. Name-pattern classification goes through
/// [`GroupLexicon`] so matching stays in one place.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FoodGroup {
    Protein,
    Carbohydrate,
    Vegetable,
    Fruit,
    Dairy,
    Fat,
    Other,
}

/// Synonym registry mapping each food group to lowercase name fragments.
/// Built once inside `RulesConfig`; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct GroupLexicon {
    patterns: Vec<(FoodGroup, Vec<String>)>,
}

impl GroupLexicon {
    pub fn new(patterns: Vec<(FoodGroup, Vec<String>)>) -> Self {
        Self { patterns }
    }

    /// True when `name` matches any fragment registered for `group`.
    pub fn matches(&self, group: FoodGroup, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.patterns
            .iter()
            .filter(|(g, _)| *g == group)
            .any(|(_, terms)| terms.iter().any(|t| lower.contains(t.as_str())))
    }

    /// First group whose fragment list matches `name`, in registration
    /// order. Registration order therefore decides ties ("olive oil" is
    /// fat, not vegetable).
    pub fn detect(&self, name: &str) -> Option<FoodGroup> {
        let lower = name.to_lowercase();
        self.patterns
            .iter()
            .find(|(_, terms)| terms.iter().any(|t| lower.contains(t.as_str())))
            .map(|(g, _)| *g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> GroupLexicon {
        GroupLexicon::new(vec![
            (
                FoodGroup::Fat,
                vec!["oil".to_string(), "butter".to_string()],
            ),
            (
                FoodGroup::Protein,
                vec!["chicken".to_string(), "egg".to_string()],
            ),
            (
                FoodGroup::Vegetable,
                vec!["tomato".to_string(), "onion".to_string()],
            ),
        ])
    }

    #[test]
    fn test_detect_respects_registration_order() {
        let lex = lexicon();
        assert_eq!(lex.detect("Olive oil"), Some(FoodGroup::Fat));
        assert_eq!(lex.detect("Chicken breast, raw"), Some(FoodGroup::Protein));
        assert_eq!(lex.detect("Quinoa"), None);
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let lex = lexicon();
        assert!(lex.matches(FoodGroup::Vegetable, "TOMATO, ripe"));
        assert!(!lex.matches(FoodGroup::Vegetable, "Chicken breast"));
    }
}
