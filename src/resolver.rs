//! Maps an abstract ingredient role (candidate search terms + food
//! group) to one concrete catalog entry.

use crate::catalog::food_groups::FoodGroup;
use crate::catalog::FoodItem;
use crate::rules::RulesConfig;

/// Groups whose roles must resolve to solid foods; the denylist keeps
/// juices, flours and other liquids out of these slots.
fn is_solid_group(group: FoodGroup) -> bool {
    matches!(
        group,
        FoodGroup::Protein | FoodGroup::Carbohydrate | FoodGroup::Vegetable | FoodGroup::Fruit
    )
}

/// Resolves candidate terms against the catalog, in order:
/// exact case-insensitive match, then unique substring match, then the
/// group disambiguation preferences, then the shortest-name heuristic
/// (shortest name is usually the base ingredient). Returns `None` when
/// no term matches anything; the caller drops the role.
pub fn resolve_ingredient(
    candidate_terms: &[String],
    group: FoodGroup,
    catalog: &[FoodItem],
    rules: &RulesConfig,
) -> Option<FoodItem> {
    let denied = |food: &FoodItem| -> bool {
        if !is_solid_group(group) {
            return false;
        }
        let lower = food.name.to_lowercase();
        rules
            .solid_denylist
            .iter()
            .any(|fragment| lower.contains(fragment.as_str()))
    };

    for term in candidate_terms {
        let term_lower = term.to_lowercase();

        if let Some(exact) = catalog
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(term) && !denied(f))
        {
            return Some(exact.clone());
        }

        let matches: Vec<&FoodItem> = catalog
            .iter()
            .filter(|f| f.name.to_lowercase().contains(term_lower.as_str()) && !denied(f))
            .collect();

        match matches.len() {
            0 => continue,
            1 => return Some(matches[0].clone()),
            _ => {
                if let Some(preferred) = rules
                    .disambiguation
                    .iter()
                    .filter(|rule| term_lower.contains(rule.term_fragment.as_str()))
                    .find_map(|rule| {
                        matches.iter().find(|f| {
                            f.name.to_lowercase().contains(rule.prefer_fragment.as_str())
                        })
                    })
                {
                    return Some((*preferred).clone());
                }
                let shortest = matches
                    .into_iter()
                    .min_by_key(|f| f.name.len())
                    .expect("non-empty match list");
                return Some(shortest.clone());
            }
        }
    }

    None
}
