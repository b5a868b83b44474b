pub mod filter;
pub mod interactions;

pub use filter::{filter_catalog, FilterOutcome};
pub use interactions::{check_food_interaction, get_medication_warnings, InteractionCheck};
