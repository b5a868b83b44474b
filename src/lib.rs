pub mod bromatology;
pub mod catalog;
pub mod cli;
pub mod compose;
pub mod generator;
pub mod model;
pub mod optim;
pub mod plan_aggregator;
pub mod resolver;
pub mod rules;
pub mod safety;
