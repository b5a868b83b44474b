use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the semicolon-delimited food catalog CSV
    #[arg(short, long)]
    pub catalog: String,

    /// Path to a patient profile JSON file (defaults to a healthy adult
    /// with a standard 4-moment day)
    #[arg(short, long)]
    pub patient: Option<String>,

    /// Daily calorie target
    #[arg(short, long)]
    pub target_kcal: f32,

    /// Label for the generated day
    #[arg(short, long, default_value = "Day 1")]
    pub day: String,

    /// Seed for deterministic recipe selection
    #[arg(short, long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
