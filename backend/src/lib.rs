pub mod types;
pub mod logger;
pub mod record;
pub mod clean;
pub mod actual_target;
pub mod tokenize;
pub mod segment;
pub mod align;
pub mod reconstruct;
pub mod corpus;
pub mod parser;

/// Placeholder for material that is present but unknown or untranscribed.
pub static UNKNOWN: &'static str = "???";
