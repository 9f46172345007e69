// Pattern repository: tier reads with id backfill plus the mutating
// operations over both storage tiers.

pub mod repository;

pub use repository::{PatternLists, PatternRepository};
