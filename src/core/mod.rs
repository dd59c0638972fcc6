// Public modules
pub mod error;
pub mod mapping;
pub mod rebrand;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use mapping::{TermMapping, TermPair};
pub use rebrand::{RebrandOutcome, RebrandStats, SkipRules, TreeRebrander};
