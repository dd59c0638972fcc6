//! Tree rebranding — apply a term mapping to a whole project tree.
//!
//! Walks the tree replacing mapped terms in text-file contents, renames
//! files and directories bottom-up, relocates residual package-style
//! directories, renames the root last, and writes a summary artifact.

mod engine;
mod summary;

pub use engine::{
    is_processable, ContentEdit, FileIssue, PathRename, RebrandOutcome, SkipRules, TreeRebrander,
};
pub use summary::{render_summary, write_summary, RebrandStats, SUMMARY_FILE};
