//! Run counters and the generated summary artifact.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::mapping::TermMapping;

/// Fixed name of the summary artifact, written directly under the new root.
pub const SUMMARY_FILE: &str = "REBRAND_SUMMARY.md";

/// Counters accumulated across one rebrand run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RebrandStats {
    pub files_renamed: usize,
    pub dirs_renamed: usize,
    pub files_modified: usize,
    pub replacements_made: usize,
}

/// Render the Markdown summary: counters, the term table, and an advisory
/// checklist of manual follow-up steps. The checklist is text only — the
/// tool executes none of it.
pub fn render_summary(mapping: &TermMapping, stats: &RebrandStats) -> String {
    let date = chrono::Local::now().format("%Y-%m-%d");

    let mut terms = String::new();
    for pair in mapping.pairs() {
        terms.push_str(&format!("| `{}` | `{}` |\n", pair.from, pair.to));
    }

    format!(
        "# Rebrand Summary\n\
         \n\
         **Date:** {date}\n\
         \n\
         ## Statistics\n\
         \n\
         - **Files renamed:** {files_renamed}\n\
         - **Directories renamed:** {dirs_renamed}\n\
         - **Files modified:** {files_modified}\n\
         - **Total replacements:** {replacements_made}\n\
         \n\
         ## Term mapping\n\
         \n\
         | Old term | New term |\n\
         |----------|----------|\n\
         {terms}\
         \n\
         ## Next steps\n\
         \n\
         1. Update assets:\n\
         \x20  - [ ] App icons and splash screens\n\
         \x20  - [ ] Marketing materials and social media branding\n\
         2. Update documentation:\n\
         \x20  - [ ] API and developer documentation\n\
         \x20  - [ ] User guides and README files\n\
         3. Update external services:\n\
         \x20  - [ ] Analytics projects and store listings\n\
         \x20  - [ ] Domain names and social media handles\n\
         4. Update backend:\n\
         \x20  - [ ] Hardcoded endpoints, environment variables, CI pipelines\n\
         5. Legal:\n\
         \x20  - [ ] Trademark registration and policy documents\n\
         \n\
         ## Verification\n\
         \n\
         Search the tree for any remaining old terms and run a clean build.\n\
         \n\
         ## Rollback\n\
         \n\
         This tool makes no backups. If issues arise, restore from version\n\
         control — run rebrands only on a committed tree.\n",
        date = date,
        files_renamed = stats.files_renamed,
        dirs_renamed = stats.dirs_renamed,
        files_modified = stats.files_modified,
        replacements_made = stats.replacements_made,
        terms = terms,
    )
}

/// Write the summary artifact under `root` and return its path.
pub fn write_summary(root: &Path, mapping: &TermMapping, stats: &RebrandStats) -> Result<PathBuf> {
    let path = root.join(SUMMARY_FILE);
    let content = render_summary(mapping, stats);

    fs::write(&path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("write {}", path.display()))))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::TermPair;

    fn mapping() -> TermMapping {
        TermMapping::new(vec![TermPair::new("Pika", "Bee")]).unwrap()
    }

    #[test]
    fn render_includes_counters_and_terms() {
        let stats = RebrandStats {
            files_renamed: 3,
            dirs_renamed: 1,
            files_modified: 7,
            replacements_made: 42,
        };

        let out = render_summary(&mapping(), &stats);
        assert!(out.contains("**Files renamed:** 3"));
        assert!(out.contains("**Directories renamed:** 1"));
        assert!(out.contains("**Files modified:** 7"));
        assert!(out.contains("**Total replacements:** 42"));
        assert!(out.contains("| `Pika` | `Bee` |"));
    }

    #[test]
    fn write_summary_creates_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let stats = RebrandStats::default();

        let path = write_summary(dir.path(), &mapping(), &stats).unwrap();
        assert_eq!(path, dir.path().join(SUMMARY_FILE));
        assert!(path.exists());

        let content = fs::read_to_string(path).unwrap();
        assert!(content.starts_with("# Rebrand Summary"));
    }
}
