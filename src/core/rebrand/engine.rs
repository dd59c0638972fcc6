//! Rebranding engine — walk a project tree applying a term mapping.
//!
//! Single-threaded and fully synchronous: each file is read whole,
//! rewritten, and conditionally written back before the next is touched.
//! Renames happen bottom-up (post-order) so renaming a parent never
//! invalidates a child path still being iterated. There is no atomicity
//! across the run; version control is the rollback mechanism.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::mapping::TermMapping;
use super::summary::{self, RebrandStats, SUMMARY_FILE};

// ============================================================================
// Processable extensions
// ============================================================================

/// Extensions whose contents are rewritten. Everything else is rename-only,
/// which keeps binary assets (images, fonts, archives) byte-identical.
const PROCESSABLE_EXTENSIONS: &[&str] = &[
    "kt", "kts", "java", "swift", "xml", "json", "yaml", "yml", "md", "txt", "gradle",
    "properties", "conf", "toml", "html", "css", "js", "ts",
];

/// Whether a file's extension is in the text-processable set.
pub fn is_processable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| PROCESSABLE_EXTENSIONS.contains(&ext))
}

// ============================================================================
// Skip rules
// ============================================================================

#[derive(Debug, Clone)]
enum SkipRule {
    /// Matches a whole path component by name.
    Segment(String),
    /// Matches any component with this suffix (from a `*.ext` rule).
    Suffix(String),
}

/// Path rules that exclude a subtree (or file) from all processing.
///
/// Rules match whole path components, never arbitrary substrings, so a
/// `build` rule skips a `build/` directory but not `mybuild.txt`.
#[derive(Debug, Clone)]
pub struct SkipRules {
    rules: Vec<SkipRule>,
}

impl SkipRules {
    /// The default set: VCS and build-output directories, IDE metadata,
    /// compiled artifacts, and the tool's own summary artifact.
    pub fn defaults() -> Self {
        let mut rules = Self { rules: Vec::new() };
        for raw in [
            ".git",
            ".gradle",
            "build",
            ".idea",
            "node_modules",
            "__pycache__",
            ".DS_Store",
            "*.class",
            "*.jar",
            SUMMARY_FILE,
        ] {
            rules.push(raw).expect("default skip rules are valid");
        }
        rules
    }

    /// Add a rule. `*.ext` adds a suffix rule; anything else matches a
    /// whole component name.
    pub fn push(&mut self, raw: &str) -> Result<()> {
        if raw.is_empty() || raw == "*." || raw == "*" {
            return Err(Error::validation_invalid_argument(
                "skip",
                "Skip rule cannot be empty",
                Some(raw.to_string()),
            ));
        }

        if let Some(suffix) = raw.strip_prefix("*.") {
            self.rules.push(SkipRule::Suffix(format!(".{}", suffix)));
        } else {
            self.rules.push(SkipRule::Segment(raw.to_string()));
        }

        Ok(())
    }

    fn matches_component(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| match rule {
            SkipRule::Segment(seg) => name == seg,
            SkipRule::Suffix(suffix) => name.ends_with(suffix.as_str()),
        })
    }

    /// Whether any component of `path` matches a rule.
    pub fn matches(&self, path: &Path) -> bool {
        path.components().any(|c| {
            c.as_os_str()
                .to_str()
                .is_some_and(|name| self.matches_component(name))
        })
    }
}

impl Default for SkipRules {
    fn default() -> Self {
        Self::defaults()
    }
}

// ============================================================================
// Outcome types
// ============================================================================

/// A content rewrite performed (or planned) on one file.
#[derive(Debug, Clone, Serialize)]
pub struct ContentEdit {
    /// Path relative to root.
    pub path: String,
    /// Number of replacements in this file.
    pub replacements: usize,
}

/// A file or directory rename performed (or planned).
#[derive(Debug, Clone, Serialize)]
pub struct PathRename {
    pub from: String,
    pub to: String,
}

/// A per-file failure that was logged and skipped, never run-fatal.
#[derive(Debug, Clone, Serialize)]
pub struct FileIssue {
    pub path: String,
    pub message: String,
}

/// The full result of one rebrand run.
#[derive(Debug, Clone, Serialize)]
pub struct RebrandOutcome {
    pub stats: RebrandStats,
    pub edits: Vec<ContentEdit>,
    pub renames: Vec<PathRename>,
    pub issues: Vec<FileIssue>,
    /// Root path after the final rename step (planned path in a dry run).
    pub new_root: String,
    /// Where the summary artifact was written; absent in a dry run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_path: Option<String>,
    /// Whether changes were written to disk.
    pub applied: bool,
}

// ============================================================================
// Engine
// ============================================================================

/// Walks a tree applying a [`TermMapping`] to contents and names.
///
/// Construct with an explicit mapping (no global table) so multiple
/// configurations can coexist and be tested independently.
pub struct TreeRebrander {
    root: PathBuf,
    mapping: TermMapping,
    skip: SkipRules,
    dry_run: bool,
    stats: RebrandStats,
    edits: Vec<ContentEdit>,
    renames: Vec<PathRename>,
    issues: Vec<FileIssue>,
}

impl TreeRebrander {
    pub fn new(root: impl Into<PathBuf>, mapping: TermMapping) -> Self {
        Self {
            root: root.into(),
            mapping,
            skip: SkipRules::defaults(),
            dry_run: false,
            stats: RebrandStats::default(),
            edits: Vec::new(),
            renames: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn with_skip_rules(mut self, skip: SkipRules) -> Self {
        self.skip = skip;
        self
    }

    /// Compute everything without touching the filesystem.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Execute the full run: walk and replace, sweep residual package
    /// directories, rename the root last, write the summary.
    ///
    /// The only fatal precondition is a missing root — checked up front,
    /// nothing modified on failure. Per-file errors are logged, recorded,
    /// and never abort the run.
    pub fn run(mut self) -> Result<RebrandOutcome> {
        if !self.root.is_dir() {
            return Err(Error::root_not_found(self.root.display().to_string()));
        }

        let root = self.root.clone();
        self.process_directory(&root);
        self.relocate_package_dirs(&root);
        let new_root = self.rename_root()?;

        let summary_path = if self.dry_run {
            None
        } else {
            Some(
                summary::write_summary(&new_root, &self.mapping, &self.stats)?
                    .display()
                    .to_string(),
            )
        };

        Ok(RebrandOutcome {
            stats: self.stats,
            edits: self.edits,
            renames: self.renames,
            issues: self.issues,
            new_root: new_root.display().to_string(),
            summary_path,
            applied: !self.dry_run,
        })
    }

    /// Skip check against the path relative to root, so rules never match
    /// components of the root path itself.
    fn should_skip(&self, path: &Path) -> bool {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        self.skip.matches(rel)
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }

    fn record_issue(&mut self, path: &Path, message: String) {
        log_status!("rebrand", "Error processing {}: {}", path.display(), message);
        self.issues.push(FileIssue {
            path: self.relative(path),
            message,
        });
    }

    /// Process all files in a directory (sorted), then subdirectories
    /// (sorted), then rename the directory itself. Post-order: a directory
    /// is renamed only after everything beneath it has been visited.
    fn process_directory(&mut self, dir: &Path) {
        if self.should_skip(dir) {
            return;
        }

        log_status!("rebrand", "Processing directory: {}", dir.display());

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                self.record_issue(dir, format!("read_dir failed: {}", e));
                return;
            }
        };

        let mut files = Vec::new();
        let mut subdirs = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                subdirs.push(path);
            } else {
                files.push(path);
            }
        }
        files.sort();
        subdirs.sort();

        for file in &files {
            self.process_file(file);
        }
        for subdir in &subdirs {
            self.process_directory(subdir);
        }

        // Root is renamed by the explicit final step, never here
        if dir != self.root.as_path() {
            self.try_rename(dir, true);
        }
    }

    /// Rewrite a file's contents (processable extensions only), then
    /// attempt a name rename. Any failure is recorded and skipped.
    fn process_file(&mut self, path: &Path) {
        if self.should_skip(path) {
            return;
        }

        if !is_processable(path) {
            // Binary or unknown content: never rewritten, still renamed
            self.try_rename(path, false);
            return;
        }

        if let Err(message) = self.rewrite_contents(path) {
            self.record_issue(path, message);
            return;
        }

        self.try_rename(path, false);
    }

    fn rewrite_contents(&mut self, path: &Path) -> std::result::Result<(), String> {
        let bytes = fs::read(path).map_err(|e| format!("read failed: {}", e))?;
        // Undecodable bytes are tolerated, not fatal
        let content = String::from_utf8_lossy(&bytes);

        let (modified, replacements) = self.mapping.replace_in_content(&content);
        if replacements == 0 {
            // Leave mtime untouched for unaffected files
            return Ok(());
        }

        if !self.dry_run {
            fs::write(path, modified).map_err(|e| format!("write failed: {}", e))?;
        }

        log_status!(
            "rebrand",
            "Modified {} ({} replacements)",
            path.display(),
            replacements
        );
        self.stats.files_modified += 1;
        self.stats.replacements_made += replacements;
        self.edits.push(ContentEdit {
            path: self.relative(path),
            replacements,
        });

        Ok(())
    }

    /// Rename one entry if the mapping changes its name. No-op when the
    /// rename was already planned (dry runs leave paths in place, so the
    /// residual sweep would otherwise re-find them).
    fn try_rename(&mut self, path: &Path, is_dir: bool) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return;
        };

        let new_name = self.mapping.rename_component(name);
        if new_name == name {
            return;
        }

        let rel = self.relative(path);
        if self.renames.iter().any(|r| r.from == rel) {
            return;
        }

        let new_path = match path.parent() {
            Some(parent) => parent.join(&new_name),
            None => PathBuf::from(&new_name),
        };

        if new_path.exists() {
            self.record_issue(path, format!("rename target already exists: {}", new_name));
            return;
        }

        if !self.dry_run {
            if let Err(e) = fs::rename(path, &new_path) {
                self.record_issue(path, format!("rename failed: {}", e));
                return;
            }
        }

        log_status!("rebrand", "Renaming: {} → {}", name, new_name);
        self.renames.push(PathRename {
            from: rel,
            to: self.relative(&new_path),
        });
        if is_dir {
            self.stats.dirs_renamed += 1;
        } else {
            self.stats.files_renamed += 1;
        }
    }

    /// Residual sweep after the generic walk: rename any directory whose
    /// name still contains a mapped term, deepest first. Covers
    /// package-style subtrees (`com/pika/app`) the walk can miss when an
    /// ancestor rename exposes an unrenamed segment.
    fn relocate_package_dirs(&mut self, root: &Path) {
        let mut residual = Vec::new();
        self.collect_residual_dirs(root, &mut residual);

        residual.sort_by(|a, b| b.components().count().cmp(&a.components().count()));

        for dir in residual {
            self.try_rename(&dir, true);
        }
    }

    fn collect_residual_dirs(&self, dir: &Path, out: &mut Vec<PathBuf>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() || self.should_skip(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if self.mapping.rename_component(name) != name {
                    out.push(path.clone());
                }
            }
            self.collect_residual_dirs(&path, out);
        }
    }

    /// The root is the one component the recursive walk never visits;
    /// rename it as the explicit final step.
    fn rename_root(&mut self) -> Result<PathBuf> {
        let Some(name) = self
            .root
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
        else {
            return Ok(self.root.clone());
        };

        let new_name = self.mapping.rename_component(&name);
        if new_name == name {
            return Ok(self.root.clone());
        }

        let new_root = match self.root.parent() {
            Some(parent) => parent.join(&new_name),
            None => PathBuf::from(&new_name),
        };

        if !self.dry_run {
            fs::rename(&self.root, &new_root).map_err(|e| {
                Error::root_rename_failed(
                    self.root.display().to_string(),
                    new_root.display().to_string(),
                    e.to_string(),
                )
            })?;
        }

        log_status!("rebrand", "Renaming root: {} → {}", name, new_name);
        self.renames.push(PathRename {
            from: name,
            to: new_name,
        });

        Ok(new_root)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::TermPair;
    use tempfile::tempdir;

    fn bee_mapping() -> TermMapping {
        TermMapping::new(vec![
            TermPair::new("Pika", "Bee"),
            TermPair::new("Yeet", "Buzz"),
            TermPair::new("yeet", "buzz"),
        ])
        .unwrap()
    }

    #[test]
    fn end_to_end_rename_and_rewrite() {
        let dir = tempdir().unwrap();
        let app = dir.path().join("app");
        fs::create_dir_all(&app).unwrap();
        fs::write(app.join("Pika.kt"), "val x = \"Pika rocks, yeet it\"").unwrap();

        let outcome = TreeRebrander::new(dir.path(), bee_mapping()).run().unwrap();

        assert!(!app.join("Pika.kt").exists());
        let content = fs::read_to_string(app.join("Bee.kt")).unwrap();
        assert_eq!(content, "val x = \"Bee rocks, buzz it\"");

        assert_eq!(outcome.stats.files_renamed, 1);
        assert_eq!(outcome.stats.files_modified, 1);
        assert_eq!(outcome.stats.replacements_made, 2);
        assert_eq!(outcome.stats.dirs_renamed, 0);
        assert!(outcome.applied);
    }

    #[test]
    fn second_run_is_a_no_op() {
        let dir = tempdir().unwrap();
        let app = dir.path().join("app");
        fs::create_dir_all(&app).unwrap();
        fs::write(app.join("Pika.kt"), "yeet yeet Pika").unwrap();

        TreeRebrander::new(dir.path(), bee_mapping()).run().unwrap();
        let second = TreeRebrander::new(dir.path(), bee_mapping()).run().unwrap();

        assert_eq!(second.stats.replacements_made, 0);
        assert_eq!(second.stats.files_renamed, 0);
        assert_eq!(second.stats.files_modified, 0);
        assert_eq!(second.stats.dirs_renamed, 0);
    }

    #[test]
    fn skipped_subtree_is_untouched() {
        let dir = tempdir().unwrap();
        let git = dir.path().join(".git");
        fs::create_dir_all(&git).unwrap();
        fs::write(git.join("Pika.txt"), "Pika everywhere").unwrap();

        let outcome = TreeRebrander::new(dir.path(), bee_mapping()).run().unwrap();

        assert!(git.join("Pika.txt").exists());
        let content = fs::read_to_string(git.join("Pika.txt")).unwrap();
        assert_eq!(content, "Pika everywhere");
        assert_eq!(outcome.stats.replacements_made, 0);
    }

    #[test]
    fn skip_rule_matches_whole_component_only() {
        // "mybuild.txt" must NOT be skipped by the "build" rule
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("mybuild.txt"), "Pika inside").unwrap();

        let outcome = TreeRebrander::new(dir.path(), bee_mapping()).run().unwrap();

        assert_eq!(outcome.stats.files_modified, 1);
        let content = fs::read_to_string(dir.path().join("mybuild.txt")).unwrap();
        assert_eq!(content, "Bee inside");
    }

    #[test]
    fn suffix_skip_rule_matches_compiled_artifacts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Pika.class"), b"\xca\xfe\xba\xbePika").unwrap();

        let outcome = TreeRebrander::new(dir.path(), bee_mapping()).run().unwrap();

        // Neither renamed nor rewritten
        assert!(dir.path().join("Pika.class").exists());
        assert_eq!(outcome.stats.files_renamed, 0);
    }

    #[test]
    fn binary_file_renamed_but_content_untouched() {
        let dir = tempdir().unwrap();
        let bytes: &[u8] = b"\x89PNG Pika yeet \xff\xfe";
        fs::write(dir.path().join("Pika.png"), bytes).unwrap();

        let outcome = TreeRebrander::new(dir.path(), bee_mapping()).run().unwrap();

        assert!(!dir.path().join("Pika.png").exists());
        let after = fs::read(dir.path().join("Bee.png")).unwrap();
        assert_eq!(after, bytes);
        assert_eq!(outcome.stats.files_renamed, 1);
        assert_eq!(outcome.stats.files_modified, 0);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_does_not_stop_siblings() {
        let dir = tempdir().unwrap();
        // Dangling symlink with a processable extension: read always fails
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("broken.kt"))
            .unwrap();
        fs::write(dir.path().join("ok.kt"), "yeet").unwrap();

        let outcome = TreeRebrander::new(dir.path(), bee_mapping()).run().unwrap();

        assert_eq!(outcome.issues.len(), 1);
        assert!(outcome.issues[0].path.contains("broken.kt"));
        let content = fs::read_to_string(dir.path().join("ok.kt")).unwrap();
        assert_eq!(content, "buzz");
    }

    #[test]
    fn dry_run_reports_without_touching_disk() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Pika.kt"), "yeet").unwrap();

        let outcome = TreeRebrander::new(dir.path(), bee_mapping())
            .dry_run()
            .run()
            .unwrap();

        assert!(!outcome.applied);
        assert!(outcome.summary_path.is_none());
        assert_eq!(outcome.stats.files_renamed, 1);
        assert_eq!(outcome.stats.files_modified, 1);

        // Disk unchanged
        assert!(dir.path().join("Pika.kt").exists());
        let content = fs::read_to_string(dir.path().join("Pika.kt")).unwrap();
        assert_eq!(content, "yeet");
        assert!(!dir.path().join(SUMMARY_FILE).exists());
    }

    #[test]
    fn root_is_renamed_last_and_summary_written() {
        let parent = tempdir().unwrap();
        let root = parent.path().join("pika-kmp");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("notes.md"), "Pika notes").unwrap();

        let mapping = TermMapping::new(vec![
            TermPair::new("Pika", "Bee"),
            TermPair::new("pika", "bee"),
        ])
        .unwrap();

        let outcome = TreeRebrander::new(&root, mapping).run().unwrap();

        let new_root = parent.path().join("bee-kmp");
        assert!(!root.exists());
        assert!(new_root.exists());
        assert_eq!(outcome.new_root, new_root.display().to_string());
        assert!(new_root.join(SUMMARY_FILE).exists());
        assert!(outcome.renames.iter().any(|r| r.from == "pika-kmp" && r.to == "bee-kmp"));
    }

    #[test]
    fn deep_package_directories_are_relocated() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("src").join("com").join("pika").join("app");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("Main.kt"), "package com.pika.app").unwrap();

        let mapping = TermMapping::new(vec![
            TermPair::new("com.pika.app", "com.bee.app"),
            TermPair::new("pika", "bee"),
        ])
        .unwrap();

        let outcome = TreeRebrander::new(dir.path(), mapping).run().unwrap();

        let moved = dir.path().join("src").join("com").join("bee").join("app");
        assert!(moved.join("Main.kt").exists());
        let content = fs::read_to_string(moved.join("Main.kt")).unwrap();
        assert_eq!(content, "package com.bee.app");
        assert!(outcome.stats.dirs_renamed >= 1);
    }

    #[test]
    fn missing_root_is_fatal_and_modifies_nothing() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = TreeRebrander::new(&missing, bee_mapping()).run().unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::RebrandRootNotFound);
    }

    #[test]
    fn rename_collision_is_recorded_not_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Pika.txt"), "x").unwrap();
        fs::write(dir.path().join("Bee.txt"), "y").unwrap();

        let outcome = TreeRebrander::new(dir.path(), bee_mapping()).run().unwrap();

        assert!(outcome
            .issues
            .iter()
            .any(|i| i.message.contains("already exists")));
        // Both files still present, neither clobbered
        assert_eq!(fs::read_to_string(dir.path().join("Pika.txt")).unwrap(), "x");
        assert_eq!(fs::read_to_string(dir.path().join("Bee.txt")).unwrap(), "y");
    }
}
