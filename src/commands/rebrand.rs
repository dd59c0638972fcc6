use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use rebrandr::rebrand::{RebrandOutcome, SkipRules, TreeRebrander};
use rebrandr::TermMapping;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct RunArgs {
    /// Root directory of the tree to rebrand
    #[arg(long, default_value = "./pika-kmp")]
    root: String,
    /// Additional skip rule: a whole path component name, or *.ext
    #[arg(long)]
    skip: Vec<String>,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Root directory of the tree to rebrand
    #[arg(long, default_value = "./pika-kmp")]
    root: String,
    /// Additional skip rule: a whole path component name, or *.ext
    #[arg(long)]
    skip: Vec<String>,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RebrandOutput {
    #[serde(rename = "rebrand.run")]
    Run {
        root: String,
        dry_run: bool,
        #[serde(flatten)]
        outcome: RebrandOutcome,
    },
    #[serde(rename = "rebrand.plan")]
    Plan {
        root: String,
        dry_run: bool,
        #[serde(flatten)]
        outcome: RebrandOutcome,
    },
}

pub fn run(args: RunArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RebrandOutput> {
    let root = resolve_root(&args.root);
    let outcome = execute(&root, &args.skip, false)?;

    Ok((
        RebrandOutput::Run {
            root: root.display().to_string(),
            dry_run: false,
            outcome,
        },
        0,
    ))
}

pub fn plan(args: PlanArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RebrandOutput> {
    let root = resolve_root(&args.root);
    let outcome = execute(&root, &args.skip, true)?;

    Ok((
        RebrandOutput::Plan {
            root: root.display().to_string(),
            dry_run: true,
            outcome,
        },
        0,
    ))
}

fn execute(root: &Path, skip: &[String], dry_run: bool) -> rebrandr::Result<RebrandOutcome> {
    let mut rules = SkipRules::defaults();
    for raw in skip {
        rules.push(raw)?;
    }

    let mut rebrander =
        TreeRebrander::new(root, TermMapping::pika_to_bee()).with_skip_rules(rules);
    if dry_run {
        rebrander = rebrander.dry_run();
    }

    rebrander.run()
}

fn resolve_root(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).to_string())
}
