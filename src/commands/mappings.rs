use clap::Args;
use serde::Serialize;

use rebrandr::{TermMapping, TermPair};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct MappingsArgs {}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum MappingsOutput {
    #[serde(rename = "mappings.list")]
    List { total: usize, pairs: Vec<TermPair> },
}

/// List the built-in term mapping, in application order (longest first).
pub fn run(
    _args: MappingsArgs,
    _global: &crate::commands::GlobalArgs,
) -> CmdResult<MappingsOutput> {
    let mapping = TermMapping::pika_to_bee();
    let pairs: Vec<TermPair> = mapping.pairs().to_vec();

    Ok((
        MappingsOutput::List {
            total: pairs.len(),
            pairs,
        },
        0,
    ))
}
