use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use plumb_repository::METADATA_DIR;
use plumb_snapshot::TreeBuilder;
use tracing::debug;

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct WriteTreeArgs {}

pub fn run(_args: &WriteTreeArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let work_tree = repo.work_tree()?;
    debug!(work_tree = %work_tree.display(), "snapshotting work tree");

    let oid = TreeBuilder::new(repo.store())
        .ignore(METADATA_DIR)
        .build(work_tree)?
        .context("nothing to snapshot")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{oid}")?;

    Ok(0)
}
