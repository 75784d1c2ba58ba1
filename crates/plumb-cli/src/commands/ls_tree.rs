use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Args;
use plumb_hash::ObjectId;
use plumb_object::{Object, ObjectKind};
use plumb_store::ObjectStore;

use super::{open_repo, parse_oid};
use crate::Cli;

#[derive(Args)]
pub struct LsTreeArgs {
    /// Show only names
    #[arg(long)]
    name_only: bool,

    /// Tree or commit to list
    #[arg(value_name = "tree-ish")]
    tree_ish: String,
}

pub fn run(args: &LsTreeArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let store = repo.store();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let oid = parse_oid(&args.tree_ish)?;
    let tree_oid = peel_to_tree(store, &oid, &args.tree_ish)?;

    if args.name_only {
        for name in plumb_snapshot::list_names(store, &tree_oid)? {
            writeln!(out, "{name}")?;
        }
    } else {
        for entry in plumb_snapshot::list_tree(store, &tree_oid)? {
            writeln!(out, "{entry}")?;
        }
    }

    Ok(0)
}

/// A commit lists its root tree; anything else must already be a tree.
fn peel_to_tree(store: &ObjectStore, oid: &ObjectId, name: &str) -> Result<ObjectId> {
    let (kind, _) = store.read_header(oid)?;
    match kind {
        ObjectKind::Tree => Ok(*oid),
        ObjectKind::Commit => match store.get(oid)?.decode()? {
            Object::Commit(commit) => Ok(commit.tree),
            other => bail!("not a tree object: {name} is a {}", other.kind()),
        },
        ObjectKind::Blob => bail!("not a tree object: {name} is a blob"),
    }
}
