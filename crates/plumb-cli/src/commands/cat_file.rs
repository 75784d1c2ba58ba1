use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Args;
use plumb_object::ObjectKind;
use plumb_store::StoreError;

use super::{open_repo, parse_oid};
use crate::Cli;

#[derive(Args)]
pub struct CatFileArgs {
    /// Show object kind
    #[arg(short = 't', conflicts_with_all = ["size", "pretty", "exists"])]
    type_only: bool,

    /// Show payload size
    #[arg(short = 's', conflicts_with_all = ["type_only", "pretty", "exists"])]
    size: bool,

    /// Pretty-print the object content
    #[arg(short = 'p', conflicts_with_all = ["type_only", "size", "exists"])]
    pretty: bool,

    /// Exit with zero status if the object exists, 1 otherwise
    #[arg(short = 'e', conflicts_with_all = ["type_only", "size", "pretty"])]
    exists: bool,

    /// Object to show
    #[arg(value_name = "object")]
    object: String,
}

pub fn run(args: &CatFileArgs, cli: &Cli) -> Result<i32> {
    if !(args.type_only || args.size || args.pretty || args.exists) {
        bail!("usage: plumb cat-file (-t | -s | -e | -p) <object>");
    }

    let repo = open_repo(cli)?;
    let store = repo.store();
    let oid = parse_oid(&args.object)?;

    if args.exists {
        return Ok(if store.contains(&oid) { 0 } else { 1 });
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.type_only || args.size {
        let (kind, size) = match store.read_header(&oid) {
            Ok(header) => header,
            Err(StoreError::NotFound { .. }) => bail!("not a valid object name {}", args.object),
            Err(e) => return Err(e.into()),
        };
        if args.type_only {
            writeln!(out, "{kind}")?;
        } else {
            writeln!(out, "{size}")?;
        }
        return Ok(0);
    }

    let raw = match store.get(&oid) {
        Ok(raw) => raw,
        Err(StoreError::NotFound { .. }) => bail!("not a valid object name {}", args.object),
        Err(e) => return Err(e.into()),
    };

    match raw.kind {
        ObjectKind::Tree => {
            for entry in plumb_snapshot::list_tree(store, &oid)? {
                writeln!(out, "{entry}")?;
            }
        }
        ObjectKind::Blob | ObjectKind::Commit => out.write_all(&raw.data)?,
    }

    Ok(0)
}
