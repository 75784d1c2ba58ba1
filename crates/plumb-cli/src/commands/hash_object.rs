use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::Args;
use plumb_hash::hasher::Hasher;
use plumb_hash::ObjectId;
use plumb_object::ObjectKind;
use plumb_repository::Repository;

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct HashObjectArgs {
    /// Read the object from stdin
    #[arg(long)]
    stdin: bool,

    /// Actually write the object into the object store
    #[arg(short = 'w')]
    write: bool,

    /// Files to hash
    #[arg(value_name = "file")]
    files: Vec<String>,
}

pub fn run(args: &HashObjectArgs, cli: &Cli) -> Result<i32> {
    if !args.stdin && args.files.is_empty() {
        anyhow::bail!("nothing to hash; pass a file or --stdin");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    // A repository is only needed when writing.
    let repo = if args.write { Some(open_repo(cli)?) } else { None };

    if args.stdin {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        let oid = hash_and_maybe_write(&data, repo.as_ref())?;
        writeln!(out, "{oid}")?;
    }

    for file in &args.files {
        let data = std::fs::read(file).with_context(|| format!("could not open '{file}'"))?;
        let oid = hash_and_maybe_write(&data, repo.as_ref())?;
        writeln!(out, "{oid}")?;
    }

    Ok(0)
}

fn hash_and_maybe_write(data: &[u8], repo: Option<&Repository>) -> Result<ObjectId> {
    let oid = match repo {
        Some(repo) => repo.store().put(ObjectKind::Blob, data)?,
        None => Hasher::hash_object(ObjectKind::Blob.as_str(), data)?,
    };
    Ok(oid)
}
