use std::io::{self, Read, Write};

use anyhow::Result;
use clap::Args;
use plumb_repository::EnvOverrides;

use super::{open_repo, parse_oid};
use crate::Cli;

#[derive(Args)]
pub struct CommitTreeArgs {
    /// Tree object id
    tree: String,

    /// Parent commit
    #[arg(short = 'p')]
    parent: Option<String>,

    /// Commit message
    #[arg(short = 'm')]
    message: Option<String>,

    /// Read message from file
    #[arg(short = 'F', conflicts_with = "message")]
    file: Option<String>,
}

pub fn run(args: &CommitTreeArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;

    let tree = parse_oid(&args.tree)?;
    let parent = args.parent.as_deref().map(parse_oid).transpose()?;

    let message = if let Some(ref msg) = args.message {
        msg.clone().into_bytes()
    } else if let Some(ref file) = args.file {
        std::fs::read(file)?
    } else {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        buf
    };

    let author = EnvOverrides::from_env().author_signature()?;
    let oid = plumb_snapshot::write_commit(repo.store(), &tree, parent.as_ref(), &message, &author)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{oid}")?;

    Ok(0)
}
