pub mod cat_file;
pub mod commit_tree;
pub mod hash_object;
pub mod init;
pub mod ls_tree;
pub mod write_tree;

use anyhow::{Context, Result};
use clap::Subcommand;
use plumb_hash::ObjectId;
use plumb_repository::Repository;

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty repository or reinitialize an existing one
    Init(init::InitArgs),
    /// Provide content or kind and size information for stored objects
    CatFile(cat_file::CatFileArgs),
    /// Compute the id of a file as a blob and optionally store it
    HashObject(hash_object::HashObjectArgs),
    /// List the contents of a tree object
    LsTree(ls_tree::LsTreeArgs),
    /// Snapshot the work tree into tree objects
    WriteTree(write_tree::WriteTreeArgs),
    /// Create a new commit object
    CommitTree(commit_tree::CommitTreeArgs),
}

/// Open a repository, respecting --plumb-dir override.
pub fn open_repo(cli: &Cli) -> Result<Repository> {
    let repo = if let Some(ref plumb_dir) = cli.plumb_dir {
        Repository::open(plumb_dir)?
    } else {
        Repository::discover(".")?
    };
    Ok(repo)
}

/// Parse a full 40-digit hex object name.
pub fn parse_oid(name: &str) -> Result<ObjectId> {
    ObjectId::from_hex(name).with_context(|| format!("not a valid object name: {name}"))
}

pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Init(args) => init::run(args, &cli),
        Commands::CatFile(args) => cat_file::run(args, &cli),
        Commands::HashObject(args) => hash_object::run(args, &cli),
        Commands::LsTree(args) => ls_tree::run(args, &cli),
        Commands::WriteTree(args) => write_tree::run(args, &cli),
        Commands::CommitTree(args) => commit_tree::run(args, &cli),
    }
}
