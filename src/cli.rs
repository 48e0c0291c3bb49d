//! CLI argument parsing for the subframe reconciliation tool.
//!
//! The CLI only gathers inputs; directory and marker settings are merged with
//! an optional config file in [`crate::config`].
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "mdoc-subframes",
    version,
    about = "Reconcile SubFramePath entries in mdoc files with frame files on disk",
    after_help = "Commands:\n  rename --frames <dir> --mdocs <dir>   Rewrite each name.mdoc to name_renamed.mdoc, then verify\n  verify --mdocs <dir>                  Verify existing name.mdoc / name_renamed.mdoc pairs\n  resolve --frames <dir> <prefix>...    Show which frame file each prefix resolves to\n\nExamples:\n  mdoc-subframes rename --frames frames/ --mdocs rawdata/\n  mdoc-subframes rename --config session.json --dry-run --json\n  mdoc-subframes verify --mdocs rawdata/ --frames frames/ --strict\n  mdoc-subframes resolve --frames frames/ Position_37_001",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Log debug detail to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Rename(RenameArgs),
    Verify(VerifyArgs),
    Resolve(ResolveArgs),
}

/// Directory and naming inputs shared by `rename` and `verify`.
#[derive(Args, Debug, Clone, Default)]
pub struct DirArgs {
    /// Directory holding the frame files
    #[arg(long, value_name = "DIR")]
    pub frames: Option<PathBuf>,

    /// Directory holding the mdoc files
    #[arg(long, value_name = "DIR")]
    pub mdocs: Option<PathBuf>,

    /// JSON config file (frames_dir, mdoc_dir, extension, renamed_marker, overwrite, strict)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Metadata file extension [default: mdoc]
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Marker inserted before the extension of rewritten files [default: _renamed]
    #[arg(long, value_name = "MARKER")]
    pub marker: Option<String>,
}

/// Rename command inputs.
#[derive(Parser, Debug)]
#[command(about = "Rewrite SubFramePath entries to match frame files, then verify")]
pub struct RenameArgs {
    #[command(flatten)]
    pub dirs: DirArgs,

    /// Replace rewritten files left by an earlier run
    #[arg(long)]
    pub overwrite: bool,

    /// Also check each rewritten SubFramePath against the frame index
    #[arg(long)]
    pub strict: bool,

    /// Resolve and report substitutions without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the batch report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Verify command inputs.
#[derive(Parser, Debug)]
#[command(about = "Verify existing rewritten mdoc files against their originals")]
pub struct VerifyArgs {
    #[command(flatten)]
    pub dirs: DirArgs,

    /// Also check each rewritten SubFramePath against the frame index (needs --frames)
    #[arg(long)]
    pub strict: bool,

    /// Emit the batch report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Resolve command inputs.
#[derive(Parser, Debug)]
#[command(about = "Show the frame file each prefix resolves to")]
pub struct ResolveArgs {
    /// Directory holding the frame files
    #[arg(long, value_name = "DIR")]
    pub frames: PathBuf,

    /// Frame prefixes to look up (e.g. Position_37_001); lists the whole
    /// index when omitted
    #[arg(value_name = "PREFIX")]
    pub prefixes: Vec<String>,
}
