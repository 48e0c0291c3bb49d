use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod error;
mod frames;
mod mdoc;
mod report;
mod rewrite;
mod staging;
mod verify;
mod workflow;

use cli::{Command, RenameArgs, ResolveArgs, RootArgs, VerifyArgs};
use config::Switches;
use frames::FrameIndex;
use report::BatchReport;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Rename(args) => cmd_rename(&args),
        Command::Verify(args) => cmd_verify(&args),
        Command::Resolve(args) => cmd_resolve(&args),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_rename(args: &RenameArgs) -> Result<()> {
    let config = config::resolve(
        &args.dirs,
        Switches {
            overwrite: args.overwrite,
            strict: args.strict,
            dry_run: args.dry_run,
        },
    )?;
    let report = workflow::run_rename(&config)?;
    emit_report(&report, args.json)
}

fn cmd_verify(args: &VerifyArgs) -> Result<()> {
    let config = config::resolve(
        &args.dirs,
        Switches {
            strict: args.strict,
            ..Switches::default()
        },
    )?;
    let report = workflow::run_verify(&config)?;
    emit_report(&report, args.json)
}

fn cmd_resolve(args: &ResolveArgs) -> Result<()> {
    let frames = FrameIndex::build(&args.frames).context("build frame index")?;
    if args.prefixes.is_empty() {
        for name in frames.names() {
            println!("{name}");
        }
        return Ok(());
    }
    let mut unresolved = 0;
    for prefix in &args.prefixes {
        match frames.resolve(prefix) {
            Ok(name) => println!("{prefix}\t{name}"),
            Err(err) => {
                unresolved += 1;
                println!("{prefix}\t<{} candidates>", err.candidates.len());
                for candidate in &err.candidates {
                    println!("  {candidate}");
                }
            }
        }
    }
    if unresolved > 0 {
        return Err(anyhow!(
            "{unresolved} of {} prefixes did not resolve to exactly one frame in {}",
            args.prefixes.len(),
            args.frames.display()
        ));
    }
    Ok(())
}

fn emit_report(report: &BatchReport, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report).context("serialize batch report")?;
        println!("{text}");
    } else {
        print!("{}", report.render_text());
    }
    if !report.is_success() {
        return Err(anyhow!(
            "{} of {} documents failed",
            report.failure_count(),
            report.documents.len()
        ));
    }
    Ok(())
}
