//! tmorph - render tree reconciliation from the command line
//!
//! Reads an old and a new markup document, morphs the old tree into the new
//! one and prints the result together with a summary of what changed.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use clap::{ArgAction, Parser, Subcommand};
use log::{debug, info, LevelFilter};
use treemorph::{
    parse_file, BehaviorNames, MarkupPrinter, MutationLog, NodeRef, PrinterOptions, Reconciler,
};

/// Render tree reconciliation tool
#[derive(Parser)]
#[command(name = "tmorph")]
#[command(version)]
#[command(about = "Morphs an old markup tree into a new one in place", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Morph the old tree into the new one and print the result
    #[command(visible_alias = "m")]
    Morph {
        /// Old (live) tree
        old: String,
        /// New (desired) tree
        new: String,
        /// Output file (default: stdout)
        output: Option<String>,

        /// Indent the output
        #[arg(long)]
        pretty: bool,

        /// Print every recorded mutation to stderr
        #[arg(long)]
        log: bool,

        /// Behavior name to synchronize (repeatable)
        #[arg(short, long = "behavior", value_name = "NAME")]
        behaviors: Vec<String>,
    },

    /// Check that morphing old yields exactly new (exit code 1 if not)
    #[command(visible_alias = "c")]
    Check {
        /// Old (live) tree
        old: String,
        /// New (desired) tree
        new: String,
    },
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Morph {
            old,
            new,
            output,
            pretty,
            log,
            behaviors,
        } => run_morph(&old, &new, output.as_deref(), pretty, log, behaviors),
        Commands::Check { old, new } => run_check(&old, &new),
    };

    match result {
        Ok(true) => std::process::ExitCode::SUCCESS,
        Ok(false) => std::process::ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::from_default_env();
    // RUST_LOG wins unless -v was given
    if verbose > 0 || std::env::var_os("RUST_LOG").is_none() {
        builder
            .filter_module("treemorph", level)
            .filter_module("tmorph", level);
    }
    builder.init();
}

/// Parses both trees and reconciles them, returning the morphed root.
fn morph(
    reconciler: &mut Reconciler<NodeRef>,
    old_path: &str,
    new_path: &str,
) -> Result<NodeRef, Box<dyn std::error::Error>> {
    eprintln!("Parsing old: {}", old_path);
    let old = parse_file(old_path)?;

    eprintln!("Parsing new: {}", new_path);
    let new = parse_file(new_path)?;

    let root = reconciler
        .reconcile(Some(&new), Some(&old))?
        .ok_or("reconciliation removed the root")?;
    if !std::rc::Rc::ptr_eq(&root, &old) {
        info!("root could not be morphed; the new root replaces it");
    }
    Ok(root)
}

/// Runs the morph command.
fn run_morph(
    old_path: &str,
    new_path: &str,
    output_path: Option<&str>,
    pretty: bool,
    print_log: bool,
    behaviors: Vec<String>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut reconciler = Reconciler::new();
    if !behaviors.is_empty() {
        debug!("synchronizing behaviors: {}", behaviors.join(", "));
        reconciler = reconciler.with_resolver(BehaviorNames::new(behaviors));
    }

    let root = morph(&mut reconciler, old_path, new_path)?;
    let log = reconciler.take_log();

    let output: Box<dyn Write> = match output_path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    MarkupPrinter::with_options(output, PrinterOptions { pretty_print: pretty }).print(&root)?;

    if print_log {
        log.write_entries(&mut io::stderr())?;
    }
    report(&log);

    Ok(true)
}

/// Runs the check command.
fn run_check(old_path: &str, new_path: &str) -> Result<bool, Box<dyn std::error::Error>> {
    // The new tree loses the nodes grafted into the old one, so compare
    // against a second copy.
    let expected = treemorph::print_to_string(&parse_file(new_path)?)?;

    let mut reconciler = Reconciler::new();
    let root = morph(&mut reconciler, old_path, new_path)?;
    let actual = treemorph::print_to_string(&root)?;
    report(reconciler.log());

    if actual == expected {
        eprintln!("Trees converge.");
        Ok(true)
    } else {
        eprintln!("Trees differ after morphing.");
        print!("{}", actual);
        Ok(false)
    }
}

fn report(log: &MutationLog<NodeRef>) {
    eprintln!("Morph complete: {}.", log.summary());
}
