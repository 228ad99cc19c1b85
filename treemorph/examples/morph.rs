//! Example: Morph one markup document into another
//!
//! This example reconciles a new document into an old one, prints the morphed
//! old tree to stdout and every applied mutation to stderr.
//!
//! Usage: cargo run --example morph <old.xml> <new.xml>

use std::env;
use std::io;
use std::rc::Rc;

use treemorph::{parse_file, MarkupPrinter, Reconciler};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <old.xml> <new.xml>", args[0]);
        std::process::exit(1);
    }

    eprintln!("Parsing old: {}", args[1]);
    let old = parse_file(&args[1])?;

    eprintln!("Parsing new: {}", args[2]);
    let new = parse_file(&args[2])?;

    let mut reconciler = Reconciler::new();
    let Some(root) = reconciler.reconcile(Some(&new), Some(&old))? else {
        eprintln!("Nothing left to print");
        std::process::exit(1);
    };
    if !Rc::ptr_eq(&root, &old) {
        eprintln!("Root tags differ; the new root replaces the old one");
    }

    MarkupPrinter::new(io::stdout()).print(&root)?;

    let log = reconciler.take_log();
    log.write_entries(&mut io::stderr())?;
    eprintln!("\n{}", log.summary());

    Ok(())
}
