use std::fs;

use cassia::{EvaluationContext, eval_source};
use clap::Parser;

/// cassia is a small computer algebra system: it evaluates mathematical
/// expressions symbolically, one per line, in a shared session.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treat the input as a path to a file of expressions instead of an
    /// inline expression.
    #[arg(short, long)]
    file: bool,

    /// Only print the result of the last expression.
    #[arg(short, long)]
    quiet: bool,

    contents: String,
}

fn main() {
    let args = Args::parse();

    let source = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    } else {
        args.contents
    };

    let mut ctx = EvaluationContext::new();
    let mut last = None;

    for line in source.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match eval_source(line, &mut ctx) {
            Ok(result) => {
                if !args.quiet {
                    println!("{result}");
                }
                last = Some(result);
            },
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            },
        }
    }

    if args.quiet && let Some(result) = last {
        println!("{result}");
    }
}
