//! Ncl driver CLI.
//!
//! Lists, checks and runs the bundled demo programs.

use nclc::demos::{self, DEMOS};
use nclc::{check_program, init_tracing, run_program, RunError};

use ncl_eval::EvalConfig;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "list" => {
            for demo in DEMOS {
                println!("{:<20} {}", demo.name, demo.summary);
            }
        }
        "run" => {
            let mut config = EvalConfig::default();
            let mut name = None;

            for arg in args.iter().skip(2) {
                if let Some(limit) = arg.strip_prefix("--max-depth=") {
                    let Ok(limit) = limit.parse() else {
                        eprintln!("error: invalid depth limit `{limit}`");
                        std::process::exit(1);
                    };
                    config.max_depth = limit;
                } else if arg == "--shallow" {
                    config.deep_force = false;
                } else if !arg.starts_with('-') && name.is_none() {
                    name = Some(arg.as_str());
                }
            }

            let Some(name) = name else {
                eprintln!("error: missing demo name");
                eprintln!("Usage: nclc run <demo> [--max-depth=<n>] [--shallow]");
                std::process::exit(1);
            };
            let program = find_demo(name).program();
            match run_program(&program, &config) {
                Ok(value) => println!("{value}"),
                Err(err) => report(&err),
            }
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: nclc check <demo>");
                std::process::exit(1);
            }
            let program = find_demo(&args[2]).program();
            match check_program(&program) {
                Ok(annotations) => println!("ok ({} annotations)", annotations.len()),
                Err(err) => report(&err),
            }
        }
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn find_demo(name: &str) -> &'static demos::Demo {
    demos::find(name).unwrap_or_else(|| {
        eprintln!("error: unknown demo `{name}` (see `nclc list`)");
        std::process::exit(1);
    })
}

fn report(err: &RunError) -> ! {
    eprintln!("error: {err}");
    if let RunError::Eval(eval) = err {
        for note in &eval.notes {
            eprintln!("  note: {note}");
        }
    }
    std::process::exit(1);
}

fn print_usage() {
    println!("Ncl demo runner");
    println!();
    println!("Usage: nclc <command> [options]");
    println!();
    println!("Commands:");
    println!("  list                 List the bundled demos");
    println!("  run <demo>           Evaluate a demo and print its value");
    println!("  check <demo>         Resolve a demo's annotations without evaluating");
    println!();
    println!("Options for run:");
    println!("  --max-depth=<n>      Evaluation depth limit (default: 100000)");
    println!("  --shallow            Print the result without forcing it completely");
    println!();
    println!("Set NCL_LOG (or RUST_LOG) to enable tracing, e.g. NCL_LOG=ncl_eval=trace");
}
