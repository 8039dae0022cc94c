use deltapath_gcode::{CommandStats, Instruction, SizeEstimate, statements, to_command};
use std::{env, fs, path::Path};

fn main() {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let print_stats = args.first().is_some_and(|a| a == "--stats");
    if print_stats {
        args.remove(0);
    }
    if args.is_empty() {
        eprintln!("usage: check [--stats] <file> [<file>...]");
        std::process::exit(1);
    }

    let mut failed = 0usize;
    for path in args {
        let input = match fs::read_to_string(Path::new(&path)) {
            Ok(s) => s,
            Err(err) => {
                eprintln!("{path}: read error: {err}");
                failed += 1;
                continue;
            }
        };

        let mut stats = CommandStats::new(input.len() as u64);
        let mut errors = Vec::new();
        for result in statements(&input) {
            let stmt = match result {
                Ok(stmt) => stmt,
                Err(err) => {
                    errors.push(err.to_string());
                    continue;
                }
            };
            let Some(inst) = Instruction::from_statement(&stmt) else {
                continue;
            };
            if let Err(err) = to_command(&inst) {
                errors.push(err.to_string());
            }
            stats.record(&inst);
        }

        if errors.is_empty() {
            println!("OK {path}");
        } else {
            println!("ERR {path}: {} bad line(s)", errors.len());
            for err in &errors {
                println!("  {err}");
            }
            failed += 1;
        }

        if print_stats {
            let estimate = SizeEstimate::from_stats(&stats);
            let report = serde_json::json!({
                "stats": &stats,
                "estimate": &estimate,
            });
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{json}"),
                Err(err) => eprintln!("{path}: failed to render stats: {err}"),
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}
