use score_store::{ScoreStore, DEFAULT_FILE_NAME};
use serde_json::json;
use std::env;
use std::path::PathBuf;
use std::process;

const DEFAULT_DIR: &str = "data";

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);

    let file = match take_option(&mut args, "--file", "-f") {
        Ok(Some(path)) => PathBuf::from(path),
        Ok(None) => PathBuf::from(DEFAULT_DIR).join(DEFAULT_FILE_NAME),
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            process::exit(1);
        }
    };

    let Some(command) = args.first().cloned() else {
        print_usage(&program);
        process::exit(1);
    };

    let store = ScoreStore::new(file);

    match command.as_str() {
        "list" => {
            let top = match take_option(&mut args, "--top", "-n") {
                Ok(Some(n)) => n.parse::<usize>().unwrap_or_else(|e| {
                    eprintln!("❌ Error: invalid --top value '{}': {}", n, e);
                    process::exit(1);
                }),
                Ok(None) => catch_core::constants::MAX_LISTED_SCORES,
                Err(e) => {
                    eprintln!("❌ Error: {}", e);
                    process::exit(1);
                }
            };
            list_command(&store, top);
        }

        "add" => {
            if args.len() < 3 {
                eprintln!("Usage: {} add <name> <score> [--file <path>]", program);
                process::exit(1);
            }
            add_command(&store, &args[1], &args[2]);
        }

        "check" => check_command(&store),

        "--help" | "-h" => {
            print_usage(&program);
            process::exit(0);
        }

        _ => {
            eprintln!("❌ Unknown command: {}", command);
            print_usage(&program);
            process::exit(1);
        }
    }
}

/// Remove `--flag value` from `args`, returning the value if present
fn take_option(args: &mut Vec<String>, long: &str, short: &str) -> Result<Option<String>, String> {
    let Some(idx) = args.iter().position(|a| a == long || a == short) else {
        return Ok(None);
    };
    if idx + 1 >= args.len() {
        return Err(format!("{} requires a value", long));
    }
    let value = args.remove(idx + 1);
    args.remove(idx);
    Ok(Some(value))
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [options] [--file <path>]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  list [--top N]");
    eprintln!("      Print the best N scores (default 10)");
    eprintln!();
    eprintln!("  add <name> <score>");
    eprintln!("      Record a score, keeping the best 50");
    eprintln!();
    eprintln!("  check");
    eprintln!("      Load the file, reporting invalid entries and recovering corruption");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --file, -f   Score file (default: {}/{})", DEFAULT_DIR, DEFAULT_FILE_NAME);
}

fn list_command(store: &ScoreStore, top: usize) {
    let entries = store.top(top).unwrap_or_else(|e| {
        eprintln!("❌ {}", e);
        process::exit(1);
    });

    println!("🏆 High scores ({})", store.path().display());
    println!("{}", "=".repeat(50));
    if entries.is_empty() {
        println!("  No scores yet!");
    }
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "  {:>2}. {:<24} {:>8}  {}",
            i + 1,
            entry.name,
            entry.score,
            entry.timestamp.as_deref().unwrap_or("")
        );
    }
}

fn add_command(store: &ScoreStore, name: &str, score: &str) {
    let body = json!({ "name": name, "score": serde_json::from_str::<serde_json::Value>(score).unwrap_or_default() });
    let submission = score_store::submission_from_value(&body).unwrap_or_else(|e| {
        eprintln!("❌ {}", e);
        process::exit(1);
    });

    match store.submit(&submission.name, submission.score) {
        Ok(entry) => {
            println!("✅ Recorded {} for {}", entry.score, entry.name);
        }
        Err(e) => {
            eprintln!("❌ Error saving score: {}", e);
            process::exit(1);
        }
    }
}

fn check_command(store: &ScoreStore) {
    match store.load() {
        Ok(entries) => {
            println!("✅ {} valid entries in {}", entries.len(), store.path().display());
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    }
}
