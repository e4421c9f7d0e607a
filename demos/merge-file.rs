use std::{env, fs, process};

use converge_text::reconcile;

/// Merges three versions of a file: mine, base, and theirs.
/// Implement a trivial version git merge-file (https://git-scm.com/docs/git-merge-file)
///
/// Run it with:
/// `cargo run --example merge-file my.txt base.txt their.txt [output_file.txt]`
fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 || args.len() > 5 {
        eprintln!("Usage: merge-file <mine> <base> <theirs> [output]");
        process::exit(1);
    }

    let mine_content = read(&args[1]);
    let base_content = read(&args[2]);
    let theirs_content = read(&args[3]);

    let merged_content =
        reconcile(&base_content, &mine_content, &theirs_content).unwrap_or_else(|e| {
            eprintln!("Error merging: {e}");
            process::exit(1);
        });

    if let Some(output_path) = args.get(4) {
        if let Err(e) = fs::write(output_path, merged_content) {
            eprintln!("Error writing to {output_path}: {e}");
            process::exit(1);
        }
    } else {
        print!("{merged_content}");
    }
}

fn read(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {path}: {e}");
        process::exit(1);
    })
}
