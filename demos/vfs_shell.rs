//! A tiny shell over a mounted tree.
//!
//! ```text
//! cargo run --example vfs_shell -- tree.json [startup-script]
//! ```
//!
//! The startup script is played line by line before the interactive prompt; a failing line is
//! reported and the script goes on. Set `RUST_LOG=debug` to see mounts and directory changes.

use std::io::{BufRead, Write};

use vfs_tree::{Navigator, NodeKind, Result, Session};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut session = Session::new();
    if let Some(tree_path) = args.next() {
        session.mount_file(&tree_path)?;
    }

    if let Some(script_path) = args.next() {
        let script = std::fs::read_to_string(&script_path)?;
        for line in script.lines() {
            println!("{} $ {}", session.current_path(), line);
            if !execute(&mut session, line) {
                return Ok(());
            }
        }
    }

    let stdin = std::io::stdin();
    loop {
        print!("{} $ ", session.current_path());
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        if !execute(&mut session, &line) {
            return Ok(());
        }
    }
}

/// Runs one command line. Returns `false` when the shell should stop.
fn execute(session: &mut Session, line: &str) -> bool {
    let Some(parts) = shlex::split(line) else {
        eprintln!("vfs: syntax error: unbalanced quotes");
        return true;
    };
    let Some((command, args)) = parts.split_first() else {
        return true;
    };
    let command = command.as_str();
    let arg = args.first().map(String::as_str).unwrap_or("");

    let outcome = match command {
        "exit" => return false,
        "pwd" => {
            println!("{}", session.current_path());
            Ok(())
        }
        "cd" => session
            .change_dir(if arg.is_empty() { "/" } else { arg })
            .map(|_| ()),
        "ls" => session.list(arg).map(|entries| {
            for (name, is_dir) in entries {
                println!("{}{}", name, if is_dir { "/" } else { "" });
            }
        }),
        "tree" => session.walk(arg).map(|nodes| {
            for (path, kind) in nodes {
                let suffix = if kind == NodeKind::Directory { "/" } else { "" };
                println!("{path}{suffix}");
            }
        }),
        "cat" => session
            .read_file(arg)
            .map(|content| println!("{}", String::from_utf8_lossy(&content))),
        "stats" => {
            let (dirs, files) = session.stats();
            println!("{dirs} directories, {files} files");
            Ok(())
        }
        _ => {
            eprintln!("vfs: command not found: {command}");
            Ok(())
        }
    };

    if let Err(e) = outcome {
        eprintln!("vfs: {command}: {e}");
    }
    true
}
