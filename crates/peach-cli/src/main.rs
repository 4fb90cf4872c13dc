//! Command-line driver for Peach.
//!
//! `peach` with no arguments starts an interactive REPL; `peach PATH` runs
//! a script file. Exit codes follow the sysexits convention: 65 for a
//! compile error, 70 for a runtime error, 74 for an I/O error.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use peach::{Error, Vm};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "peach")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "The Peach scripting language", long_about = None)]
struct Args {
    /// Script to run; starts a REPL when omitted
    path: Option<PathBuf>,

    /// Print the compiled bytecode instead of running the script
    #[arg(long)]
    dump: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match &args.path {
        Some(path) => run_file(path, args.dump),
        None => repl(),
    }
}

fn repl() -> ExitCode {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("Could not start line editor: {err}");
            return ExitCode::from(74);
        }
    };

    let mut vm = Vm::new();
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                let result = vm.interpret(&line);
                for printed in vm.take_print_output() {
                    println!("{printed}");
                }
                // Errors don't end the session; globals defined by the
                // statements that did run are still visible.
                if let Err(err) = result {
                    eprintln!("{err}");
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::from(74);
            }
        }
    }
    ExitCode::SUCCESS
}

fn run_file(path: &Path, dump: bool) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Could not read file \"{}\": {err}", path.display());
            return ExitCode::from(74);
        }
    };

    if dump {
        return match peach::disassemble(&source) {
            Ok(text) => {
                print!("{text}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{err}");
                ExitCode::from(65)
            }
        };
    }

    let mut vm = Vm::new();
    let result = vm.interpret(&source);
    for printed in vm.take_print_output() {
        println!("{printed}");
    }
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ Error::Compile(_)) => {
            eprintln!("{err}");
            ExitCode::from(65)
        }
        Err(err @ Error::Runtime(_)) => {
            eprintln!("{err}");
            ExitCode::from(70)
        }
    }
}
