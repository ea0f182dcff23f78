mod cli;
mod repl;
mod rlpl;
mod rppl;

use std::path::PathBuf;

use clap::Parser;
use cli::print_running;
use lume_core::{
    eval::{eval, new_root_env},
    parser::prelude::parse,
    utils::prelude::Error
};

#[derive(Parser)]
enum Command {
    /// Parses and evaluates a source file
    Run {
        /// Path of source file
        path: PathBuf,
        /// Print the parsed program before evaluating it
        #[arg(long, default_value_t = false)]
        print_ast: bool,
    },
    /// Runs Read Evaluate Print Loop
    Repl,
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl
}

fn main() {
    match Command::parse() {
        Command::Run { path, print_ast } => run(path, print_ast),
        Command::Repl => {
            let _ = repl::start();
        },
        Command::Rlpl => {
            let _ = rlpl::start();
        },
        Command::Rppl => {
            let _ = rppl::start();
        }
    }
}

fn run(path: PathBuf, print_ast: bool) {
    let src = match std::fs::read_to_string(&path) {
        Ok(src) => src,
        Err(err) => {
            print_error(&Error::StdIo { err: err.kind() });
            std::process::exit(1);
        }
    };

    print_running(path.to_str().unwrap_or_default());

    let (program, errors) = parse(&src);

    if !errors.is_empty() {
        print_error(&Error::Parse { path, src, errors });
        std::process::exit(1);
    }

    if print_ast {
        println!("{program}");
    }

    let result = eval(&program, new_root_env());

    if result.is_error() {
        eprintln!("{result}");
        std::process::exit(1);
    }
}

fn print_error(error: &Error) {
    let buf_writer = cli::stderr_buffer_writer();
    let mut buf = buf_writer.buffer();

    error.pretty(&mut buf);
    buf_writer
        .print(&buf)
        .expect("Writing error to stderr");
}
