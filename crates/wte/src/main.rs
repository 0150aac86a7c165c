#![forbid(unsafe_code)]

//! `wte` binary entry point.

use std::io;
use std::process;

use wte::cli::Opts;
use wte::{logging, run};

fn main() {
    let opts = Opts::parse();
    logging::init(opts.log_json);

    let mut stdout = io::stdout().lock();
    match run::run(&opts, &mut stdout) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("wte: {err}");
            process::exit(err.exit_code());
        }
    }
}
