//! sift command-line interface.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::process::exit;
use std::sync::Arc;

use sift_diagnostic::{render_parse_error, Error};
use siftc::{help, Config, Session};

fn main() {
    siftc::init_tracing();

    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => fail(&err.to_string()),
    };

    if let Some(name) = &config.help {
        match help::section(name) {
            Some(text) => print!("{text}"),
            None => fail(&format!(
                "unknown help section '{name}' (sections: {})",
                help::SECTIONS.join(", ")
            )),
        }
        return;
    }

    let source = match config.source() {
        Ok(source) => source,
        Err(err) => fail(&format!("could not read program file: {err}")),
    };

    let reader: Box<dyn BufRead + Send> = match &config.input {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(err) => fail(&format!("could not open {}: {err}", path.display())),
        },
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let session = Session::new(Arc::new(sift_eval::default_registry()), config.map_mode)
        .with_seed(config.seed)
        .with_verbosity(config.verbosity);

    match siftc::execute(session, &config, &source, reader) {
        Ok(text) => println!("{text}"),
        Err(err) => {
            tracing::debug!(layer = err.layer(), "run failed");
            eprintln!("ERROR: {err}");
            if let Error::Parse(parse) = &err {
                eprint!("{}", render_parse_error(parse, &source));
            }
            exit(1);
        }
    }
}

fn fail(message: &str) -> ! {
    eprintln!("ERROR: {message}");
    exit(1);
}
