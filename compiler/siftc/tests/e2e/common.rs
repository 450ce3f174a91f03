use std::io::Cursor;
use std::sync::Arc;

use sift_diagnostic::Error;
use siftc::{Config, Session};

/// Run `args` (as given on the command line) over `input`.
pub fn sift(args: &[&str], input: &str) -> Result<String, Error> {
    let config = Config::from_args(args.iter().map(ToString::to_string)).unwrap();
    let source = config.source().unwrap();
    let session = Session::new(Arc::new(sift_eval::default_registry()), config.map_mode)
        .with_seed(config.seed);
    siftc::execute(session, &config, &source, Cursor::new(input.to_string()))
}

/// Like [`sift`] with key-ordered maps, expecting success.
pub fn sorted(expression: &str, input: &str) -> String {
    sift(&["-s", expression], input).unwrap()
}
