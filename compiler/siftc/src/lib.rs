//! The sift driver.
//!
//! [`Session`] runs the compile pipeline (parse, infer, optimize) and the
//! executor; [`execute`] picks the serial or scatter/gather path for a
//! [`Config`]. The `sift` binary is a thin wrapper around these.

mod config;
pub mod help;
mod input;
pub mod parallel;
mod session;

use std::io::BufRead;
use std::sync::Once;

use sift_diagnostic::Result;
use sift_ir::Type;
use sift_value::Value;

pub use config::{Config, ConfigError};
pub use input::{lines, Lines, SharedSource};
pub use session::Session;

/// Compile and run `source` over the lines of `reader`, returning the text
/// to print.
pub fn execute(
    mut session: Session,
    config: &Config,
    source: &str,
    reader: impl BufRead + Send + 'static,
) -> Result<String> {
    if config.is_parallel(source) {
        let workers = config.workers.unwrap_or(1);
        return parallel::run(&session, source, workers, Lines::new(reader));
    }
    let program = session.compile(source, &Type::seq(Type::string()))?;
    let value = session.run(&program, Value::seq(lines(reader)))?;
    session.render(&value)
}

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Does nothing unless `SIFT_LOG` or `RUST_LOG` holds a filter, e.g.
/// `SIFT_LOG=sift_types=trace`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        let Some(filter) = ["SIFT_LOG", "RUST_LOG"]
            .into_iter()
            .find_map(|var| std::env::var(var).ok())
        else {
            return;
        };
        tracing_subscriber::registry()
            .with(
                HierarchicalLayer::new(2)
                    .with_writer(std::io::stderr)
                    .with_targets(true),
            )
            .with(EnvFilter::new(filter))
            .init();
    });
}
