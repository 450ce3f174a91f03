//! Scatter/gather execution.
//!
//! The program is split at the first `-->`. Every worker runs its own
//! compiled copy of the scatter half on its own thread, pulling lines one at
//! a time from a shared source, and streams its output through a bounded
//! channel. The gather half runs on the calling thread over the merged
//! stream. Elements keep their order within a worker; there is no order
//! across workers.

use crossbeam::channel::{self, Receiver, Select, Sender};
use rayon::prelude::*;

use sift_diagnostic::{worker_failed, EngineError, Error, Result, TypeError};
use sift_eval::Executor;
use sift_ir::Type;
use sift_types::Program;
use sift_value::{EvalResult, Iterate, Sequence, Value};

use crate::input::SharedSource;
use crate::Session;

/// Separates the scatter and gather halves of a program.
pub const SPLIT: &str = "-->";

/// The two halves of a parallel program.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Split<'a> {
    pub scatter: &'a str,
    /// `@` when the program has no gather half.
    pub gather: &'a str,
    /// Byte offset of `gather` in the whole program.
    pub gather_offset: usize,
}

impl<'a> Split<'a> {
    pub fn new(source: &'a str) -> Self {
        match source.find(SPLIT) {
            Some(at) => {
                let gather_offset = at + SPLIT.len();
                let gather = &source[gather_offset..];
                Split {
                    scatter: &source[..at],
                    gather: if gather.trim().is_empty() { "@" } else { gather },
                    gather_offset,
                }
            }
            None => Split {
                scatter: source,
                gather: "@",
                gather_offset: source.len(),
            },
        }
    }
}

type Item = EvalResult<Value>;

/// Run `source` with `workers` scatter threads over `input` and render the
/// gathered result.
#[tracing::instrument(level = "debug", skip_all, fields(workers = workers))]
pub fn run(session: &Session, source: &str, workers: usize, input: impl Iterate + 'static) -> Result<String> {
    let split = Split::new(source);
    let workers = workers.max(1);
    let lines = Type::seq(Type::string());

    let compiled = (0..workers)
        .into_par_iter()
        .map(|index| {
            let mut worker = session.fork();
            if index > 0 {
                worker = worker.with_verbosity(0);
            }
            let program = worker.compile(split.scatter, &lines)?;
            let executor = worker.executor(&program)?;
            Ok((program, executor))
        })
        .collect::<Result<Vec<(Program, Executor)>>>()?;

    let Some((first, _)) = compiled.first() else {
        return Err(EngineError::new("no scatter workers").into());
    };
    let output = first.result.as_seq();
    if let Some(elem) = output.seq_element().filter(|t| t.contains_seq()) {
        return Err(TypeError::StoredSequence {
            context: "worker output",
            found: elem.clone(),
        }
        .into());
    }

    let mut gatherer = session.fork();
    let gather = match gatherer.compile(split.gather, &output) {
        Err(Error::Parse(mut err)) => {
            err.offset += split.gather_offset;
            return Err(err.into());
        }
        other => other?,
    };
    let gather = gatherer.executor(&gather)?;
    tracing::debug!(workers, output = %output, "scatter/gather compiled");

    let shared = SharedSource::new(input);
    std::thread::scope(|scope| -> Result<String> {
        let mut receivers = Vec::with_capacity(compiled.len());
        for (index, (_, executor)) in compiled.iter().enumerate() {
            let (tx, rx) = channel::bounded(1);
            let lines = shared.sequence();
            scope.spawn(move || scatter(index, executor, lines, &tx));
            receivers.push(rx);
        }
        let merged = Value::seq(Sequence::new(Merge { receivers }));
        let result = gather.run(merged)?;
        Ok(result.to_text()?)
    })
}

/// Body of one worker thread.
fn scatter(index: usize, executor: &Executor, lines: Sequence, out: &Sender<Item>) {
    let _span = tracing::debug_span!("worker", index).entered();
    let produced = match executor.run(Value::seq(lines)) {
        Ok(value) => Sequence::wrap(value),
        Err(err) => {
            let _ = out.send(Err(worker_failed(index, err.to_string())));
            return;
        }
    };
    let mut sent = 0usize;
    loop {
        let item = match produced.next() {
            Ok(Some(value)) => Ok(value),
            Ok(None) => break,
            Err(err) => Err(worker_failed(index, err.to_string())),
        };
        let failed = item.is_err();
        // A send fails once the gather side has stopped listening.
        if out.send(item).is_err() || failed {
            break;
        }
        sent += 1;
    }
    tracing::debug!(sent, "worker finished");
}

/// Fan-in over the live worker channels.
struct Merge {
    receivers: Vec<Receiver<Item>>,
}

impl Iterate for Merge {
    fn next(&mut self) -> EvalResult<Option<Value>> {
        while !self.receivers.is_empty() {
            let (index, received) = {
                let mut select = Select::new();
                for rx in &self.receivers {
                    select.recv(rx);
                }
                let op = select.select();
                let index = op.index();
                (index, op.recv(&self.receivers[index]))
            };
            match received {
                Ok(item) => return item.map(Some),
                Err(_) => {
                    self.receivers.swap_remove(index);
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
