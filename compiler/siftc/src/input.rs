//! Line input.

use std::io::BufRead;
use std::sync::Arc;

use parking_lot::Mutex;
use sift_diagnostic::input_failed;
use sift_value::{EvalResult, Iterate, Sequence, Value};

/// Lines of a reader with the line terminator (`\n` or `\r\n`) removed.
pub struct Lines<R> {
    reader: R,
    buf: String,
}

impl<R: BufRead + Send> Lines<R> {
    pub fn new(reader: R) -> Self {
        Lines {
            reader,
            buf: String::new(),
        }
    }
}

impl<R: BufRead + Send> Iterate for Lines<R> {
    fn next(&mut self) -> EvalResult<Option<Value>> {
        self.buf.clear();
        let read = self.reader.read_line(&mut self.buf).map_err(|e| input_failed(&e))?;
        if read == 0 {
            return Ok(None);
        }
        let line = self.buf.strip_suffix('\n').unwrap_or(&self.buf);
        let line = line.strip_suffix('\r').unwrap_or(line);
        Ok(Some(Value::string(line)))
    }
}

/// The lines of `reader` as a sequence.
pub fn lines(reader: impl BufRead + Send + 'static) -> Sequence {
    Sequence::new(Lines::new(reader))
}

/// One upstream shared by several consumers on different threads.
///
/// Unlike cloning a [`Sequence`], which fails on concurrent pulls, each
/// pull here waits for the lock, so consumers take turns one element at a
/// time.
#[derive(Clone)]
pub struct SharedSource(Arc<Mutex<Box<dyn Iterate>>>);

impl SharedSource {
    pub fn new(source: impl Iterate + 'static) -> Self {
        SharedSource(Arc::new(Mutex::new(Box::new(source))))
    }

    /// A per-consumer handle.
    pub fn sequence(&self) -> Sequence {
        Sequence::new(self.clone())
    }
}

impl Iterate for SharedSource {
    fn next(&mut self) -> EvalResult<Option<Value>> {
        self.0.lock().next()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
