//! Compile session: parse, infer, optimize, allocate.

use std::sync::Arc;

use sift_diagnostic::Result;
use sift_eval::Executor;
use sift_ir::{dump_block, Block, StringInterner, Type};
use sift_types::{infer, Program, Registry};
use sift_value::{MapMode, Value};

/// State shared by every compilation of one invocation.
///
/// The interner belongs to the session; workers compiled on other threads
/// each get their own session through [`Session::fork`].
pub struct Session {
    interner: StringInterner,
    registry: Arc<Registry>,
    mode: MapMode,
    seed: Option<u64>,
    verbosity: u8,
}

impl Session {
    pub fn new(registry: Arc<Registry>, mode: MapMode) -> Self {
        Session {
            interner: StringInterner::new(),
            registry,
            mode,
            seed: None,
            verbosity: 0,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// `-v` level: 1 reports result types, 2 typed programs, 3 parse trees.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// A fresh session over the same registry and settings.
    #[must_use]
    pub fn fork(&self) -> Session {
        Session {
            interner: StringInterner::new(),
            registry: Arc::clone(&self.registry),
            mode: self.mode,
            seed: self.seed,
            verbosity: self.verbosity,
        }
    }

    pub fn map_mode(&self) -> MapMode {
        self.mode
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn parse(&mut self, source: &str) -> Result<Block> {
        Ok(sift_parse::parse(source, &mut self.interner)?)
    }

    /// Compile `source` with `@` of type `input`.
    #[tracing::instrument(level = "debug", skip_all, fields(input = %input))]
    pub fn compile(&mut self, source: &str, input: &Type) -> Result<Program> {
        let block = self.parse(source)?;
        if self.verbosity >= 3 {
            eprintln!("Parse tree:\n{}", dump_block(&block, &self.interner, false));
        }
        let mut program = infer(block, input, &self.registry, &self.interner, self.mode)?;
        let removed = sift_opt::optimize(&mut program.block);
        tracing::debug!(removed, result = %program.result, "compiled");
        if self.verbosity >= 2 {
            eprintln!("Program:\n{}", self.dump(&program));
        }
        if self.verbosity >= 1 {
            eprintln!("Type: {}", program.result);
        }
        Ok(program)
    }

    /// Typed rendering of a compiled program.
    pub fn dump(&self, program: &Program) -> String {
        dump_block(&program.block, &self.interner, true)
    }

    pub fn executor(&self, program: &Program) -> Result<Executor> {
        Ok(Executor::new(program, self.mode)?)
    }

    /// Run `program` with `@` bound to `input`. The result may be lazy.
    pub fn run(&self, program: &Program, input: Value) -> Result<Value> {
        self.executor(program)?.run(input)
    }

    /// Output text of a value, consuming any sequences in it.
    pub fn render(&self, value: &Value) -> Result<String> {
        Ok(value.to_text()?)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
