//! The stack executor.
//!
//! Execution has two phases. [`Executor::new`] allocates: every block of the
//! typed program, closures first, becomes a list of [`Step`]s, and every
//! step that produces a value gets a persistent holder of its type (the
//! literal, the registry prototype, or a type-directed default).
//! [`Executor::run`] then dispatches the steps left to right over a local
//! operand stack, with variables in a flat slot array shared by all blocks
//! of one run.
//!
//! Generators do not suspend: each pull from a generator stores the next
//! upstream element in the loop slot and re-runs the body block to
//! completion. A `try` generator drops the elements whose body fails.
//! Recursors run eagerly: they fold the whole sequence before pushing the
//! final accumulator.

use std::sync::Arc;

use parking_lot::Mutex;
use smallvec::SmallVec;

use sift_diagnostic::{corrupt_state, EngineError, Error, RuntimeError};
use sift_ir::{Block, Instruction, Op, Operand, Type};
use sift_types::{Program, Resolution};
use sift_value::{EvalResult, Iterate, MapMode, NativeFn, Sequence, Value};

use crate::operators;

type Stack = SmallVec<[Value; 8]>;

/// One allocated instruction.
enum Step {
    Push(Value),
    Read(usize),
    Write(usize),
    Binary(Op),
    Unary(Op),
    Rot,
    /// Integer to real; `depth` 0 is the top of the stack.
    ToReal {
        depth: usize,
    },
    Tuple(usize),
    Wrap,
    Generate {
        slot: usize,
        body: Arc<Vec<Step>>,
        skip_failures: bool,
    },
    /// Pop `(init, sequence)` and fold the body over it.
    Fold {
        slot: usize,
        body: Vec<Step>,
    },
    /// Drain a sequence into a copy of `holder`, an array or a map.
    Collect(Value),
    Call {
        native: NativeFn,
        holder: Value,
        nullary: bool,
    },
}

/// Variable slots of one run.
struct Frame {
    slots: Mutex<Vec<Value>>,
}

impl Frame {
    fn new(slots: usize) -> Self {
        Frame {
            slots: Mutex::new(vec![Value::unit(); slots]),
        }
    }

    fn get(&self, slot: usize) -> EvalResult {
        self.slots
            .lock()
            .get(slot)
            .cloned()
            .ok_or_else(|| corrupt_state("variable slot out of range"))
    }

    fn set(&self, slot: usize, value: Value) -> EvalResult<()> {
        let mut slots = self.slots.lock();
        let target = slots
            .get_mut(slot)
            .ok_or_else(|| corrupt_state("variable slot out of range"))?;
        *target = value;
        Ok(())
    }
}

/// An allocated program.
pub struct Executor {
    steps: Arc<Vec<Step>>,
    slots: usize,
}

impl Executor {
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn new(program: &Program, mode: MapMode) -> Result<Self, EngineError> {
        let allocator = Allocator {
            calls: &program.calls,
            mode,
        };
        let steps = allocator.block(&program.block)?;
        tracing::debug!(steps = steps.len(), slots = program.slots, "allocated");
        Ok(Executor {
            steps: Arc::new(steps),
            slots: program.slots.max(1),
        })
    }

    /// Run with `@` bound to `input`. The result may be a lazy sequence.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&self, input: Value) -> Result<Value, Error> {
        let frame = Arc::new(Frame::new(self.slots));
        frame.set(0, input)?;
        let mut stack = run_block(&self.steps, &frame)?;
        match (stack.pop(), stack.is_empty()) {
            (Some(result), true) => Ok(result),
            _ => Err(EngineError::new("program did not leave exactly one value").into()),
        }
    }
}

struct Allocator<'a> {
    calls: &'a [Resolution],
    mode: MapMode,
}

impl Allocator<'_> {
    fn block(&self, block: &Block) -> Result<Vec<Step>, EngineError> {
        sift_ir::ensure_sufficient_stack(|| block.iter().map(|instr| self.step(instr)).collect())
    }

    fn slot(instr: &Instruction) -> Result<usize, EngineError> {
        instr
            .slot()
            .map(|s| s as usize)
            .ok_or_else(|| EngineError::new(format!("unresolved variable in {}", instr.op)))
    }

    /// The single closure left once the source has been spliced.
    fn body(instr: &Instruction) -> Result<&Block, EngineError> {
        match instr.closures.as_slice() {
            [body] => Ok(body),
            _ => Err(EngineError::new(format!("{} source was not spliced", instr.op))),
        }
    }

    fn holder(&self, instr: &Instruction) -> Value {
        Value::default_for(instr.ty.as_ref().unwrap_or(&Type::None), self.mode)
    }

    fn step(&self, instr: &Instruction) -> Result<Step, EngineError> {
        Ok(match instr.op {
            Op::Val => match instr.atom() {
                Some(atom) => Step::Push(Value::from_atom(atom)),
                None => return Err(EngineError::new("literal without a value")),
            },
            Op::Var => Step::Read(Self::slot(instr)?),
            Op::Vaw => Step::Write(Self::slot(instr)?),
            Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Mod | Op::Pow | Op::And | Op::Or
            | Op::Xor | Op::Eq | Op::Lt => Step::Binary(instr.op),
            Op::Not | Op::BitNot => Step::Unary(instr.op),
            Op::Rot => Step::Rot,
            Op::I2R1 | Op::U2R1 => Step::ToReal { depth: 0 },
            Op::I2R2 | Op::U2R2 => Step::ToReal { depth: 1 },
            Op::Tup => match instr.arg {
                Operand::Tuple { arity, .. } if arity > 0 => Step::Tuple(arity as usize),
                _ => return Err(EngineError::new("tuple without inferred arity")),
            },
            Op::Seq => Step::Wrap,
            Op::Gen | Op::GenTry => Step::Generate {
                slot: Self::slot(instr)?,
                body: Arc::new(self.block(Self::body(instr)?)?),
                skip_failures: instr.op == Op::GenTry,
            },
            Op::Rec => Step::Fold {
                slot: Self::slot(instr)?,
                body: self.block(Self::body(instr)?)?,
            },
            Op::Def => return Err(EngineError::new("definition survived inference")),
            Op::Arr | Op::Map => Step::Collect(self.holder(instr)),
            Op::Call | Op::Call0 | Op::Index => {
                let resolution = instr
                    .call
                    .and_then(|id| self.calls.get(id.index()))
                    .ok_or_else(|| EngineError::new(format!("unresolved {}", instr.op)))?;
                Step::Call {
                    native: Arc::clone(&resolution.native),
                    holder: resolution
                        .prototype
                        .clone()
                        .unwrap_or_else(|| self.holder(instr)),
                    nullary: instr.op == Op::Call0,
                }
            }
        })
    }
}

fn pop(stack: &mut Stack) -> EvalResult {
    stack.pop().ok_or_else(|| corrupt_state("operand stack underflow"))
}

fn run_block(steps: &[Step], frame: &Arc<Frame>) -> EvalResult<Stack> {
    let mut stack = Stack::new();
    for step in steps {
        match step {
            Step::Push(v) => stack.push(v.clone()),
            Step::Read(slot) => stack.push(frame.get(*slot)?),
            Step::Write(slot) => frame.set(*slot, pop(&mut stack)?)?,
            Step::Binary(op) => {
                let right = pop(&mut stack)?;
                let left = pop(&mut stack)?;
                stack.push(operators::binary(*op, &left, &right)?);
            }
            Step::Unary(op) => {
                let v = pop(&mut stack)?;
                stack.push(operators::unary(*op, &v)?);
            }
            Step::Rot => {
                let n = stack.len();
                if n < 2 {
                    return Err(corrupt_state("operand stack underflow"));
                }
                stack.swap(n - 1, n - 2);
            }
            Step::ToReal { depth } => {
                let i = stack
                    .len()
                    .checked_sub(depth + 1)
                    .ok_or_else(|| corrupt_state("operand stack underflow"))?;
                stack[i] = operators::to_real(&stack[i])?;
            }
            Step::Tuple(arity) => {
                let start = stack
                    .len()
                    .checked_sub(*arity)
                    .ok_or_else(|| corrupt_state("operand stack underflow"))?;
                let items: Vec<Value> = stack.drain(start..).collect();
                stack.push(Value::tuple(items));
            }
            Step::Wrap => {
                let v = pop(&mut stack)?;
                stack.push(Value::seq(Sequence::wrap(v)));
            }
            Step::Generate {
                slot,
                body,
                skip_failures,
            } => {
                let upstream = Sequence::wrap(pop(&mut stack)?);
                stack.push(Value::seq(Sequence::new(Generator {
                    upstream,
                    body: Arc::clone(body),
                    frame: Arc::clone(frame),
                    slot: *slot,
                    skip_failures: *skip_failures,
                })));
            }
            Step::Fold { slot, body } => {
                let Value::Tuple(source) = pop(&mut stack)? else {
                    return Err(corrupt_state("recursor source is not a pair"));
                };
                let [init, seq] = source.as_slice() else {
                    return Err(corrupt_state("recursor source is not a pair"));
                };
                let seq = Sequence::wrap(seq.clone());
                let mut work = init.clone();
                while let Some(item) = seq.next()? {
                    frame.set(*slot, Value::tuple(vec![work, item]))?;
                    work = single(run_block(body, frame)?, "recursor body did not leave one value")?;
                }
                stack.push(work);
            }
            Step::Collect(holder) => {
                let seq = Sequence::wrap(pop(&mut stack)?);
                let mut out = holder.clone();
                match &mut out {
                    Value::Array(array) => array.make_mut().fill(&seq)?,
                    Value::Map(map) => map.make_mut().fill(&seq)?,
                    _ => return Err(corrupt_state("collecting into a non-container")),
                }
                stack.push(out);
            }
            Step::Call {
                native,
                holder,
                nullary,
            } => {
                let input = if *nullary {
                    Value::unit()
                } else {
                    pop(&mut stack)?
                };
                let mut out = holder.clone();
                native(&input, &mut out)?;
                stack.push(out);
            }
        }
    }
    Ok(stack)
}

fn single(mut stack: Stack, what: &'static str) -> EvalResult {
    match (stack.pop(), stack.is_empty()) {
        (Some(v), true) => Ok(v),
        _ => Err(corrupt_state(what)),
    }
}

/// Lazy `[body : source]`.
struct Generator {
    upstream: Sequence,
    body: Arc<Vec<Step>>,
    frame: Arc<Frame>,
    slot: usize,
    /// Failures of the upstream sequence still propagate.
    skip_failures: bool,
}

impl Iterate for Generator {
    fn next(&mut self) -> EvalResult<Option<Value>> {
        loop {
            let Some(item) = self.upstream.next()? else {
                return Ok(None);
            };
            self.frame.set(self.slot, item)?;
            match run_block(&self.body, &self.frame) {
                Ok(stack) => {
                    return single(stack, "generator body did not leave one value").map(Some)
                }
                Err(err @ RuntimeError::Corrupt(_)) => return Err(err),
                Err(err) if self.skip_failures => {
                    tracing::trace!(%err, "skipping element");
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
