//! Type inference over the stack bytecode.
//!
//! Each block is rewritten as it is walked: instructions are moved from the
//! input into a fresh output block, with spliced code (conversions, argument
//! and source blocks) inserted ahead of the instruction that needs it. Each
//! nested block is inferred against its own type stack.

use std::mem;

use sift_diagnostic::{EngineError, Error, ResolutionError, Result, TypeError};
use sift_ir::{
    ensure_sufficient_stack, Atom, Block, CallId, Instruction, Name, Op, Operand,
    StringInterner, Type,
};
use sift_value::index::{array_element, array_slice, map_lookup, substring, tuple_field};
use sift_value::MapMode;

use crate::registry::{lift, Registry, Resolution};
use crate::scope::Scopes;

/// A typed program, ready for optimization and execution.
#[derive(Debug)]
pub struct Program {
    pub block: Block,
    /// Resolved natives, indexed by [`CallId`].
    pub calls: Vec<Resolution>,
    /// Number of variable slots.
    pub slots: usize,
    pub result: Type,
}

/// Infer `block` with `@` bound to `input`.
#[tracing::instrument(level = "debug", skip_all, fields(input = %input))]
pub fn infer(
    mut block: Block,
    input: &Type,
    registry: &Registry,
    interner: &StringInterner,
    mode: MapMode,
) -> Result<Program> {
    let mut cx = Inferencer {
        registry,
        interner,
        mode,
        scopes: Scopes::new(),
        calls: Vec::new(),
        defining: Vec::new(),
    };
    cx.scopes.bind(Name::AT, input.clone());

    let mut types = cx.infer_block(&mut block)?;
    let result = match types.len() {
        0 => return Err(TypeError::ComputesNothing.into()),
        1 => types.pop().unwrap_or_default(),
        n => return Err(EngineError::new(format!("inferred {n} result types")).into()),
    };
    tracing::debug!(%result, slots = cx.scopes.slot_count(), calls = cx.calls.len(), "inferred");

    Ok(Program {
        block,
        calls: cx.calls,
        slots: cx.scopes.slot_count() as usize,
        result,
    })
}

struct Inferencer<'a> {
    registry: &'a Registry,
    interner: &'a StringInterner,
    mode: MapMode,
    scopes: Scopes,
    calls: Vec<Resolution>,
    /// Definitions being inlined, innermost last.
    defining: Vec<Name>,
}

fn pop(stack: &mut Vec<Type>) -> Result<Type> {
    stack
        .pop()
        .ok_or_else(|| EngineError::new("type stack underflow").into())
}

fn conversion(op: Op, ty: Type) -> Instruction {
    let mut instr = Instruction::new(op);
    instr.ty = Some(ty);
    instr
}

impl Inferencer<'_> {
    /// Rewrite `block` in place and return its final type stack.
    fn infer_block(&mut self, block: &mut Block) -> Result<Vec<Type>> {
        ensure_sufficient_stack(|| {
            let input = mem::take(block);
            block.reserve(input.len());
            let mut stack = Vec::new();
            for instr in input {
                self.infer_instr(instr, block, &mut stack)?;
            }
            Ok(stack)
        })
    }

    /// Infer a nested block that must leave exactly one value.
    fn infer_single(&mut self, block: &mut Block) -> Result<Type> {
        let mut types = self.infer_block(block)?;
        match types.len() {
            0 => Err(TypeError::ComputesNothing.into()),
            1 => pop(&mut types),
            n => Err(EngineError::new(format!("nested block left {n} values")).into()),
        }
    }

    fn infer_instr(
        &mut self,
        mut instr: Instruction,
        out: &mut Block,
        stack: &mut Vec<Type>,
    ) -> Result<()> {
        let ty = match instr.op {
            Op::Val => match instr.atom() {
                Some(atom) => Type::Atom(atom.ty()),
                None => return Err(EngineError::new("literal without a value").into()),
            },
            Op::Var => {
                let name = self.name_of(&instr)?;
                let binding = self.scopes.lookup(name).ok_or_else(|| {
                    TypeError::UndefinedVariable(self.interner.lookup(name).to_string())
                })?;
                instr.arg = Operand::Slot {
                    name,
                    slot: binding.slot,
                };
                binding.ty.clone()
            }
            Op::Vaw => {
                let name = self.name_of(&instr)?;
                let ty = pop(stack)?;
                let slot = self.scopes.bind(name, ty.clone());
                instr.arg = Operand::Slot { name, slot };
                instr.ty = Some(ty);
                out.push(instr);
                return Ok(());
            }
            op if op.is_arithmetic() => self.arithmetic(op, out, stack)?,
            Op::Mod | Op::And | Op::Or | Op::Xor => {
                let right = pop(stack)?;
                let left = pop(stack)?;
                for t in [&left, &right] {
                    if !t.is_integer() {
                        return Err(TypeError::NonInteger {
                            op: instr.op.symbol(),
                            found: t.clone(),
                        }
                        .into());
                    }
                }
                if instr.op != Op::Mod && left.is_uint() && right.is_uint() {
                    Type::uint()
                } else {
                    Type::int()
                }
            }
            Op::BitNot | Op::Not => {
                let t = pop(stack)?;
                if !t.is_integer() {
                    return Err(TypeError::NonInteger {
                        op: instr.op.symbol(),
                        found: t,
                    }
                    .into());
                }
                if instr.op == Op::Not {
                    Type::uint()
                } else {
                    t
                }
            }
            Op::Eq | Op::Lt => {
                let right = pop(stack)?;
                let left = pop(stack)?;
                if left != right {
                    return Err(TypeError::CompareMismatch { left, right }.into());
                }
                Type::uint()
            }
            Op::Rot => {
                let top = pop(stack)?;
                let below = pop(stack)?;
                stack.push(top);
                below
            }
            Op::I2R1 | Op::U2R1 => {
                let t = pop(stack)?;
                integer_operand(instr.op, &t)?;
                Type::real()
            }
            Op::I2R2 | Op::U2R2 => {
                let top = pop(stack)?;
                let below = pop(stack)?;
                integer_operand(instr.op, &below)?;
                stack.push(Type::real());
                top
            }
            Op::Tup => match tuple(&mut instr, stack)? {
                Some(t) => t,
                None => return Ok(()),
            },
            Op::Seq => {
                let top = pop(stack)?;
                match top.wrapped_seq() {
                    Some(wrapped) => wrapped,
                    None => {
                        stack.push(top);
                        return Ok(());
                    }
                }
            }
            Op::Arr => {
                let elem = sequence_element("array construction", pop(stack)?)?;
                if elem.contains_seq() {
                    return Err(TypeError::StoredSequence {
                        context: "array",
                        found: elem,
                    }
                    .into());
                }
                Type::array(elem)
            }
            Op::Map => {
                let elem = sequence_element("map construction", pop(stack)?)?;
                let mut pair = match elem {
                    Type::Tuple(pair) if pair.len() == 2 => pair,
                    other => return Err(TypeError::NotAPair(other).into()),
                };
                let whole = Type::Tuple(pair.clone());
                if whole.contains_seq() {
                    return Err(TypeError::StoredSequence {
                        context: "map",
                        found: whole,
                    }
                    .into());
                }
                let value = pair.pop().unwrap_or_default();
                let key = pair.pop().unwrap_or_default();
                Type::map(key, value)
            }
            Op::Gen | Op::GenTry => self.generator(&mut instr, out, stack)?,
            Op::Rec => self.recursor(&mut instr, out)?,
            Op::Def => {
                let name = self.name_of(&instr)?;
                let body = instr
                    .closures
                    .pop()
                    .ok_or_else(|| Error::from(EngineError::new("definition without a body")))?;
                self.scopes.define(name, body);
                return Ok(());
            }
            Op::Call | Op::Call0 => {
                let name = self.name_of(&instr)?;
                if let Some(body) = self.scopes.definition(name).cloned() {
                    let ty = self.inline(name, body, &mut instr, out, stack)?;
                    stack.push(ty);
                    return Ok(());
                }
                self.call(&mut instr, out, stack)?
            }
            Op::Index => self.index(&mut instr, out, stack)?,
            op => {
                return Err(EngineError::new(format!("unexpected {op} during inference")).into())
            }
        };

        instr.ty = Some(ty.clone());
        stack.push(ty);
        out.push(instr);
        Ok(())
    }

    fn name_of(&self, instr: &Instruction) -> Result<Name> {
        instr
            .name()
            .ok_or_else(|| EngineError::new(format!("{} without a name", instr.op)).into())
    }

    /// Numeric promotion for `+ - * / **`.
    fn arithmetic(&mut self, op: Op, out: &mut Block, stack: &mut Vec<Type>) -> Result<Type> {
        let right = pop(stack)?;
        let left = pop(stack)?;
        for t in [&left, &right] {
            if !t.is_numeric() {
                return Err(TypeError::NonNumeric {
                    op: op.symbol(),
                    found: t.clone(),
                }
                .into());
            }
        }

        if left.is_real() || right.is_real() {
            if !left.is_real() {
                let convert = if left.is_uint() { Op::U2R2 } else { Op::I2R2 };
                tracing::trace!(%op, ?convert, "promoting left operand");
                out.push(conversion(convert, right.clone()));
            }
            if !right.is_real() {
                let convert = if right.is_uint() { Op::U2R1 } else { Op::I2R1 };
                tracing::trace!(%op, ?convert, "promoting right operand");
                out.push(conversion(convert, Type::real()));
            }
            return Ok(Type::real());
        }

        Ok(match op {
            Op::Sub => Type::int(),
            _ if left.is_uint() && right.is_uint() => Type::uint(),
            _ => Type::int(),
        })
    }

    /// `[body : source]`. The source is spliced ahead of the generator, which
    /// keeps only its body and the slot of its loop variable.
    fn generator(
        &mut self,
        instr: &mut Instruction,
        out: &mut Block,
        stack: &mut Vec<Type>,
    ) -> Result<Type> {
        let mut closures = mem::take(&mut instr.closures);
        self.scopes.push();

        let source = match closures.len() {
            2 => {
                let mut code = closures.pop().unwrap_or_default();
                let ty = self.infer_single(&mut code)?;
                out.extend(code);
                ty
            }
            1 => pop(stack)?,
            n => return Err(EngineError::new(format!("generator with {n} closures")).into()),
        };
        let elem = sequence_element("generator", source)?;
        let slot = self.scopes.bind(Name::AT, elem);
        instr.arg = Operand::Slot {
            name: Name::AT,
            slot,
        };

        let mut body = closures.pop().unwrap_or_default();
        let ty = self.infer_single(&mut body)?;
        self.scopes.pop();

        instr.closures = vec![body];
        Ok(Type::seq(ty))
    }

    /// `<< body : init, sequence >>`. The source is spliced ahead of the
    /// recursor; the body sees `@` as `(accumulator, element)` and must
    /// return a new accumulator of the same type.
    fn recursor(&mut self, instr: &mut Instruction, out: &mut Block) -> Result<Type> {
        let mut closures = mem::take(&mut instr.closures);
        let (Some(mut source), Some(mut body), None) =
            (closures.pop(), closures.pop(), closures.pop())
        else {
            return Err(EngineError::new("recursor without body and source").into());
        };
        self.scopes.push();

        let source_ty = self.infer_single(&mut source)?;
        let parts = match &source_ty {
            Type::Tuple(fields) => match fields.as_slice() {
                [first, Type::Seq(elem)] => Some((first.clone(), (**elem).clone())),
                _ => None,
            },
            _ => None,
        };
        let Some((first, elem)) = parts else {
            return Err(TypeError::RecursorSource(source_ty).into());
        };
        if first.contains_seq() {
            return Err(TypeError::StoredSequence {
                context: "recursor",
                found: first,
            }
            .into());
        }
        let slot = self.scopes.bind(Name::AT, Type::tuple(vec![first.clone(), elem]));

        let ty = self.infer_single(&mut body)?;
        self.scopes.pop();
        if ty != first {
            return Err(TypeError::RecursorBody {
                expected: first,
                found: ty,
            }
            .into());
        }

        out.extend(source);
        instr.arg = Operand::Slot {
            name: Name::AT,
            slot,
        };
        instr.closures = vec![body];
        Ok(first)
    }

    /// Inline a call of a `def`. The argument, if any, is stored in a fresh
    /// `@` and the body is inferred against it; the call itself is erased.
    fn inline(
        &mut self,
        name: Name,
        mut body: Block,
        instr: &mut Instruction,
        out: &mut Block,
        stack: &mut Vec<Type>,
    ) -> Result<Type> {
        let interner = self.interner;
        let function = interner.lookup(name);
        if self.defining.contains(&name) {
            return Err(TypeError::RecursiveDefinition(function.to_string()).into());
        }
        let arg = self.argument(instr, out, stack)?;

        self.defining.push(name);
        self.scopes.push();
        let slot = self.scopes.bind(Name::AT, arg.clone().unwrap_or_default());
        let result = self.infer_single(&mut body);
        self.scopes.pop();
        self.defining.pop();
        let ty = result?;

        match (arg, reads_slot(&body, slot)) {
            (None, true) => {
                return Err(TypeError::DefinitionNeedsArguments(function.to_string()).into())
            }
            (Some(_), false) => {
                return Err(TypeError::DefinitionTakesNoArguments(function.to_string()).into())
            }
            (Some(arg), true) => {
                let mut store = Instruction::named(Op::Vaw, Name::AT);
                store.arg = Operand::Slot {
                    name: Name::AT,
                    slot,
                };
                store.ty = Some(arg);
                out.push(store);
            }
            (None, false) => {}
        }
        tracing::debug!(function, result = %ty, "inlined definition");
        out.extend(body);
        Ok(ty)
    }

    /// Infer the argument block of a call or index and splice it into `out`.
    /// With no argument block, the argument is already on the stack.
    fn argument(
        &mut self,
        instr: &mut Instruction,
        out: &mut Block,
        stack: &mut Vec<Type>,
    ) -> Result<Option<Type>> {
        let Some(mut code) = instr.closures.pop() else {
            return Ok(match instr.op {
                Op::Call0 => None,
                _ => Some(pop(stack)?),
            });
        };
        let mut types = self.infer_block(&mut code)?;
        out.extend(code);
        match types.len() {
            0 => Ok(None),
            1 => Ok(types.pop()),
            n => Err(EngineError::new(format!("argument block left {n} values")).into()),
        }
    }

    fn register(&mut self, instr: &mut Instruction, resolution: Resolution) -> Type {
        let ty = resolution.result.clone();
        instr.call = Some(CallId::new(self.calls.len()));
        self.calls.push(resolution);
        ty
    }

    fn call(&mut self, instr: &mut Instruction, out: &mut Block, stack: &mut Vec<Type>) -> Result<Type> {
        let interner = self.interner;
        let name = interner.lookup(self.name_of(instr)?);
        let arg = self.argument(instr, out, stack)?;
        instr.op = if arg.is_some() { Op::Call } else { Op::Call0 };
        let arg = arg.unwrap_or_default();

        let resolution = self
            .registry
            .resolve(name, &arg, self.mode)
            .ok_or_else(|| ResolutionError {
                name: name.to_string(),
                args: arg.clone(),
            })?;
        tracing::debug!(function = name, args = %arg, result = %resolution.result, "resolved call");
        Ok(self.register(instr, resolution))
    }

    fn index(&mut self, instr: &mut Instruction, out: &mut Block, stack: &mut Vec<Type>) -> Result<Type> {
        let arg = self
            .argument(instr, out, stack)?
            .ok_or_else(|| Error::from(EngineError::new("index without arguments")))?;
        let literal = literal_field(out);
        let resolution = self.resolve_index(&arg, literal)?;
        tracing::debug!(args = %arg, result = %resolution.result, "resolved index");
        Ok(self.register(instr, resolution))
    }

    /// `arg` is the tuple `(container, index...)`.
    fn resolve_index(&self, arg: &Type, literal: Option<u64>) -> Result<Resolution> {
        let Some((container, indices)) = (match arg {
            Type::Tuple(fields) if fields.len() >= 2 => fields.split_first(),
            _ => None,
        }) else {
            return Err(EngineError::new(format!("malformed index arguments {arg}")).into());
        };
        let bad_index = || {
            Error::from(TypeError::BadIndex {
                container: container.clone(),
                index: key_type(indices),
            })
        };

        match container {
            Type::Tuple(fields) => {
                let (Some(field), [_]) = (literal, indices) else {
                    return Err(TypeError::TupleIndexNotLiteral.into());
                };
                let ty = usize::try_from(field)
                    .ok()
                    .and_then(|i| fields.get(i))
                    .ok_or_else(|| TypeError::TupleIndexOutOfRange {
                        index: field,
                        tuple: container.clone(),
                    })?;
                Ok(Resolution::new(ty.clone(), tuple_field(field as usize)))
            }
            Type::Array(elem) => match indices {
                [i] if i.is_numeric() => Ok(Resolution::new((**elem).clone(), array_element())),
                [a, b] if a.is_integer() && b.is_integer() => {
                    Ok(Resolution::new(container.clone(), array_slice()))
                }
                _ => Err(bad_index()),
            },
            Type::Atom(_) if container.is_string() => match indices {
                [a, b] if a.is_integer() && b.is_integer() => {
                    Ok(Resolution::new(Type::string(), substring()))
                }
                _ => Err(bad_index()),
            },
            Type::Map(key, value) => {
                if key_type(indices) != **key {
                    return Err(bad_index());
                }
                Ok(Resolution::new((**value).clone(), map_lookup()))
            }
            Type::Seq(elem) => {
                let mut per_element = Vec::with_capacity(indices.len() + 1);
                per_element.push((**elem).clone());
                per_element.extend(indices.iter().cloned());
                let inner = self.resolve_index(&Type::Tuple(per_element), literal)?;
                Ok(lift(inner, true, self.mode))
            }
            _ => Err(bad_index()),
        }
    }
}

/// Returns `None` when the tuple collapses and the instruction is erased.
fn tuple(instr: &mut Instruction, stack: &mut Vec<Type>) -> Result<Option<Type>> {
    let Operand::Tuple { offset, arity } = instr.arg else {
        return Err(EngineError::new("tuple without offset").into());
    };
    let count = if arity > 0 {
        arity as usize
    } else if stack.len() <= 1 + offset as usize {
        return Ok(None);
    } else {
        stack.len() - offset as usize
    };
    if count > stack.len() {
        return Err(EngineError::new("tuple arity exceeds stack").into());
    }
    let fields = stack.split_off(stack.len() - count);
    instr.arg = Operand::Tuple {
        offset,
        arity: count as u32,
    };
    Ok(Some(Type::Tuple(fields)))
}

fn integer_operand(op: Op, t: &Type) -> Result<()> {
    if t.is_integer() {
        Ok(())
    } else {
        Err(TypeError::NonInteger {
            op: op.mnemonic(),
            found: t.clone(),
        }
        .into())
    }
}

fn sequence_element(context: &'static str, ty: Type) -> Result<Type> {
    match ty {
        Type::Seq(elem) => Ok(*elem),
        found => Err(TypeError::NotASequence { context, found }.into()),
    }
}

/// Whether `block` or any block nested in it reads `slot`.
fn reads_slot(block: &Block, slot: u32) -> bool {
    block.iter().any(|instr| {
        matches!(instr.arg, Operand::Slot { slot: read, .. } if instr.op == Op::Var && read == slot)
            || instr.closures.iter().any(|nested| reads_slot(nested, slot))
    })
}

/// One index value as is, several as a tuple key.
fn key_type(indices: &[Type]) -> Type {
    match indices {
        [single] => single.clone(),
        many => Type::Tuple(many.to_vec()),
    }
}

/// The unsigned literal directly before the closing `Tup` of an index
/// argument block, if there is one.
fn literal_field(out: &Block) -> Option<u64> {
    let [.., value, close] = out.as_slice() else {
        return None;
    };
    match (value.op, value.atom(), close.op) {
        (Op::Val, Some(Atom::UInt(i)), Op::Tup) => Some(*i),
        _ => None,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
