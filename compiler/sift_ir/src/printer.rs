//! Program dumps for `-vv` and `-vvv`.
//!
//! One instruction per line, indented two spaces per closure level, with the
//! closures of an instruction separated by a `-` line.

use std::fmt::Write;

use crate::{Block, Operand, StringInterner};

/// Render a block. With `with_types`, each line ends in `--> Type`.
pub fn dump_block(block: &Block, interner: &StringInterner, with_types: bool) -> String {
    let mut out = String::new();
    dump_into(&mut out, block, interner, with_types, 0);
    out
}

fn dump_into(
    out: &mut String,
    block: &Block,
    interner: &StringInterner,
    with_types: bool,
    level: usize,
) {
    let indent = " ".repeat(level * 2);
    for instr in block {
        let _ = write!(out, " {indent}{}", instr.op);
        match &instr.arg {
            Operand::None => {}
            Operand::Atom(a) => {
                let _ = write!(out, " {a}");
            }
            Operand::Name(n) => {
                let _ = write!(out, " {}", interner.lookup(*n));
            }
            Operand::Slot { name, slot } => {
                let _ = write!(out, " {}#{slot}", interner.lookup(*name));
            }
            Operand::Tuple { offset, arity } => {
                if with_types {
                    let _ = write!(out, " {arity}");
                }
                if *offset > 0 {
                    let _ = write!(out, " +{offset}");
                }
            }
        }
        if with_types {
            match &instr.ty {
                Some(t) => {
                    let _ = write!(out, " --> {t}");
                }
                None => out.push_str(" --> None"),
            }
        }
        out.push('\n');

        for (i, closure) in instr.closures.iter().enumerate() {
            if i > 0 {
                let _ = writeln!(out, " {indent}-");
            }
            dump_into(out, closure, interner, with_types, level + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Atom, Instruction, Op, Type};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dump_nested() {
        let mut interner = StringInterner::new();
        let f = interner.intern("count");
        let mut call = Instruction::named(Op::Call, f);
        call.closures
            .push(vec![Instruction::named(Op::Var, crate::Name::AT), Instruction::tuple(0)]);
        let block = vec![Instruction::literal(Atom::UInt(1)), call];

        assert_eq!(
            dump_block(&block, &interner, false),
            " VAL 1u\n FUN count\n   VAR @\n   TUP\n"
        );
    }

    #[test]
    fn test_dump_with_types() {
        let interner = StringInterner::new();
        let mut lit = Instruction::literal(Atom::Int(-2));
        lit.ty = Some(Type::int());
        assert_eq!(dump_block(&vec![lit], &interner, true), " VAL -2 --> Int\n");
    }
}
