use super::*;
use sift_ir::{Instruction, Op, StringInterner};

#[test]
fn test_slots_follow_binding_order() {
    let mut interner = StringInterner::new();
    let (x, y) = (interner.intern("x"), interner.intern("y"));
    let mut scopes = Scopes::new();
    assert_eq!(scopes.bind(Name::AT, Type::string()), 0);
    assert_eq!(scopes.bind(x, Type::uint()), 1);
    assert_eq!(scopes.bind(y, Type::int()), 2);
    assert_eq!(scopes.slot_count(), 3);
}

#[test]
fn test_rebinding_in_same_scope_reuses_slot() {
    let mut interner = StringInterner::new();
    let x = interner.intern("x");
    let mut scopes = Scopes::new();
    let first = scopes.bind(x, Type::uint());
    let second = scopes.bind(x, Type::real());
    assert_eq!(first, second);
    assert_eq!(scopes.lookup(x).unwrap().ty, Type::real());
}

#[test]
fn test_inner_scope_shadows_and_never_reuses() {
    let mut scopes = Scopes::new();
    scopes.bind(Name::AT, Type::seq(Type::string()));
    scopes.push();
    let inner = scopes.bind(Name::AT, Type::string());
    assert_eq!(inner, 1);
    assert_eq!(scopes.lookup(Name::AT).unwrap().ty, Type::string());
    scopes.pop();
    assert_eq!(scopes.lookup(Name::AT).unwrap().slot, 0);

    scopes.push();
    assert_eq!(scopes.bind(Name::AT, Type::string()), 2);
}

#[test]
fn test_pop_keeps_global_scope() {
    let mut scopes = Scopes::new();
    scopes.pop();
    scopes.bind(Name::AT, Type::uint());
    assert!(scopes.lookup(Name::AT).is_some());
}

#[test]
fn test_definitions_follow_scopes() {
    let mut interner = StringInterner::new();
    let f = interner.intern("f");
    let mut scopes = Scopes::new();
    scopes.define(f, vec![Instruction::named(Op::Var, Name::AT)]);
    scopes.push();
    scopes.define(f, vec![Instruction::named(Op::Var, Name::AT); 2]);
    assert_eq!(scopes.definition(f).unwrap().len(), 2);
    scopes.pop();
    assert_eq!(scopes.definition(f).unwrap().len(), 1);
    assert!(scopes.definition(interner.intern("g")).is_none());
}
