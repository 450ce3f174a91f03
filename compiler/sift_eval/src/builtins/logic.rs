//! Conditionals.

use sift_diagnostic::{condition_false, not_implemented};
use sift_ir::Type;
use sift_types::{Registry, Resolution};
use sift_value::native;

use super::{args, truth};

pub(super) fn register(registry: &mut Registry) {
    registry.register_poly("if", |arg: &Type| {
        let Type::Tuple(fields) = arg else {
            return None;
        };
        match fields.as_slice() {
            [flag, then, otherwise] if flag.is_integer() && then == otherwise => {
                Some(Resolution::new(
                    then.clone(),
                    native(|input, out| {
                        let [flag, then, otherwise] = args(input, "if")? else {
                            return Err(not_implemented("if"));
                        };
                        *out = if truth(flag, "if")? { then } else { otherwise }.clone();
                        Ok(())
                    }),
                ))
            }
            // Without an else value a false condition is a runtime error,
            // which a `try` generator turns into a skipped element.
            [flag, then] if flag.is_integer() => Some(Resolution::new(
                then.clone(),
                native(|input, out| {
                    let [flag, then] = args(input, "if")? else {
                        return Err(not_implemented("if"));
                    };
                    if !truth(flag, "if")? {
                        return Err(condition_false());
                    }
                    *out = then.clone();
                    Ok(())
                }),
            )),
            _ => None,
        }
    });
}
