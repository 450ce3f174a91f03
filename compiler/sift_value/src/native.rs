//! Native function handles.

use std::sync::Arc;

use crate::{EvalResult, Value};

/// A resolved builtin: reads `input`, writes or replaces `output`.
///
/// `output` starts as a copy of the call's holder (the registry prototype or
/// a type-directed default), so implementations may either mutate it in place
/// or overwrite it.
pub type NativeFn = Arc<dyn Fn(&Value, &mut Value) -> EvalResult<()> + Send + Sync>;

/// Wrap a closure or function as a [`NativeFn`].
pub fn native<F>(f: F) -> NativeFn
where
    F: Fn(&Value, &mut Value) -> EvalResult<()> + Send + Sync + 'static,
{
    Arc::new(f)
}
