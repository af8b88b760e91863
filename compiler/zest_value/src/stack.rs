//! Stack safety for recursive value operations.
//!
//! Deep copy, the assigner descent and deep equality recurse once per
//! nesting level of the value or access chain. Nesting comes from user data,
//! so the stack is grown on demand instead of trusting the default size.
//!
//! For WASM targets where stacker isn't available, the function
//! just calls the closure directly (WASM has its own stack management).

/// Ensure sufficient stack space is available before executing `f`.
///
/// On native targets, uses `stacker` to grow the stack if needed.
/// On WASM targets, just calls the closure directly.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Minimum stack space to keep available (100KB red zone).
    const RED_ZONE: usize = 100 * 1024;

    /// Stack space to allocate when growing (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Kind, Value};

    #[test]
    fn test_returns_closure_result() {
        let result: Result<i32, &str> = ensure_sufficient_stack(|| Ok(123));
        assert_eq!(result, Ok(123));
    }

    #[test]
    fn test_nested_copy_preserves_depth() {
        let mut value = Value::int(7);
        for _ in 0..1_000 {
            value = Value::array(Kind::Any, vec![value]);
        }
        let mut copy = value.deep_copy();
        let mut depth = 0;
        while let Value::Array(arr) = copy {
            copy = arr.items[0].clone();
            depth += 1;
        }
        assert_eq!(depth, 1_000);
        assert_eq!(copy, Value::int(7));
    }
}
