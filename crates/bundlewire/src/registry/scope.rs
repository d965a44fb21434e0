// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resolver in effect while a variant rebuilds itself.
//!
//! [`crate::envelope::decode`] installs its resolver for the duration of
//! `construct_from_instance_data`, so nested bundles read with
//! [`InstanceData::get_bundle`](crate::InstanceData::get_bundle) resolve
//! through the same registry as the outer envelope. Outside any decode the
//! process-wide registry is used.

use super::{global, TypeResolver};
use std::cell::RefCell;

type ResolverPtr = *const (dyn TypeResolver + 'static);

thread_local! {
    static ACTIVE: RefCell<Vec<ResolverPtr>> = const { RefCell::new(Vec::new()) };
}

/// Pops the entry pushed by [`with_resolver`], also on unwind.
struct ScopeGuard;

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let _ = ACTIVE.try_with(|stack| stack.borrow_mut().pop());
    }
}

/// Run `f` with `resolver` as the current resolver on this thread.
pub(crate) fn with_resolver<T>(resolver: &dyn TypeResolver, f: impl FnOnce() -> T) -> T {
    let ptr: *const (dyn TypeResolver + '_) = resolver;
    // SAFETY: only the lifetime is erased. The entry is popped by the guard
    // before this frame returns, so it never outlives the `resolver` borrow,
    // and `with_current` only lends it out for the duration of a call.
    let ptr: ResolverPtr = unsafe { std::mem::transmute(ptr) };
    ACTIVE.with(|stack| stack.borrow_mut().push(ptr));
    let _guard = ScopeGuard;
    f()
}

/// Call `f` with the innermost installed resolver, or the global registry.
pub(crate) fn with_current<T>(f: impl FnOnce(&dyn TypeResolver) -> T) -> T {
    let top = ACTIVE.with(|stack| stack.borrow().last().copied());
    match top {
        // SAFETY: entries are live while their `with_resolver` frame runs,
        // and that frame is below us on this thread's stack.
        Some(ptr) => f(unsafe { &*ptr }),
        None => f(global()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FactoryRegistry;
    use crate::{Bundleable, RawInstance};

    #[derive(Debug, Default, Bundleable)]
    #[bundle(type_id = "scope.Only")]
    struct Only {
        n: i32,
    }

    fn resolves_only(resolver: &dyn TypeResolver) -> bool {
        resolver.resolve(Only::TYPE_ID).is_ok()
    }

    #[test]
    fn test_global_outside_any_scope() {
        assert!(!with_current(resolves_only));
    }

    #[test]
    fn test_innermost_scope_wins_and_unwinds() {
        let outer = FactoryRegistry::new();
        outer.register::<Only>().unwrap();
        let inner = FactoryRegistry::new();

        with_resolver(&outer, || {
            assert!(with_current(resolves_only));
            with_resolver(&inner, || assert!(!with_current(resolves_only)));
            assert!(with_current(resolves_only));
        });
        assert!(!with_current(resolves_only));
    }

    #[test]
    fn test_scope_popped_after_panic() {
        let local = FactoryRegistry::new();
        local.register::<Only>().unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            with_resolver(&local, || panic!("construct failed"))
        }));
        assert!(result.is_err());
        assert!(!with_current(resolves_only));
    }
}
