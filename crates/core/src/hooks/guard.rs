//! Call-through guard
//!
//! While a [`DirectCallGuard`] for a target is alive, any dispatch of that
//! same target runs the original function directly and skips every
//! hook. Hooks use it when they call through to the original so they cannot
//! re-trigger themselves. The guard is released on drop, so early returns and
//! unwinding panics release it too.

use super::dispatch::Dispatcher;
use super::registry::TargetId;

/// Scoped direct-call marker for one target
#[must_use = "the guard is released as soon as it is dropped"]
pub struct DirectCallGuard<'a> {
    dispatcher: &'a Dispatcher,
    target: TargetId,
}

impl<'a> DirectCallGuard<'a> {
    pub fn acquire(dispatcher: &'a Dispatcher, target: TargetId) -> Self {
        tracing::trace!("Direct-call guard acquired for {}", target);
        dispatcher.push_direct(target.clone());
        Self { dispatcher, target }
    }

    pub fn target(&self) -> &TargetId {
        &self.target
    }
}

impl Drop for DirectCallGuard<'_> {
    fn drop(&mut self) {
        self.dispatcher.pop_direct(&self.target);
        tracing::trace!("Direct-call guard released for {}", self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_guards() {
        let dispatcher = Dispatcher::new();
        let target = TargetId::from("Engine.Thing:Do");

        {
            let _outer = DirectCallGuard::acquire(&dispatcher, target.clone());
            {
                let _inner = DirectCallGuard::acquire(&dispatcher, target.clone());
                assert!(dispatcher.is_direct_call(&target));
            }
            // Still held by the outer guard
            assert!(dispatcher.is_direct_call(&target));
        }
        assert!(!dispatcher.is_direct_call(&target));
    }

    #[test]
    fn test_released_on_panic() {
        let dispatcher = Dispatcher::new();
        let target = TargetId::from("Engine.Thing:Do");

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = DirectCallGuard::acquire(&dispatcher, target.clone());
            panic!("handler failed");
        }));

        assert!(result.is_err());
        assert!(!dispatcher.is_direct_call(&target));
    }
}
