//! Hook system
//!
//! Engine functions are intercepted by name. Every interception is routed
//! through a [`Dispatcher`], which runs the registered hooks around the
//! installed original function:
//!
//! - Before hooks (may block the original and substitute its result)
//! - AfterUnconditional hooks (observe the resolved result)
//! - A call-through guard so hooks can call the original without re-entering
//!   themselves
//! - Session slots handing text between hooks within one event
//! - Markup mediation built from the pieces above

pub mod context;
pub mod dispatch;
pub mod guard;
pub mod mediation;
pub mod registry;
pub mod session;

pub use context::{Arguments, CallContext, Decision, Invocation, PendingResult};
pub use dispatch::{dispatcher, Dispatcher, OriginalFn};
pub use guard::DirectCallGuard;
pub use mediation::{concat_markup, MarkupMediation, MediationKeys};
pub use registry::{HookCallback, HookError, HookKey, HookRegistry, Phase, Registration, TargetId};
pub use session::SessionSlots;
