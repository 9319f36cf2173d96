//! Trigger dispatch
//!
//! Hooks are addressed by stable, serializable handles rather than captured
//! closures; the mutation they run in may live across a process boundary.
//! A handle is resolved against the registry once per logical operation,
//! never cached across operations.

mod bindings;
mod hook;
mod registry;

pub use bindings::{TriggerBindings, TriggerMap};
pub use hook::{HookHandle, HookHandler, HookInput};
pub use registry::HookRegistry;
