//! Observable services.
//!
//! [`emitter`] is the in-process publish/subscribe channel every service
//! republishes its state through; [`registry`] is the process-scoped
//! service locator that hands out lazily constructed singletons; and
//! [`network`] aggregates multi-source networking state into one coherent,
//! observable snapshot.

pub mod emitter;
pub mod network;
pub mod registry;

pub use emitter::{Changed, Emitter, Subscription};
pub use network::{Network, Wifi, Wired};
pub use registry::{registry, ServiceRegistry};
