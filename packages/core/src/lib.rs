//! Core MPIX: Semantic Facade Layer
//!
//! This layer turns the low-level runtime's protocol - opaque handles,
//! return codes, out-parameters - into value types with deterministic
//! lifetimes and checked operations:
//! - [`InfoMap`]: insertion-ordered key/value attributes with handle ownership
//! - [`Proxy`]: write-through element access for a store with no references
//! - [`ThreadSupport`]: the four-level thread-support enumeration
//! - [`Communicator`]: non-owning communicator views
//! - [`Error`] / [`SourceLocation`]: the recoverable error surface
//!
//! Precondition violations (null-handle use, illegal keys, out-of-bounds
//! ordinals on unchecked paths) panic at the caller's location; only the
//! operations documented as returning [`Error`] are recoverable.
//!
//! # Example
//!
//! ```rust
//! use mpix_core::{info_map, environment, ThreadSupport};
//!
//! let provided = environment::init(ThreadSupport::Single).unwrap();
//! assert!(provided >= ThreadSupport::Single);
//!
//! let mut m = info_map! { "host" => "node0" };
//! assert_eq!(m.entry("host").get(), "node0");
//! ```

mod comm;
pub mod environment;
mod error;
mod info;
mod owned;
mod thread_support;

pub use comm::Communicator;
pub use error::{Error, SourceLocation};
pub use info::{InfoMap, Iter, IterMut, Proxy};
pub use owned::{HandleOwner, NativeResource};
pub use thread_support::ThreadSupport;

// Re-export LL types for interop convenience
pub use mpix_ll_runtime::{CommHandle, InfoHandle};
