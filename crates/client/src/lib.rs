//! Tidemark client surface
//!
//! The boundary where loosely-typed caller arguments become the
//! engine's strong types. Argument values arrive as [`Arg`] (the shape
//! a wire protocol or dynamic-language binding would hand over), the
//! guard functions in [`guard`] classify every malformed input into
//! the client-side error taxonomy, and [`Client`] routes validated
//! requests into the engine.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arg;
pub mod client;
pub mod guard;

pub use arg::Arg;
pub use client::Client;
pub use guard::{namespace_arg, parse_truncate_args, policy_arg, set_arg, threshold_arg, TruncateArgs};
