//! Filesystem utilities.
//!
//! Artifacts are written atomically so an interrupted build never leaves a
//! half-written file in the destination.

pub mod atomic;

pub use atomic::{atomic_write, atomic_write_executable};
