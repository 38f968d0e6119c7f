//! # Core Module
//!
//! Shared-ownership primitives used across the engine.
//!
//! The engine is single-threaded and frame-driven, so the only container it
//! needs is [`StResource`]: an `Rc<RefCell<T>>` wrapper that lets the world and
//! every chunk's buffer guard refer to the same render backend.

pub mod st_resource;

pub use st_resource::StResource;
