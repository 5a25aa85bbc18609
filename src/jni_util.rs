//! Conversions between Java objects and native Rust data.
//!
//! Every function takes the caller's `JNIEnv` and releases whatever it
//! borrows from the VM (element views, temporary local references) before
//! returning, on error paths too.

pub mod array;
pub mod string;

pub use array::*;
pub use string::*;
