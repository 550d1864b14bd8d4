//! lambdapack library - exposes the build pipeline for the binary and tests

pub mod builder;
pub mod commands;
pub mod common;
pub mod errors;

pub use common::GlobalOpts;
