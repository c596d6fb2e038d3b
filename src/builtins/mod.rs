//! # Built-in Functions Module
//!
//! Native functions installed into the initial environment, organized by
//! category. Each sub-module exposes a `register` function that inserts its
//! bindings; adding a built-in is inserting a name and a native function
//! into the environment, nothing else.

use crate::env::Env;
use std::sync::Arc;

pub mod arithmetic;
pub mod atoms;
pub mod comparison;
pub mod concurrency;
pub mod errors;
pub mod maps;
pub mod meta;
pub mod sequences;
pub mod strings;
pub mod system;
pub mod types;

/// Register every native built-in in the environment
pub fn register_builtins(env: &Arc<Env>) {
    arithmetic::register(env);
    comparison::register(env);
    sequences::register(env);
    maps::register(env);
    strings::register(env);
    atoms::register(env);
    meta::register(env);
    types::register(env);
    errors::register(env);
    concurrency::register(env);
    system::register(env);
}
