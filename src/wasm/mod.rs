//! WASM bindings for lseq-text
//!
//! This module provides JavaScript-friendly bindings for a replica session.

pub mod bindings;
pub mod utils;

pub use bindings::WasmReplica;

#[cfg(all(feature = "core-lite", target_arch = "wasm32"))]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;
