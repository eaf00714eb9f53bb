//! # blockdoc-cli — Block Document Command-Line Interface
//!
//! Provides the `blockdoc` binary:
//!
//! ```bash
//! blockdoc validate page.json --taxonomy v3 --root any
//! blockdoc validate stored.yaml --format json
//! blockdoc describe --taxonomy v4
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here return an exit
//!   code and leave printing of operational errors to the caller.
//! - No validation logic here; everything delegates to `blockdoc-schema`.

pub mod config;
pub mod describe;
pub mod validate;
