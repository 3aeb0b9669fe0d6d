//! Re-exports from the diagnostics crate for convenient in-crate paths.

pub use cl_toolchain_diagnostics::{Diagnostic, LineIndex, Severity, Span, codes, explain};
