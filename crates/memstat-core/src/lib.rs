#![forbid(unsafe_code)]
//! memstat-core: shared vocabulary for compilation memory statistics.
//!
//! Symbols and method identities, compiler/arena enumerations, the narrow
//! collaborator traits (`CompileTask`, `Directive`), configuration and errors.
//! The stateful pieces (peak tracking, the registry, reporting) live in
//! `memstat-arena`.

pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod method;
pub mod prelude;
pub mod size;
pub mod symbol;
pub mod task;
pub mod types;
