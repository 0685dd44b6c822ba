//! Collaborator interfaces.
//!
//! The compiler proper (threads, tasks, directives) lives outside this
//! workspace. We keep only the narrow traits the statistic needs so any
//! compiler front can plug in without pulling the tracking logic.

use crate::method::MethodIdentity;
use crate::symbol::Symbol;
use crate::types::CompilerKind;

/// Per-compilation switches decided by the directive layer.
pub trait Directive {
    /// Should this compilation collect arena statistics at all?
    fn should_collect_memstat(&self) -> bool;
    /// Should a one-line summary be printed when the compilation ends?
    fn should_print_memstat(&self) -> bool;
}

/// A compilation in progress, as seen by the statistic.
///
/// Must be `Send + Sync`: the worker that runs the compilation holds it behind
/// an `Arc` for the duration of the collection window.
pub trait CompileTask: Send + Sync {
    fn compiler_kind(&self) -> CompilerKind;

    fn holder(&self) -> &Symbol;
    fn name(&self) -> &Symbol;
    fn signature(&self) -> &Symbol;

    fn directive(&self) -> &dyn Directive;

    /// Live node count of the graph under construction, if the backend has
    /// one and a compilation context currently exists.
    fn live_nodes(&self) -> Option<u32> {
        None
    }

    fn method_identity(&self) -> MethodIdentity {
        MethodIdentity::new(
            self.holder().clone(),
            self.name().clone(),
            self.signature().clone(),
        )
    }
}
