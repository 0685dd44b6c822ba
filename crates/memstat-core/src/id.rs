//! Strongly-typed identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

macro_rules! new_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(v: u64) -> Self {
                Self(v)
            }
            pub const fn get(self) -> u64 {
                self.0
            }
        }
    };
}

new_id!(WorkerId);

static NEXT_WORKER: AtomicU64 = AtomicU64::new(1);

impl WorkerId {
    /// Hand out a fresh process-unique worker id.
    pub fn next() -> Self {
        Self(NEXT_WORKER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Rendered as an opaque pointer-style token. Display only; a worker id may
/// outlive the worker it names.
impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
