//! Method identity: the registry key.

use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};

use crate::symbol::Symbol;

/// Holder type, method name and signature of a compiled method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodIdentity {
    holder: Symbol,
    name: Symbol,
    signature: Symbol,
}

impl MethodIdentity {
    pub fn new(holder: Symbol, name: Symbol, signature: Symbol) -> Self {
        Self {
            holder,
            name,
            signature,
        }
    }

    pub fn holder(&self) -> &Symbol {
        &self.holder
    }

    pub fn name(&self) -> &Symbol {
        &self.name
    }

    pub fn signature(&self) -> &Symbol {
        &self.signature
    }

    /// Pin all three symbols. Must happen before the identity is used as a
    /// registry key.
    pub fn make_permanent(&self) {
        self.holder.make_permanent();
        self.name.make_permanent();
        self.signature.make_permanent();
    }

    pub fn is_permanent(&self) -> bool {
        self.holder.is_permanent() && self.name.is_permanent() && self.signature.is_permanent()
    }

    pub fn identity_hash(&self) -> u32 {
        self.holder.identity_hash() ^ self.name.identity_hash() ^ self.signature.identity_hash()
    }

    /// Append `Holder::name(signature)` to `buf`.
    pub fn render_into(&self, buf: &mut String) {
        // Writing into a String cannot fail.
        let _ = write!(buf, "{}", self);
    }
}

impl Hash for MethodIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.identity_hash());
    }
}

impl fmt::Display for MethodIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}({})", self.holder, self.name, self.signature)
    }
}
