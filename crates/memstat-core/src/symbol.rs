//! Interned identity strings.
//!
//! A `Symbol` is a cheap, shareable handle to an immutable string with a
//! precomputed stable hash. The `SymbolTable` hands out one canonical symbol
//! per distinct text. Symbols that nothing outside the table refers to any
//! more are dropped by `purge()` unless they were made permanent; registry
//! keys are made permanent so that later compilations of the same method
//! resolve to the very same symbols.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::hash::hash_str;

struct SymbolInner {
    text: Box<str>,
    hash: u32,
    permanent: AtomicBool,
}

#[derive(Clone)]
pub struct Symbol(Arc<SymbolInner>);

impl Symbol {
    /// Create a free-standing symbol that belongs to no table.
    pub fn new(text: &str) -> Self {
        Self(Arc::new(SymbolInner {
            text: text.into(),
            hash: hash_str(text),
            permanent: AtomicBool::new(false),
        }))
    }

    pub fn as_str(&self) -> &str {
        &self.0.text
    }

    /// Stable hash of the text, computed once.
    pub fn identity_hash(&self) -> u32 {
        self.0.hash
    }

    /// Pin this symbol: it survives every future `SymbolTable::purge`.
    pub fn make_permanent(&self) {
        self.0.permanent.store(true, Ordering::Release);
    }

    pub fn is_permanent(&self) -> bool {
        self.0.permanent.load(Ordering::Acquire)
    }

    /// True if both handles point at the same interned symbol.
    pub fn same_symbol(&self, other: &Symbol) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.same_symbol(other) || (self.0.hash == other.0.hash && self.0.text == other.0.text)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.0.hash);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonicalizing symbol table.
#[derive(Default)]
pub struct SymbolTable {
    symbols: Mutex<HashMap<Box<str>, Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical symbol for `text`, creating it on first use.
    pub fn intern(&self, text: &str) -> Symbol {
        let mut symbols = self.symbols.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sym) = symbols.get(text) {
            return sym.clone();
        }
        let sym = Symbol::new(text);
        symbols.insert(text.into(), sym.clone());
        sym
    }

    /// Drop transient symbols nobody outside the table holds on to.
    /// Returns how many were removed.
    pub fn purge(&self) -> usize {
        let mut symbols = self.symbols.lock().unwrap_or_else(PoisonError::into_inner);
        let before = symbols.len();
        symbols.retain(|_, sym| sym.is_permanent() || Arc::strong_count(&sym.0) > 1);
        before - symbols.len()
    }

    pub fn len(&self) -> usize {
        self.symbols
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
