//! Heap object kinds and the string-interning contract.
//!
//! All heap data is shared through `Rc`; an object lives as long as any
//! value, closure, or VM table still refers to it. Upvalues additionally
//! need interior mutability (they are written through by closures and
//! closed over by the VM), so they sit behind `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::chunk::Chunk;
use crate::table::Table;
use crate::value::Value;

/// An immutable, interned string.
///
/// The hash is FNV-1a over the bytes, precomputed once at allocation so
/// table probes never rehash. Two `ObjString`s with equal contents are the
/// same allocation — [`intern`] guarantees it — which is what lets
/// [`Value`] compare strings by pointer.
#[derive(Debug)]
pub struct ObjString {
    pub hash: u32,
    pub chars: Box<str>,
}

impl ObjString {
    /// FNV-1a over a byte slice.
    pub fn hash_of(bytes: &[u8]) -> u32 {
        let mut hash: u32 = 2166136261;
        for &byte in bytes {
            hash ^= byte as u32;
            hash = hash.wrapping_mul(16777619);
        }
        hash
    }
}

/// Return the canonical interned string for `chars`, allocating it into
/// `strings` on first sight.
pub fn intern(strings: &mut Table, chars: &str) -> Rc<ObjString> {
    let hash = ObjString::hash_of(chars.as_bytes());
    if let Some(existing) = strings.find_string(chars, hash) {
        return existing;
    }
    let string = Rc::new(ObjString {
        hash,
        chars: chars.into(),
    });
    strings.set(string.clone(), Value::Nil);
    string
}

/// Interning entry point that consumes an already-built buffer (used by
/// concatenation). When a canonical string already exists the buffer is
/// simply dropped.
pub fn intern_owned(strings: &mut Table, chars: String) -> Rc<ObjString> {
    let hash = ObjString::hash_of(chars.as_bytes());
    if let Some(existing) = strings.find_string(&chars, hash) {
        return existing;
    }
    let string = Rc::new(ObjString {
        hash,
        chars: chars.into_boxed_str(),
    });
    strings.set(string.clone(), Value::Nil);
    string
}

/// A compiled function: its bytecode plus the shape of its call surface.
///
/// `name` is `None` only for the synthetic top-level script function.
#[derive(Debug)]
pub struct ObjFunction {
    pub arity: usize,
    pub upvalue_count: usize,
    pub chunk: Chunk,
    pub name: Option<Rc<ObjString>>,
}

impl ObjFunction {
    pub fn new(name: Option<Rc<ObjString>>) -> Self {
        ObjFunction {
            arity: 0,
            upvalue_count: 0,
            chunk: Chunk::new(),
            name,
        }
    }
}

impl fmt::Display for ObjFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "<fn {}>", name.chars),
            None => write!(f, "<script>"),
        }
    }
}

/// A captured variable.
///
/// While the variable is still live on the value stack the upvalue is
/// `Open` and records the stack slot. When the variable leaves scope the
/// VM closes it: the value moves into the upvalue itself and every closure
/// sharing the cell keeps seeing the same variable.
#[derive(Debug)]
pub enum ObjUpvalue {
    Open(usize),
    Closed(Value),
}

/// Shared handle to an upvalue cell. One cell may be held by several
/// closures and, while open, by the VM's open-upvalue list.
pub type UpvalueRef = Rc<RefCell<ObjUpvalue>>;

/// A runtime instantiation of a function together with its captured
/// upvalues. All callable user code is a closure; bare functions only
/// exist as chunk constants.
#[derive(Debug)]
pub struct ObjClosure {
    pub function: Rc<ObjFunction>,
    pub upvalues: Vec<UpvalueRef>,
}

impl ObjClosure {
    pub fn new(function: Rc<ObjFunction>) -> Self {
        let upvalues = Vec::with_capacity(function.upvalue_count);
        ObjClosure { function, upvalues }
    }
}

/// A host function callable from Peach code.
pub struct ObjNative {
    pub name: Rc<ObjString>,
    pub function: Box<dyn Fn(&[Value]) -> Value>,
}

impl fmt::Debug for ObjNative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name.chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_reference_values() {
        // Standard FNV-1a test vectors (32-bit).
        assert_eq!(ObjString::hash_of(b""), 2166136261);
        assert_eq!(ObjString::hash_of(b"a"), 0xe40c292c);
        assert_eq!(ObjString::hash_of(b"foobar"), 0xbf9cf968);
    }

    #[test]
    fn intern_returns_the_same_allocation() {
        let mut strings = Table::new();
        let a = intern(&mut strings, "twin");
        let b = intern(&mut strings, "twin");
        assert!(Rc::ptr_eq(&a, &b));

        let c = intern_owned(&mut strings, String::from("twin"));
        assert!(Rc::ptr_eq(&a, &c));

        let d = intern(&mut strings, "other");
        assert!(!Rc::ptr_eq(&a, &d));
    }

    #[test]
    fn closure_upvalue_capacity_matches_function() {
        let mut function = ObjFunction::new(None);
        function.upvalue_count = 3;
        let closure = ObjClosure::new(Rc::new(function));
        assert!(closure.upvalues.capacity() >= 3);
        assert!(closure.upvalues.is_empty());
    }
}
