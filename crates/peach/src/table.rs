//! Open-addressing hash table keyed by interned strings.
//!
//! One table type serves two roles in the VM: the global-variable table
//! (name → value) and the string-intern set (string → nil). Keys carry
//! their FNV-1a hash, so probing never rehashes; because keys are interned,
//! key comparison during a probe is pointer identity. The one place that
//! must deep-compare is [`Table::find_string`], which is exactly the lookup
//! the interner uses to decide whether a canonical string already exists.
//!
//! Deletion leaves a tombstone so probe sequences stay intact; tombstones
//! are reusable by inserts and are dropped wholesale on resize.

use std::rc::Rc;

use crate::object::ObjString;
use crate::value::Value;

const INITIAL_CAPACITY: usize = 8;

/// The three states a slot can be in. A tombstone marks a deleted entry
/// that probe sequences must walk through.
#[derive(Debug, Clone)]
enum Entry {
    Empty,
    Tombstone,
    Full(Rc<ObjString>, Value),
}

/// Hash table with linear probing, a 0.75 max load factor, and doubling
/// growth. `count` includes tombstones, so a long-lived table that churns
/// keys still resizes before probe chains degrade.
#[derive(Debug, Default)]
pub struct Table {
    count: usize,
    entries: Vec<Entry>,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    /// Look up the value stored under `key`.
    pub fn get(&self, key: &Rc<ObjString>) -> Option<&Value> {
        if self.entries.is_empty() {
            return None;
        }
        match &self.entries[self.find_slot(key)] {
            Entry::Full(_, value) => Some(value),
            _ => None,
        }
    }

    /// Insert or overwrite. Returns `true` when `key` was not present.
    pub fn set(&mut self, key: Rc<ObjString>, value: Value) -> bool {
        if (self.count + 1) * 4 > self.entries.len() * 3 {
            self.grow();
        }

        let slot = self.find_slot(&key);
        let is_new = match self.entries[slot] {
            Entry::Full(..) => false,
            // A reused tombstone is already part of `count`.
            Entry::Tombstone => true,
            Entry::Empty => {
                self.count += 1;
                true
            }
        };
        self.entries[slot] = Entry::Full(key, value);
        is_new
    }

    /// Deep lookup for the interner: find an existing key whose contents
    /// equal `chars`. Everything else in the table compares keys by
    /// identity; this is the one content-equality probe.
    pub fn find_string(&self, chars: &str, hash: u32) -> Option<Rc<ObjString>> {
        if self.entries.is_empty() {
            return None;
        }
        let mut index = hash as usize % self.entries.len();
        loop {
            match &self.entries[index] {
                Entry::Empty => return None,
                Entry::Tombstone => {}
                Entry::Full(key, _) => {
                    if key.hash == hash && &*key.chars == chars {
                        return Some(key.clone());
                    }
                }
            }
            index = (index + 1) % self.entries.len();
        }
    }

    /// Find the slot `key` lives in, or the slot an insert of `key` should
    /// use: the first tombstone seen on the probe path if any, otherwise
    /// the terminating empty slot.
    fn find_slot(&self, key: &Rc<ObjString>) -> usize {
        let mut index = key.hash as usize % self.entries.len();
        let mut tombstone: Option<usize> = None;
        loop {
            match &self.entries[index] {
                Entry::Empty => return tombstone.unwrap_or(index),
                Entry::Tombstone => {
                    if tombstone.is_none() {
                        tombstone = Some(index);
                    }
                }
                Entry::Full(existing, _) => {
                    if Rc::ptr_eq(existing, key) {
                        return index;
                    }
                }
            }
            index = (index + 1) % self.entries.len();
        }
    }

    /// Double the capacity and rehash the live entries; tombstones are not
    /// carried over, so `count` becomes the live count again.
    fn grow(&mut self) {
        let new_capacity = if self.entries.is_empty() {
            INITIAL_CAPACITY
        } else {
            self.entries.len() * 2
        };

        let old = std::mem::replace(&mut self.entries, vec![Entry::Empty; new_capacity]);
        self.count = 0;
        for entry in old {
            if let Entry::Full(key, value) = entry {
                let slot = self.find_slot(&key);
                self.entries[slot] = Entry::Full(key, value);
                self.count += 1;
            }
        }
    }
}

/// Deletion exists to pin down the tombstone contract; nothing in the VM
/// deletes entries (`SET_GLOBAL` checks existence before writing rather
/// than inserting and rolling back), so it is compiled for tests only.
#[cfg(test)]
impl Table {
    /// Remove `key`, leaving a tombstone. Returns `true` if it was present.
    fn delete(&mut self, key: &Rc<ObjString>) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let slot = self.find_slot(key);
        match self.entries[slot] {
            Entry::Full(..) => {
                self.entries[slot] = Entry::Tombstone;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object;

    fn interned(strings: &mut Table, s: &str) -> Rc<ObjString> {
        object::intern(strings, s)
    }

    #[test]
    fn set_get_overwrite() {
        let mut strings = Table::new();
        let mut table = Table::new();
        let key = interned(&mut strings, "answer");

        assert!(table.set(key.clone(), Value::Number(1.0)));
        assert_eq!(table.get(&key), Some(&Value::Number(1.0)));

        assert!(!table.set(key.clone(), Value::Number(2.0)));
        assert_eq!(table.get(&key), Some(&Value::Number(2.0)));
    }

    #[test]
    fn missing_key() {
        let mut strings = Table::new();
        let mut table = Table::new();
        let present = interned(&mut strings, "present");
        let absent = interned(&mut strings, "absent");
        table.set(present, Value::Nil);
        assert_eq!(table.get(&absent), None);
        assert!(!table.delete(&absent));
    }

    #[test]
    fn delete_leaves_probe_sequence_intact() {
        let mut strings = Table::new();
        let mut table = Table::new();

        // Enough keys that some certainly collide and chain.
        let keys: Vec<_> = (0..32)
            .map(|i| interned(&mut strings, &format!("key{}", i)))
            .collect();
        for (i, key) in keys.iter().enumerate() {
            table.set(key.clone(), Value::Number(i as f64));
        }

        // Delete every even key; every odd key must stay reachable even if
        // it probed past a now-deleted slot.
        for key in keys.iter().step_by(2) {
            assert!(table.delete(key));
        }
        for (i, key) in keys.iter().enumerate() {
            if i % 2 == 0 {
                assert_eq!(table.get(key), None);
            } else {
                assert_eq!(table.get(key), Some(&Value::Number(i as f64)));
            }
        }
    }

    #[test]
    fn tombstones_are_reused_by_inserts() {
        let mut strings = Table::new();
        let mut table = Table::new();
        let key = interned(&mut strings, "ghost");

        table.set(key.clone(), Value::Bool(true));
        let capacity = table.entries.len();
        table.delete(&key);

        // Re-inserting the same key reclaims the tombstone rather than
        // consuming a fresh empty slot.
        table.set(key.clone(), Value::Bool(false));
        assert_eq!(table.entries.len(), capacity);
        assert_eq!(table.get(&key), Some(&Value::Bool(false)));

        let full = table
            .entries
            .iter()
            .filter(|e| matches!(e, Entry::Full(..)))
            .count();
        assert_eq!(full, 1);
    }

    #[test]
    fn growth_preserves_entries_and_drops_tombstones() {
        let mut strings = Table::new();
        let mut table = Table::new();

        let doomed = interned(&mut strings, "doomed");
        table.set(doomed.clone(), Value::Nil);
        table.delete(&doomed);

        let keys: Vec<_> = (0..100)
            .map(|i| interned(&mut strings, &format!("k{}", i)))
            .collect();
        for (i, key) in keys.iter().enumerate() {
            table.set(key.clone(), Value::Number(i as f64));
        }

        for (i, key) in keys.iter().enumerate() {
            assert_eq!(table.get(key), Some(&Value::Number(i as f64)));
        }
        // After at least one resize, the tombstone is gone: count is
        // exactly the live entries.
        assert_eq!(table.count, 100);
    }

    #[test]
    fn find_string_compares_contents() {
        let mut strings = Table::new();
        let key = interned(&mut strings, "needle");
        let hash = ObjString::hash_of(b"needle");

        let found = strings.find_string("needle", hash).unwrap();
        assert!(Rc::ptr_eq(&found, &key));
        assert!(strings.find_string("haystack", hash).is_none());
    }
}
