//! Scoped checkpoint guard.

use crate::model::VcSet;
use crate::value::Value;
use std::ops::{Deref, DerefMut};

/// Mutable borrow of a [`VcSet`] that puts every variable's value and
/// checkpoint back when dropped.
///
/// Creating the guard saves the `(value, checkpoint)` pairs and then calls
/// [`VcSet::store`], so search code starts with checkpoints equal to the
/// caller's values. Restoration runs on every exit path, unwinding
/// included.
pub(crate) struct CheckpointGuard<'a> {
    set: &'a mut VcSet,
    saved: Vec<(Value, Value)>,
}

impl<'a> CheckpointGuard<'a> {
    pub(crate) fn new(set: &'a mut VcSet) -> Self {
        let saved = set.states();
        set.store();
        Self { set, saved }
    }
}

impl Deref for CheckpointGuard<'_> {
    type Target = VcSet;

    fn deref(&self) -> &VcSet {
        self.set
    }
}

impl DerefMut for CheckpointGuard<'_> {
    fn deref_mut(&mut self) -> &mut VcSet {
        self.set
    }
}

impl Drop for CheckpointGuard<'_> {
    fn drop(&mut self) {
        self.set.reset_states(&self.saved);
    }
}
