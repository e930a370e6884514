//! The register table: the complete state of the machine's slots at one
//! instant. Tables never mutate in place; every update yields a new value.

use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::error::MachineError;

/// Slots hold non-negative integers.
pub type SlotValue = u64;
// `SlotIndex` is `usize`, as it is naturally an index into the table.
pub type SlotIndex = usize;

/**
  A fixed-length, immutable sequence of slot values. The slots live behind an
  `Rc`, so clones are cheap pointer copies and many tables can share storage.
  Equality and hashing are slot-wise by value, which is what makes tables
  usable as cache keys: equal tables are interchangeable.
*/
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Table {
  slots: Rc<[SlotValue]>,
}

impl Table {

  /// A new table with slot 0 holding `initial_value` and every other slot zero.
  pub fn new(initial_value: SlotValue, size: usize) -> Table {
    let mut slots = vec![0; size];
    if size > 0 {
      slots[0] = initial_value;
    }
    Table { slots: slots.into() }
  }

  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  /// Checked read of a single slot.
  pub fn slot(&self, index: SlotIndex) -> Result<SlotValue, MachineError> {
    match self.slots.get(index) {
      Some(value) => Ok(*value),
      None => Err(MachineError::IndexOutOfRange { index, limit: self.len() }),
    }
  }

  /**
    A new table identical to this one except that slot `index` holds `value`.
    The receiver is left untouched. Fails if `index` is past the end; the
    table length is fixed for the whole run.
  */
  pub fn with_slot(&self, index: SlotIndex, value: SlotValue) -> Result<Table, MachineError> {
    if index >= self.len() {
      return Err(MachineError::IndexOutOfRange { index, limit: self.len() });
    }
    let mut slots = self.slots.to_vec();
    slots[index] = value;
    Ok(Table { slots: slots.into() })
  }

  pub fn slots(&self) -> &[SlotValue] {
    &self.slots
  }

}

impl Display for Table {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "({})",
      self.slots
          .iter()
          .map(|value| value.to_string())
          .collect::<Vec<String>>()
          .join(", ")
    )
  }
}
