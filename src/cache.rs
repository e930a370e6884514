/*!
  Memoization for the two pure functions the machine leans on: single-slot
  table updates and whole sub-runs. Tables are immutable and the transition
  function is deterministic, so a cached answer can never go stale; the
  capacity bound is purely a memory control, not a correctness measure. At
  capacity, lookups keep working and new results are simply not retained.

  Each machine owns a fresh pair of caches, so memory does not accumulate
  across top-level invocations.
*/

use std::collections::HashMap;

use crate::error::MachineError;
use crate::table::{SlotIndex, SlotValue, Table};

// Default capacities, sized for the published counter program's workloads.
pub const SLOT_UPDATE_CAPACITY: usize = 1 << 20;
pub const RUN_CAPACITY: usize = 1 << 25;

/// Memoizes `Table::with_slot`, keyed by the exact update triple. Overlapping
/// writes repeat constantly across nested runs; this trades one table clone
/// per hit for the allocation and copy of a fresh table.
pub struct SlotUpdateCache {
  entries: HashMap<(Table, SlotIndex, SlotValue), Table>,
  capacity: usize,
}

impl SlotUpdateCache {

  pub fn new(capacity: usize) -> SlotUpdateCache {
    SlotUpdateCache {
      entries: HashMap::new(),
      capacity,
    }
  }

  /// A table with `entry` holding `value`, reusing an earlier result when the
  /// same update has been performed before.
  pub fn update(&mut self, table: &Table, entry: SlotIndex, value: SlotValue)
    -> Result<Table, MachineError>
  {
    let key = (table.clone(), entry, value);
    if let Some(updated) = self.entries.get(&key) {
      return Ok(updated.clone());
    }

    let updated = table.with_slot(entry, value)?;
    if self.entries.len() < self.capacity {
      self.entries.insert(key, updated.clone());
    }
    Ok(updated)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

}

/// Memoizes whole sub-runs against the one program its machine owns, keyed by
/// the start index and the table the run began from. Identical sub-runs are
/// reached from different call sites and recursion depths; without this the
/// nested-call evaluation duplicates work exponentially in call depth.
pub struct RunCache {
  entries: HashMap<(usize, Table), Table>,
  capacity: usize,
}

impl RunCache {

  pub fn new(capacity: usize) -> RunCache {
    RunCache {
      entries: HashMap::new(),
      capacity,
    }
  }

  pub fn get(&self, index: usize, table: &Table) -> Option<Table> {
    self.entries.get(&(index, table.clone())).cloned()
  }

  pub fn insert(&mut self, index: usize, table: Table, finished: Table) {
    if self.entries.len() < self.capacity {
      self.entries.insert((index, table), finished);
    }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slot_update_hit_matches_a_direct_update() {
    let mut cache = SlotUpdateCache::new(16);
    let table = Table::new(4, 3);
    let first = cache.update(&table, 1, 9).unwrap();
    let second = cache.update(&table, 1, 9).unwrap();
    assert_eq!(first, table.with_slot(1, 9).unwrap());
    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
  }

  #[test]
  fn slot_update_propagates_bounds_errors() {
    let mut cache = SlotUpdateCache::new(16);
    let table = Table::new(0, 2);
    assert!(cache.update(&table, 5, 1).is_err());
    assert_eq!(cache.len(), 0);
  }

  #[test]
  fn full_slot_cache_still_computes() {
    let mut cache = SlotUpdateCache::new(1);
    let table = Table::new(0, 3);
    cache.update(&table, 0, 1).unwrap();
    // The cache is full; results stay correct, they just are not retained.
    let updated = cache.update(&table, 1, 7).unwrap();
    assert_eq!(updated.slot(1), Ok(7));
    assert_eq!(cache.len(), 1);
  }

  #[test]
  fn run_cache_round() {
    let mut cache = RunCache::new(16);
    let initial = Table::new(2, 3);
    let finished = Table::new(0, 3);
    assert_eq!(cache.get(4, &initial), None);
    cache.insert(4, initial.clone(), finished.clone());
    assert_eq!(cache.get(4, &initial), Some(finished));
    // A different start index is a different sub-run.
    assert_eq!(cache.get(5, &initial), None);
  }

}
