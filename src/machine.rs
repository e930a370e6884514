/*!
  The machine itself: a pure state-transition loop over a program and a
  register table. The loop state is `Running(index, table)`; any index at or
  past the end of the program is `Halted(table)`. A `Recursive` instruction
  runs a nested invocation of the same loop over the same program from a
  different start index, then splices a prefix of its result back into the
  caller's table.
*/

use lazy_static::lazy_static;
use prettytable::{format as TableFormat, row, Table as TextTable};

use crate::bytecode::Opcode;
use crate::cache::{RunCache, SlotUpdateCache, RUN_CAPACITY, SLOT_UPDATE_CAPACITY};
use crate::error::MachineError;
use crate::program::Program;
use crate::table::Table;

/// Nested subroutine calls deeper than this fail with `ResourceExhausted`
/// instead of exhausting the host call stack.
pub const DEFAULT_CALL_DEPTH: usize = 4096;

/**
  Owns a program and the caches that make its repeated sub-computations
  tractable. One machine per top-level invocation: the caches start empty,
  fill during the run, and drop with the machine, which also keeps every test
  hermetic.
*/
pub struct Machine {
  program      : Program,
  slot_updates : SlotUpdateCache,
  runs         : RunCache,
  max_depth    : usize,

  // For tracing computations:
  #[cfg(feature = "trace_computation")] step : usize,
}

impl Machine {

  // region Construction

  pub fn new(program: Program) -> Machine {
    Machine::with_limits(program, DEFAULT_CALL_DEPTH, SLOT_UPDATE_CAPACITY, RUN_CAPACITY)
  }

  /// A machine with explicit resource bounds.
  pub fn with_limits(
    program       : Program,
    max_depth     : usize,
    slot_capacity : usize,
    run_capacity  : usize,
  ) -> Machine {
    Machine {
      program,
      slot_updates : SlotUpdateCache::new(slot_capacity),
      runs         : RunCache::new(run_capacity),
      max_depth,

      #[cfg(feature = "trace_computation")] step : 0,
    }
  }

  pub fn program(&self) -> &Program {
    &self.program
  }

  // endregion

  // region Execution

  /**
    Runs the program from `start` on `initial` until it halts and returns the
    final table. The program's operands are checked against the table before
    the first transition, so a run can only halt or exhaust a resource. A
    start index at or past the end of the program is already the halted state
    and returns the table unchanged.
  */
  pub fn run(&mut self, start: usize, initial: Table) -> Result<Table, MachineError> {
    self.program.validate(initial.len())?;
    self.execute(start, initial, 0)
  }

  // One (possibly nested) run of the transition loop, memoized on its exact
  // inputs. The program is fixed for the machine's lifetime, so `(start,
  // initial)` identifies the sub-run completely.
  fn execute(&mut self, start: usize, initial: Table, depth: usize)
    -> Result<Table, MachineError>
  {
    if depth >= self.max_depth {
      return Err(MachineError::ResourceExhausted { depth });
    }
    if let Some(finished) = self.runs.get(start, &initial) {
      return Ok(finished);
    }

    let mut index = start;
    let mut table = initial.clone();

    while index < self.program.len() {
      let instruction = self.program.instruction(index).clone();

      #[cfg(feature = "trace_computation")]
      self.trace(index, &instruction, &table);

      match instruction.opcode {

        Opcode::Sum => {
          let value = table.slot(instruction.entry)?;
          table = self.slot_updates.update(&table, instruction.entry, value + 1)?;
          index = instruction.left_next;
        }

        Opcode::Sub => {
          match table.slot(instruction.entry)? {
            0 => {
              index = instruction.right_next;
            }
            value => {
              table = self.slot_updates.update(&table, instruction.entry, value - 1)?;
              index = instruction.left_next;
            }
          }
        }

        Opcode::Recursive => {
          // `entry` counts the result slots the subroutine hands back; zero
          // means no call happens at all. Slots past `entry` keep the
          // caller's values no matter what the subroutine did to them.
          if instruction.entry > 0 {
            let finished = self.execute(instruction.left_next, table.clone(), depth + 1)?;
            for slot in 0..instruction.entry {
              table = self.slot_updates.update(&table, slot, finished.slot(slot)?)?;
            }
          }
          index = instruction.right_next;
        }

      }
    }

    self.runs.insert(start, initial, table.clone());
    Ok(table)
  }

  #[cfg(feature = "trace_computation")]
  fn trace(&mut self, index: usize, instruction: &crate::bytecode::Instruction, table: &Table) {
    self.step += 1;
    println!("step {:>6}  #{:<4} {}", self.step, index, instruction);
    register_table(table, Some(instruction.entry)).printstd();
  }

  // endregion

}

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

/// Renders a register table for display, optionally highlighting one slot.
pub fn register_table(table: &Table, highlight: Option<usize>) -> TextTable {
  let mut text_table = TextTable::new();

  text_table.set_format(*TABLE_DISPLAY_FORMAT);
  text_table.set_titles(row![ubr->"Slot", ubl->"Contents"]);

  for (i, value) in table.slots().iter().enumerate() {
    match Some(i) == highlight {

      true  => {
        text_table.add_row(
          row![r->format!("* --> R[{}] =", i), format!("{}", value)]
        );
      }

      false => {
        text_table.add_row(
          row![r->format!("R[{}] =", i), format!("{}", value)]
        );
      }

    } // end match on highlight
  } // end for
  text_table
}
