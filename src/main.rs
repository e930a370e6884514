//! Command line entry point: build the initial table, run a machine program
//! to completion, print the final register table.
#![allow(dead_code)]

mod bytecode;
mod cache;
mod error;
mod machine;
mod program;
mod table;

use std::fs;
use std::process;

use argh::FromArgs;

use crate::cache::{RUN_CAPACITY, SLOT_UPDATE_CAPACITY};
use crate::error::MachineError;
use crate::machine::{register_table, Machine, DEFAULT_CALL_DEPTH};
use crate::program::Program;
use crate::table::{SlotValue, Table};

/// The published counter program ships with the binary but stays ordinary
/// program data: any other program file can be substituted for it.
static COUNTER_PROGRAM: &str = include_str!("../programs/counter.urm");

/// The table size the published counter program was written against.
const COUNTER_TABLE_SIZE: usize = 26;

#[derive(FromArgs)]
/// Run an unbounded-register-machine program to completion and print the
/// final register table.
struct Arguments {
  /// initial value of register slot 0
  #[argh(positional)]
  initial_value: SlotValue,

  /// a program file to run instead of the built-in counter program
  #[argh(option, short = 'p')]
  program: Option<String>,

  /// number of register slots in the table
  #[argh(option, short = 'r', default = "COUNTER_TABLE_SIZE")]
  registers: usize,

  /// maximum depth of nested subroutine calls
  #[argh(option, default = "DEFAULT_CALL_DEPTH")]
  max_depth: usize,
}

fn main() {
  let arguments: Arguments = argh::from_env();

  #[cfg(feature = "trace_computation")]
  println!("Computation Tracing ENABLED");

  match execute(&arguments) {
    Ok(finished) => {
      register_table(&finished, None).printstd();
    }
    Err(error) => {
      eprintln!("error: {}", error);
      process::exit(1);
    }
  }
}

fn execute(arguments: &Arguments) -> Result<Table, MachineError> {
  let program = match &arguments.program {
    Some(path) => {
      let text = fs::read_to_string(path).map_err(|error| {
        MachineError::InvalidInput(format!("cannot read {}: {}", path, error))
      })?;
      Program::from_assembly(&text)?
    }
    None => Program::from_assembly(COUNTER_PROGRAM)?,
  };

  let initial = Table::new(arguments.initial_value, arguments.registers);
  let mut machine = Machine::with_limits(
    program,
    arguments.max_depth,
    SLOT_UPDATE_CAPACITY,
    RUN_CAPACITY,
  );
  machine.run(0, initial)
}
