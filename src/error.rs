//! The error type shared by the machine, its caches, and program loading.
//! Every error is fatal to the run that raised it: the machine is a
//! deterministic function of its inputs, so retrying can never help.

use thiserror::Error;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum MachineError {
  /// A slot reference or jump target points outside the table or program.
  #[error("index {index} is out of range (limit {limit})")]
  IndexOutOfRange { index: usize, limit: usize },

  #[error("exceeded the limit of {depth} nested subroutine calls")]
  ResourceExhausted { depth: usize },

  #[error("invalid input: {0}")]
  InvalidInput(String),
}
