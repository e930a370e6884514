use std::fmt::{Display, Formatter};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display as StrumDisplay, EnumString, IntoStaticStr};

use crate::table::SlotIndex;

/**
  Opcodes of the machine.

  The discriminants double as the numeric opcodes of the binary instruction
  encoding, so the order the variants are listed below is significant.
  Order-dependencies:
      ```
      binary::encode_instruction()
      binary::try_decode_instruction()
      ```
*/
#[derive(
  StrumDisplay, IntoStaticStr, EnumString, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq,         PartialEq,        Debug, Hash
)]
#[repr(u8)]
pub enum Opcode {
  /// Increment the slot at `entry`, continue at `left_next`.
  Sum,
  /// Decrement the slot at `entry` and continue at `left_next`, or leave the
  /// table alone and continue at `right_next` when the slot is already zero.
  Sub,
  /// Run a nested pass of the machine from `left_next`, copy the first
  /// `entry` slots of its result back, continue at `right_next`.
  Recursive,
}

impl Opcode {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }
}

/**
  One program step. `number` is an informational identifier carried over from
  the program source; control flow only ever uses instruction positions.

  `entry` is overloaded by opcode: for `Sum` and `Sub` it references the slot
  being operated on, while for `Recursive` it counts the leading result slots
  a subroutine propagates back to its caller. A `Recursive` with `entry` zero
  performs no call at all.
*/
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Instruction {
  pub number     : usize,
  pub opcode     : Opcode,
  pub entry      : SlotIndex,
  pub left_next  : usize,
  pub right_next : usize,
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}({}, {}, {})", self.opcode, self.entry, self.left_next, self.right_next)
  }
}
