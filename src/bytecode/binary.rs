//! Packing instructions into their binary word form and back. See the module
//! documentation in `bytecode` for the layout.

use crate::bytecode::{Instruction, Opcode};
use crate::error::MachineError;

// If you change these you must also change `encode_instruction` and `try_decode_instruction`.
pub type Word = u32;
pub type DoubleWord = u64;

/// Convenience for decomposing a `DoubleWord` into a high word and a low word:
pub struct TwoWords {
  pub low: Word,
  pub high: Word,
}

const ENTRY_LIMIT: DoubleWord = 1 << 24;
const NEXT_LIMIT: DoubleWord = 1 << 16;

/**
  Encodes the instruction into one `DoubleWord`:
  `[Opcode:8][Entry:24][LeftNext:16][RightNext:16]`. The informational
  instruction number is not carried. Fails if an operand does not fit its
  field width.
*/
pub fn encode_instruction(instruction: &Instruction) -> Result<DoubleWord, MachineError> {
  let entry = instruction.entry as DoubleWord;
  let left = instruction.left_next as DoubleWord;
  let right = instruction.right_next as DoubleWord;

  if entry >= ENTRY_LIMIT || left >= NEXT_LIMIT || right >= NEXT_LIMIT {
    return Err(MachineError::InvalidInput(
      format!("instruction {} does not fit the binary encoding", instruction)
    ));
  }

  Ok(
    ( instruction.opcode.code() as DoubleWord)        +
    ( entry << 8 ) +
    ( left  << 32) +
    ( right << 48)
  )
}

/**
  Decodes one `DoubleWord` back into an instruction. `number` is the
  instruction's position in the word stream, since the binary form does not
  carry it. Fails on an unknown opcode byte.
*/
pub fn try_decode_instruction(word: DoubleWord, number: usize) -> Result<Instruction, MachineError> {
  let opcode = Opcode::try_from((word & 0xFF) as u8).map_err(|_| {
    MachineError::InvalidInput(format!("{:#018x} does not begin with a known opcode", word))
  })?;

  Ok(Instruction {
    number,
    opcode,
    entry: ((word >> 8) & 0xFF_FFFF) as usize,
    left_next: ((word >> 32) & 0xFFFF) as usize,
    right_next: (word >> 48) as usize,
  })
}

/// Splits an encoded instruction for storage in a 32 bit word stream.
pub fn split_words(word: DoubleWord) -> TwoWords {
  TwoWords {
    low: word as Word,
    high: (word >> 32) as Word,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn encoding_layout() {
    let instruction = Instruction {
      number: 0,
      opcode: Opcode::Sub,
      entry: 0,
      left_next: 1,
      right_next: 2,
    };
    // Opcode 1 in the low byte, left next in bits 32.., right next in bits 48..
    let expected: DoubleWord = 1 + (1 << 32) + (2 << 48);
    assert_eq!(encode_instruction(&instruction), Ok(expected));

    let words = split_words(expected);
    assert_eq!(words.low, 1);
    assert_eq!(words.high, 1 + (2 << 16));
  }

  #[test]
  fn decoding_recovers_the_fields() {
    let word: DoubleWord = 2 + (3 << 8) + (108 << 32) + (14 << 48);
    let instruction = try_decode_instruction(word, 13).unwrap();
    assert_eq!(instruction.number, 13);
    assert_eq!(instruction.opcode, Opcode::Recursive);
    assert_eq!(instruction.entry, 3);
    assert_eq!(instruction.left_next, 108);
    assert_eq!(instruction.right_next, 14);
  }

  #[test]
  fn unknown_opcode_byte_is_rejected() {
    assert!(try_decode_instruction(0xFF, 0).is_err());
  }

  #[test]
  fn oversized_operand_is_rejected() {
    let instruction = Instruction {
      number: 0,
      opcode: Opcode::Sum,
      entry: 0,
      left_next: 1 << 16,
      right_next: 0,
    };
    assert!(encode_instruction(&instruction).is_err());
  }

}
