/*!

  Machine instructions and the serialized forms they travel in.

  In memory an instruction is a plain struct; a program is an ordered sequence
  of them. Two interchange forms are supported. Assembly is the human readable
  text format, one instruction per line. The binary form packs each
  instruction into a single 64 bit little-endian word:

    Opcode:      8 bits
    Entry:      24 bits
    Next index: 16 bits each

  The informational instruction number does not appear in the binary form. It
  is symbolic bookkeeping carried by the source text; decoding assigns each
  instruction its position in the decoded sequence instead.

*/

mod assembly;
mod binary;
mod instruction;

pub use assembly::{parse_assembly, ParsedAssemblySyntax};
pub use binary::{encode_instruction, split_words, try_decode_instruction, DoubleWord, TwoWords, Word};
pub use instruction::{Instruction, Opcode};
