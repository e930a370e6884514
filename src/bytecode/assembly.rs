/*!
  The human readable textual form of a program is called assembly. One
  instruction per line:

      13: Recursive(1, 108, 14)

  The leading `13:` label is optional and only sets the instruction's
  informational number; when it is absent the instruction's position among
  the parsed lines is used. A `%` starts a comment running to the end of the
  line, and blank lines are ignored.
*/

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use nom::{
  character::complete::{
    alpha1,
    char as one_char,
    digit1,
    space0
  },
  combinator::opt,
  multi::separated_list0,
  sequence::{
    delimited,
    preceded,
    terminated,
    tuple
  },
  IResult
};

use crate::bytecode::{Instruction, Opcode};
use crate::error::MachineError;

/// What one assembly line parses to: an instruction, or a description of why
/// it is not one.
pub enum ParsedAssemblySyntax {
  Instruction(Instruction),
  NotAnOperation{
    line: u32,
    name: String
  },
  WrongArity{
    line: u32,
    operation: Opcode,
    args: Vec<usize>
  }
}
// Abbreviated name internally
use ParsedAssemblySyntax as Syntax;

impl Display for ParsedAssemblySyntax {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Syntax::Instruction(i) => {
        write!(f, "{}", i)
      }
      Syntax::NotAnOperation { line, name } => {
        write!(f, "Error on line {}: {} is not an operation.", line, name)
      }
      Syntax::WrongArity { line, operation, args } => {
        write!(f,
          "Error on line {}: {} requires 3 arguments but was given {}: ({})",
          line, operation, args.len(),
          args.iter()
              .map(usize::to_string)
              .collect::<Vec<String>>()
              .join(", ")
        )
      }
    }
  }
}

fn operand_list(input: &str) -> IResult<&str, Vec<&str>> {
  delimited(
    delimited(space0, one_char('('), space0),
    separated_list0(delimited(space0, one_char(','), space0), digit1),
    preceded(space0, one_char(')')),
  )(input)
}

fn instruction_line(input: &str) -> IResult<&str, (Option<&str>, &str, Vec<&str>)> {
  tuple((
    delimited(
      space0,
      opt(terminated(digit1, preceded(space0, one_char(':')))),
      space0,
    ),
    alpha1,
    operand_list,
  ))(input)
}

fn parse_operand(text: &str, line: u32) -> Result<usize, MachineError> {
  text.parse::<usize>().map_err(|_| {
    MachineError::InvalidInput(format!("line {}: {} is not a valid operand", line, text))
  })
}

/**
  Parses assembly text into one `ParsedAssemblySyntax` per instruction line.
  Lines that cannot be read as an instruction shape at all are a hard error;
  lines with an unknown operation name or the wrong operand count come back
  as the corresponding error variants so the caller can report them together.
*/
pub fn parse_assembly(text: &str) -> Result<Vec<Syntax>, MachineError> {
  let mut parsed: Vec<Syntax> = Vec::new();
  let mut position: usize = 0;

  for (line_index, raw_line) in text.lines().enumerate() {
    let line_number = (line_index + 1) as u32;
    let line = match raw_line.find('%') {
      Some(comment_start) => &raw_line[..comment_start],
      None => raw_line,
    };
    if line.trim().is_empty() {
      continue;
    }

    match instruction_line(line) {

      Ok((rest, (label, name, operand_text))) if rest.trim().is_empty() => {
        let number = match label {
          Some(text) => parse_operand(text, line_number)?,
          None => position,
        };
        let mut args: Vec<usize> = Vec::with_capacity(operand_text.len());
        for text in operand_text {
          args.push(parse_operand(text, line_number)?);
        }

        match Opcode::from_str(name) {

          Ok(operation) if args.len() == 3 => {
            parsed.push(Syntax::Instruction(Instruction {
              number,
              opcode: operation,
              entry: args[0],
              left_next: args[1],
              right_next: args[2],
            }));
          }

          Ok(operation) => {
            parsed.push(Syntax::WrongArity { line: line_number, operation, args });
          }

          _e => {
            parsed.push(Syntax::NotAnOperation { line: line_number, name: name.to_string() });
          }

        }
        position += 1;
      }

      _ => {
        return Err(MachineError::InvalidInput(
          format!("line {} is not an instruction: {}", line_number, raw_line.trim())
        ));
      }

    }
  }

  Ok(parsed)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn single_instruction(text: &str) -> Instruction {
    let mut parsed = parse_assembly(text).unwrap();
    assert_eq!(parsed.len(), 1);
    match parsed.pop().unwrap() {
      Syntax::Instruction(instruction) => instruction,
      other => panic!("expected an instruction, got: {}", other),
    }
  }

  #[test]
  fn labeled_instruction() {
    let instruction = single_instruction("13: Recursive(1, 108, 14)");
    assert_eq!(instruction.number, 13);
    assert_eq!(instruction.opcode, Opcode::Recursive);
    assert_eq!(instruction.entry, 1);
    assert_eq!(instruction.left_next, 108);
    assert_eq!(instruction.right_next, 14);
  }

  #[test]
  fn unlabeled_instructions_number_by_position() {
    let parsed = parse_assembly("Sub(0, 1, 2)\nSum(1, 0, 0)").unwrap();
    let numbers: Vec<usize> = parsed
      .iter()
      .map(|syntax| match syntax {
        Syntax::Instruction(instruction) => instruction.number,
        other => panic!("expected an instruction, got: {}", other),
      })
      .collect();
    assert_eq!(numbers, vec![0, 1]);
  }

  #[test]
  fn comments_and_blank_lines() {
    let text = "% a full-line comment\n\n  0: Sub(0, 1, 2)  % trailing comment\n";
    let instruction = single_instruction(text);
    assert_eq!(instruction.opcode, Opcode::Sub);
  }

  #[test]
  fn tolerates_interior_whitespace() {
    let instruction = single_instruction("  5 :  Sum (  2 , 3 ,0 )  ");
    assert_eq!(instruction.number, 5);
    assert_eq!(instruction.entry, 2);
    assert_eq!(instruction.left_next, 3);
    assert_eq!(instruction.right_next, 0);
  }

  #[test]
  fn unknown_operation() {
    let parsed = parse_assembly("Robert(2, 3, 4)").unwrap();
    match &parsed[0] {
      Syntax::NotAnOperation { line, name } => {
        assert_eq!(*line, 1);
        assert_eq!(name, "Robert");
      }
      other => panic!("expected NotAnOperation, got: {}", other),
    }
  }

  #[test]
  fn wrong_arity() {
    let parsed = parse_assembly("Sum(1, 2)").unwrap();
    match &parsed[0] {
      Syntax::WrongArity { line, operation, args } => {
        assert_eq!(*line, 1);
        assert_eq!(*operation, Opcode::Sum);
        assert_eq!(args, &vec![1, 2]);
      }
      other => panic!("expected WrongArity, got: {}", other),
    }
  }

  #[test]
  fn malformed_line_is_rejected() {
    assert!(parse_assembly("this is not assembly").is_err());
    assert!(parse_assembly("Sum(1, 2, 3) trailing junk").is_err());
  }

}
