//! Diagnostic rendering of a compiled program.
//!
//! [`render_tree`] walks the program exactly like the evaluator does, but
//! prints operation names and operands as an indented tree instead of
//! applying transforms. Its shape therefore mirrors the grammar's parse tree,
//! which the tests lean on to check the self-delimiting encoding.

use std::fmt::Write as _;

use crate::{
    error::ImfxResult,
    program::{Cursor, Op, Program},
};

/// One-line rendering of the raw word sequence, oldest word first.
pub fn render_words(program: &Program) -> String {
    let mut out = String::new();
    for word in program.words() {
        if !out.is_empty() {
            out.push(' ');
        }
        match word {
            crate::program::Word::Int(v) => {
                let _ = write!(out, "{v}");
            }
            crate::program::Word::Tag(op) => out.push_str(op.name()),
        }
    }
    out
}

/// Renders the program as an indented tree, two spaces per nesting level.
pub fn render_tree(program: &Program) -> ImfxResult<String> {
    let mut out = String::new();
    let mut cursor = program.cursor();
    render_sub(&mut cursor, 0, &mut out)?;
    Ok(out)
}

fn render_sub(cursor: &mut Cursor<'_>, indent: usize, out: &mut String) -> ImfxResult<()> {
    loop {
        let op = cursor.pop_tag()?;
        if op == Op::ImageRef {
            let index = cursor.pop_int()?;
            let _ = writeln!(out, "{:indent$}{index}", "");
            return Ok(());
        }
        let _ = writeln!(out, "{:indent$}{}", "", op.name());
        match op.arity() {
            Some(n) => {
                for _ in 0..n {
                    let operand = cursor.pop_int()?;
                    let _ = writeln!(out, "{:width$}{operand}", "", width = indent + 2);
                }
            }
            None => render_sub(cursor, indent + 2, out)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    #[test]
    fn single_ref_renders_its_index() {
        let program = parse("3", 4).unwrap();
        assert_eq!(render_tree(&program).unwrap(), "3\n");
    }

    #[test]
    fn chain_renders_last_operation_first() {
        let program = parse("0.ft(100x50).gb(200)", 1).unwrap();
        let expected = "\
gb
  200
ft
  50
  100
0
";
        assert_eq!(render_tree(&program).unwrap(), expected);
    }

    #[test]
    fn overlay_indents_its_nested_expression() {
        let program = parse("0.pi(1.gb(150)).fl(10x20)", 2).unwrap();
        let expected = "\
fl
  20
  10
pi
  gb
    150
  1
0
";
        assert_eq!(render_tree(&program).unwrap(), expected);
    }

    #[test]
    fn words_render_in_emission_order() {
        let program = parse("0.pi(1)", 2).unwrap();
        assert_eq!(render_words(&program), "0 id 1 id pi");
    }

    #[test]
    fn tree_shape_matches_nesting_depth() {
        let program = parse("0.pi(1.pi(0))", 2).unwrap();
        let expected = "\
pi
  pi
    0
  1
0
";
        assert_eq!(render_tree(&program).unwrap(), expected);
    }
}
