//! The encode buffer: a flat, self-delimiting postfix word sequence.
//!
//! Operand words always precede their operation's tag word, and a nested
//! sub-expression (the overlay source) is written in full before the overlay
//! tag. There are no length prefixes; a reader reconstructs sub-expression
//! boundaries purely from which tag it reads next and that tag's arity.

use crate::error::{ImfxError, ImfxResult};

/// Operation tag. Each variant has a fixed trailing-operand count except
/// [`Op::Overlay`], whose operand is a full nested sub-expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    ImageRef,
    Fit,
    Fill,
    Blur,
    Overlay,
}

impl Op {
    /// Trailing operand count, or `None` when the operand region is a nested
    /// sub-expression.
    pub fn arity(self) -> Option<usize> {
        match self {
            Op::ImageRef => Some(1),
            Op::Fit | Op::Fill => Some(2),
            Op::Blur => Some(1),
            Op::Overlay => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Op::ImageRef => "id",
            Op::Fit => "ft",
            Op::Fill => "fl",
            Op::Blur => "gb",
            Op::Overlay => "pi",
        }
    }
}

/// One word of the encoded program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Word {
    Int(u32),
    Tag(Op),
}

/// Rollback point captured by [`Program::mark`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mark(usize);

/// Append-only word sequence with mark/rollback, written by the parser and
/// frozen before evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    words: Vec<Word>,
}

impl Program {
    pub fn new() -> Self {
        Self { words: Vec::new() }
    }

    pub fn push_int(&mut self, value: u32) {
        self.words.push(Word::Int(value));
    }

    pub fn push_tag(&mut self, op: Op) {
        self.words.push(Word::Tag(op));
    }

    /// Captures the current length so a failed alternative can be undone.
    pub fn mark(&self) -> Mark {
        Mark(self.words.len())
    }

    /// Truncates back to a previously captured mark. This is the normal
    /// backtracking mechanism, not an error path.
    pub fn rollback_to(&mut self, mark: Mark) {
        debug_assert!(mark.0 <= self.words.len());
        self.words.truncate(mark.0);
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Reader positioned just past the last word.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor {
            words: &self.words,
            pos: self.words.len(),
        }
    }
}

/// Destructive reader over a frozen program. The position only moves toward
/// the start; each word is read at most once.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    words: &'a [Word],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Words not yet consumed.
    pub fn remaining(&self) -> usize {
        self.pos
    }

    /// Reads the word preceding the cursor, moving toward the start.
    pub fn pop(&mut self) -> ImfxResult<Word> {
        if self.pos == 0 {
            return Err(ImfxError::evaluation("program underrun (malformed)"));
        }
        self.pos -= 1;
        Ok(self.words[self.pos])
    }

    /// Reads a word that must be an operand.
    pub fn pop_int(&mut self) -> ImfxResult<u32> {
        match self.pop()? {
            Word::Int(v) => Ok(v),
            Word::Tag(op) => Err(ImfxError::evaluation(format!(
                "expected operand word, found tag '{}' (malformed program)",
                op.name()
            ))),
        }
    }

    /// Reads a word that must be a tag.
    pub fn pop_tag(&mut self) -> ImfxResult<Op> {
        match self.pop()? {
            Word::Tag(op) => Ok(op),
            Word::Int(v) => Err(ImfxError::evaluation(format!(
                "expected tag word, found operand {v} (malformed program)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollback_truncates_to_mark() {
        let mut p = Program::new();
        p.push_int(7);
        p.push_tag(Op::ImageRef);
        let mark = p.mark();
        p.push_int(100);
        p.push_int(200);
        p.push_tag(Op::Fit);
        assert_eq!(p.len(), 5);
        p.rollback_to(mark);
        assert_eq!(p.len(), 2);
        assert_eq!(p.words(), &[Word::Int(7), Word::Tag(Op::ImageRef)]);
    }

    #[test]
    fn rollback_to_empty_mark_clears_everything() {
        let mut p = Program::new();
        let mark = p.mark();
        p.push_int(1);
        p.push_tag(Op::Blur);
        p.rollback_to(mark);
        assert!(p.is_empty());
    }

    #[test]
    fn cursor_reads_from_the_end() {
        let mut p = Program::new();
        p.push_int(3);
        p.push_tag(Op::ImageRef);
        p.push_int(150);
        p.push_tag(Op::Blur);

        let mut c = p.cursor();
        assert_eq!(c.pop_tag().unwrap(), Op::Blur);
        assert_eq!(c.pop_int().unwrap(), 150);
        assert_eq!(c.pop_tag().unwrap(), Op::ImageRef);
        assert_eq!(c.pop_int().unwrap(), 3);
        assert_eq!(c.remaining(), 0);
        assert!(c.pop().is_err());
    }

    #[test]
    fn cursor_reports_word_kind_mismatch() {
        let mut p = Program::new();
        p.push_int(3);
        let mut c = p.cursor();
        assert!(c.pop_tag().is_err());

        let mut p = Program::new();
        p.push_tag(Op::Fill);
        let mut c = p.cursor();
        assert!(c.pop_int().is_err());
    }

    #[test]
    fn arity_table_is_closed() {
        assert_eq!(Op::ImageRef.arity(), Some(1));
        assert_eq!(Op::Fit.arity(), Some(2));
        assert_eq!(Op::Fill.arity(), Some(2));
        assert_eq!(Op::Blur.arity(), Some(1));
        assert_eq!(Op::Overlay.arity(), None);
    }
}
