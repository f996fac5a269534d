//! Recursive-descent parser for the pipeline expression language.
//!
//! Grammar (ordered choice, first match wins):
//!
//! ```text
//! number   := digit+
//! size     := number 'x' number
//! imageRef := digit
//! fit      := "ft(" size ")"
//! fill     := "fl(" size ")"
//! blur     := "gb(" number ")"
//! overlay  := "pi(" expr ")"
//! step     := fit | fill | overlay | blur | imageRef
//! expr     := imageRef ('.' step)*
//! ```
//!
//! The parser emits operand and tag words into the [`Program`] as it matches.
//! Every rule that emits captures the input position and a program mark on
//! entry and restores both on any failure path, so a failed alternative
//! leaves no trace in the program, at every nesting depth.

use tracing::trace;

use crate::{
    error::{ImfxError, ImfxResult},
    program::{Mark, Op, Program},
};

/// Compiles an expression into a frozen [`Program`].
///
/// The whole input must be consumed; trailing characters, an unmatched
/// alternative, or an image index at or beyond `image_count` all fail with
/// [`ImfxError::IllegalExpression`].
pub fn parse(src: &str, image_count: usize) -> ImfxResult<Program> {
    let mut parser = Parser {
        input: src.as_bytes(),
        pos: 0,
        out: Program::new(),
        image_count,
        diag: None,
    };

    let matched = parser.expr();
    if !matched || parser.pos != parser.input.len() {
        let msg = match parser.diag {
            Some(diag) => format!("'{src}': {diag}"),
            None => format!("'{src}'"),
        };
        return Err(ImfxError::illegal_expression(msg));
    }
    Ok(parser.out)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    out: Program,
    image_count: usize,
    /// First refinement of a plain grammar mismatch (out-of-range image
    /// index, numeric overflow), surfaced if the parse ultimately fails.
    diag: Option<String>,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn eat_str(&mut self, s: &[u8]) -> bool {
        if self.input[self.pos..].starts_with(s) {
            self.pos += s.len();
            return true;
        }
        false
    }

    fn save(&self) -> (usize, Mark) {
        (self.pos, self.out.mark())
    }

    fn restore(&mut self, pos: usize, mark: Mark) {
        let before = self.out.len();
        self.pos = pos;
        self.out.rollback_to(mark);
        let dropped = before - self.out.len();
        if dropped > 0 {
            trace!(dropped, "rollback");
        }
    }

    fn expr(&mut self) -> bool {
        if !self.image_ref() {
            return false;
        }
        loop {
            let (pos, mark) = self.save();
            if self.eat(b'.') && self.step() {
                continue;
            }
            self.restore(pos, mark);
            return true;
        }
    }

    fn step(&mut self) -> bool {
        self.delimited(b"ft(", Self::size, Op::Fit)
            || self.delimited(b"fl(", Self::size, Op::Fill)
            || self.delimited(b"pi(", Self::expr, Op::Overlay)
            || self.delimited(b"gb(", Self::number, Op::Blur)
            || self.image_ref()
    }

    /// `<prefix> inner ')'`, emitting `op` only once the whole construct has
    /// matched. The inner rule's own emissions stay; they are this
    /// operation's operands.
    fn delimited(&mut self, prefix: &[u8], inner: fn(&mut Self) -> bool, op: Op) -> bool {
        let (pos, mark) = self.save();
        if self.eat_str(prefix) && inner(self) && self.eat(b')') {
            trace!(op = op.name(), "emit tag");
            self.out.push_tag(op);
            return true;
        }
        self.restore(pos, mark);
        false
    }

    fn size(&mut self) -> bool {
        let (pos, mark) = self.save();
        if self.number() && self.eat(b'x') && self.number() {
            return true;
        }
        self.restore(pos, mark);
        false
    }

    fn number(&mut self) -> bool {
        let mut value: u32 = 0;
        let mut any = false;
        while let Some(c @ b'0'..=b'9') = self.peek() {
            let digit = u32::from(c - b'0');
            match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
                Some(v) => value = v,
                None => {
                    self.diag
                        .get_or_insert_with(|| "numeric literal overflows".to_string());
                    return false;
                }
            }
            self.pos += 1;
            any = true;
        }
        if !any {
            return false;
        }
        trace!(value, "emit int");
        self.out.push_int(value);
        true
    }

    fn image_ref(&mut self) -> bool {
        let Some(c @ b'0'..=b'9') = self.peek() else {
            return false;
        };
        let index = u32::from(c - b'0');
        if index as usize >= self.image_count {
            self.diag.get_or_insert_with(|| {
                format!(
                    "image index {index} out of range (have {} image{})",
                    self.image_count,
                    if self.image_count == 1 { "" } else { "s" }
                )
            });
            return false;
        }
        self.pos += 1;
        trace!(index, "emit image ref");
        self.out.push_int(index);
        self.out.push_tag(Op::ImageRef);
        true
    }
}
