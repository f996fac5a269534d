//! Recursive interpreter over a frozen [`Program`].
//!
//! The program is consumed strictly from its end: each call to `eval_sub`
//! reads one tag, its trailing operands, and (recursively) the sub-expression
//! it transforms. Which words belong to which operation is decided solely by
//! the tag just read, never by a stored length.

use image::RgbaImage;
use tracing::debug;

use crate::{
    error::{ImfxError, ImfxResult},
    ops,
    program::{Cursor, Op, Program},
};

/// Evaluates a compiled program against an ordered image set, producing the
/// final composited image.
///
/// Evaluation is a pure function of the program and the image set: identical
/// inputs yield byte-identical output.
#[tracing::instrument(skip_all, fields(words = program.len(), images = images.len()))]
pub fn evaluate(program: &Program, images: &[RgbaImage]) -> ImfxResult<RgbaImage> {
    let mut cursor = program.cursor();
    let result = eval_sub(&mut cursor, images)?;
    // A chain step can be a bare image reference, which abandons everything
    // written before it; those words are dead, not malformed.
    if cursor.remaining() != 0 {
        debug!(unread = cursor.remaining(), "discarding dead prefix words");
    }
    Ok(result)
}

fn eval_sub(cursor: &mut Cursor<'_>, images: &[RgbaImage]) -> ImfxResult<RgbaImage> {
    match cursor.pop_tag()? {
        Op::ImageRef => {
            let index = cursor.pop_int()? as usize;
            // Parsing bounds-checks indices, so this only fires on a
            // malformed program.
            let img = images.get(index).ok_or_else(|| {
                ImfxError::evaluation(format!("image index {index} out of range"))
            })?;
            Ok(img.clone())
        }
        op @ (Op::Fit | Op::Fill) => {
            let height = cursor.pop_int()?;
            let width = cursor.pop_int()?;
            let current = eval_sub(cursor, images)?;
            let rw = f64::from(width) / f64::from(current.width());
            let rh = f64::from(height) / f64::from(current.height());
            let factor = match op {
                Op::Fit => rw.min(rh).min(1.0),
                _ => rw.max(rh),
            };
            Ok(ops::resize_scale(&current, factor))
        }
        Op::Blur => {
            let strength = cursor.pop_int()?;
            let current = eval_sub(cursor, images)?;
            Ok(ops::gaussian_blur(&current, strength as f32 / 100.0))
        }
        Op::Overlay => {
            let overlay = eval_sub(cursor, images)?;
            let base = eval_sub(cursor, images)?;
            Ok(ops::overlay_centered(base, &overlay))
        }
    }
}
