use crate::codec_options::CodecOptions;
use crate::decode::{check_document_frame, decode_element};
use crate::error::Result;
use crate::types::SIZE_PREFIX_LEN;
use crate::value::BsonValue;
use smol_str::SmolStr;
use std::iter::FusedIterator;

// ─── Element Scanner ────────────────────────────────────────────────────────

/// Lazy walk over the top-level elements of one document.
///
/// Each `next` decodes exactly one element. The scanner owns its cursor, so
/// every call to [`scan`] starts again from the first element. After an
/// error it yields nothing more.
#[derive(Debug, Clone)]
pub struct ElementScanner<'a> {
    buf: &'a [u8],
    pos: usize,
    /// Offset of the terminator byte.
    end: usize,
    opts: CodecOptions,
    failed: bool,
}

/// Check the document frame, then return a scanner positioned at the first
/// element.
///
/// The declared size may be smaller than `buf`; bytes past it are ignored.
pub fn scan<'a>(buf: &'a [u8], opts: &CodecOptions) -> Result<ElementScanner<'a>> {
    let size = check_document_frame(buf, false)?;
    Ok(ElementScanner {
        buf,
        pos: SIZE_PREFIX_LEN,
        end: size - 1,
        opts: *opts,
        failed: false,
    })
}

impl<'a> ElementScanner<'a> {
    /// Offset of the next element to decode.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for ElementScanner<'a> {
    type Item = Result<(SmolStr, BsonValue)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.end {
            return None;
        }
        match decode_element(self.buf, self.pos, self.end, &self.opts) {
            Ok((name, value, next)) => {
                self.pos = next;
                Some(Ok((name, value)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl<'a> FusedIterator for ElementScanner<'a> {}
