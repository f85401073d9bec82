//! Whitespace tokenizer with typed field extraction.
//!
//! Tokens are assembled straight from the reader's buffer, so only the
//! current token is held in memory regardless of line length. Separators are
//! ASCII whitespace only.

use std::io::BufRead;

use crate::error::{JacobianIoError, ParseStage, Result};

/// A numeric value that can appear as a single token.
pub trait FieldValue: Sized {
    /// Parses `token`, `None` if it is not an admissible value.
    fn parse_field(token: &str) -> Option<Self>;
}

macro_rules! integer_field {
    ($($t:ty),*) => {
        $(
            impl FieldValue for $t {
                fn parse_field(token: &str) -> Option<Self> {
                    token.parse().ok()
                }
            }
        )*
    };
}

integer_field!(usize, i64, i32);

impl FieldValue for f64 {
    /// Decimal or scientific notation only; `nan`, `inf` and overflowing
    /// literals are rejected.
    fn parse_field(token: &str) -> Option<Self> {
        token.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Streams whitespace separated tokens from a buffered reader.
#[derive(Debug)]
pub struct TokenReader<R> {
    reader: R,
    token: Vec<u8>,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            token: Vec::new(),
        }
    }

    /// Checks that the underlying stream can be read at all.
    ///
    /// An empty stream is readable; it fails later with a format error.
    pub fn ensure_readable(&mut self) -> Result<()> {
        self.reader
            .fill_buf()
            .map(|_| ())
            .map_err(|e| JacobianIoError::io("input stream is not readable", e))
    }

    /// Returns the raw bytes of the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<&[u8]>> {
        self.token.clear();
        loop {
            let buf = self
                .reader
                .fill_buf()
                .map_err(|e| JacobianIoError::io("failed to read input stream", e))?;
            if buf.is_empty() {
                break;
            }

            let mut used = 0;
            let mut complete = false;
            for &byte in buf {
                if byte.is_ascii_whitespace() {
                    if !self.token.is_empty() {
                        complete = true;
                        break;
                    }
                } else {
                    self.token.push(byte);
                }
                used += 1;
            }
            self.reader.consume(used);
            if complete {
                break;
            }
        }

        if self.token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(&self.token))
        }
    }

    /// Parses the next token as field `index` of a stage with `expected` fields.
    pub fn field<T: FieldValue>(
        &mut self,
        stage: ParseStage,
        index: usize,
        expected: usize,
    ) -> Result<T> {
        let token = self.next_token()?;
        let format_error = |found: Option<&[u8]>| JacobianIoError::Format {
            stage,
            index,
            expected,
            found: found.map(|raw| String::from_utf8_lossy(raw).into_owned()),
        };
        match token {
            Some(raw) => std::str::from_utf8(raw)
                .ok()
                .and_then(T::parse_field)
                .ok_or_else(|| format_error(Some(raw))),
            None => Err(format_error(None)),
        }
    }

    /// Reads exactly `count` fields of one stage.
    pub fn fields<T: FieldValue>(&mut self, stage: ParseStage, count: usize) -> Result<Vec<T>> {
        let mut out = Vec::with_capacity(count.min(1 << 20));
        for index in 0..count {
            out.push(self.field(stage, index, count)?);
        }
        Ok(out)
    }

    /// Fails if any token remains.
    pub fn expect_end(&mut self) -> Result<()> {
        match self.next_token()? {
            None => Ok(()),
            Some(extra) => Err(JacobianIoError::Format {
                stage: ParseStage::Trailing,
                index: 0,
                expected: 0,
                found: Some(String::from_utf8_lossy(extra).into_owned()),
            }),
        }
    }
}
