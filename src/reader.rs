//! A bounds-checked big-endian cursor over an in-memory MPLS buffer.
//!
//! The format is offset driven: blocks are located through absolute offsets
//! stored in the header, and records are resynchronized through their declared
//! lengths. [`ByteReader`] therefore exposes an explicit, movable position on
//! top of the usual sequential reads. Every read and every move is checked
//! against the end of the buffer.
//!
//! [`ByteReader`]: struct.ByteReader.html
use crate::types::TimeStamp;
use crate::MplsError;
use nom::{
    bytes::complete::take,
    error::ErrorKind,
    number::complete::{be_u16, be_u32, be_u8},
    IResult,
};

type Parsed<'a, O> = IResult<&'a [u8], O, (&'a [u8], ErrorKind)>;

#[derive(Debug, Copy, Clone)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        ByteReader { bytes, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor to an absolute offset.
    ///
    /// Seeking to exactly the end of the buffer is allowed; any read from
    /// there fails with [`MplsError::ShortRead`].
    ///
    /// [`MplsError::ShortRead`]: ../enum.MplsError.html#variant.ShortRead
    pub fn seek(&mut self, offset: usize) -> Result<(), MplsError> {
        if offset > self.bytes.len() {
            return Err(MplsError::OutOfBounds {
                offset,
                size: self.bytes.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<(), MplsError> {
        let offset = self.pos.checked_add(n).ok_or(MplsError::OutOfBounds {
            offset: usize::MAX,
            size: self.bytes.len(),
        })?;
        self.seek(offset)
    }

    pub fn read_u8(&mut self) -> Result<u8, MplsError> {
        self.run(1, be_u8)
    }

    pub fn read_u16_be(&mut self) -> Result<u16, MplsError> {
        self.run(2, be_u16)
    }

    pub fn read_u32_be(&mut self) -> Result<u32, MplsError> {
        self.run(4, be_u32)
    }

    /// Reads a 45 kHz timecode field, clearing the overloaded top bit.
    pub fn read_time_stamp(&mut self) -> Result<TimeStamp, MplsError> {
        self.read_u32_be().map(TimeStamp::from_raw)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], MplsError> {
        self.run(n, take(n))
    }

    /// Reads `n` raw bytes as text. Bytes that are not valid UTF-8 are
    /// replaced rather than rejected, since clip names are plain ASCII in
    /// practice and are only ever displayed.
    pub fn read_fixed_text(&mut self, n: usize) -> Result<String, MplsError> {
        self.read_bytes(n)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Reads a big-endian `u16` at an absolute offset without moving the cursor.
    pub fn u16_at(&self, offset: usize) -> Result<u16, MplsError> {
        let mut r = *self;
        r.seek(offset)?;
        r.read_u16_be()
    }

    /// Reads a big-endian `u32` at an absolute offset without moving the cursor.
    pub fn u32_at(&self, offset: usize) -> Result<u32, MplsError> {
        let mut r = *self;
        r.seek(offset)?;
        r.read_u32_be()
    }

    fn run<O>(
        &mut self,
        width: usize,
        parser: impl Fn(&'a [u8]) -> Parsed<'a, O>,
    ) -> Result<O, MplsError> {
        let input = &self.bytes[self.pos..];
        match parser(input) {
            Ok((rest, value)) => {
                self.pos = self.bytes.len() - rest.len();
                Ok(value)
            }
            Err(_) => Err(MplsError::ShortRead {
                offset: self.pos,
                expected: width,
                found: input.len(),
            }),
        }
    }
}
