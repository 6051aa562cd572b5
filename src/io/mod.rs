//! Pull/push capabilities the virtual machine reads from and writes to,
//! plus adapters for the usual suspects (iterators, text, byte streams).

use std::io::{self, Bytes, Read, Write};
use std::str::Chars;

use crate::cell::Cell;

/// Something the machine can pull cells from, `Ok(None)` once exhausted
pub trait Input<C: Cell> {
    fn pull(&mut self) -> io::Result<Option<C>>;
}

/// Something the machine can push cells into
pub trait Output<C: Cell> {
    fn push(&mut self, value: C) -> io::Result<()>;
}

pub struct IterInput<I> {
    iter: I,
}

impl<C: Cell, I: Iterator<Item = C>> Input<C> for IterInput<I> {
    fn pull(&mut self) -> io::Result<Option<C>> {
        Ok(self.iter.next())
    }
}

/// Feed cells straight from any iterator (a `Vec`, a slice, a range...)
pub fn from_iter<C: Cell, I: IntoIterator<Item = C>>(iter: I) -> IterInput<I::IntoIter> {
    IterInput {
        iter: iter.into_iter(),
    }
}

/// Reads characters, narrowing each code point to the cell width
pub struct TextInput<'a> {
    chars: Chars<'a>,
}

impl<'a, C: Cell> Input<C> for TextInput<'a> {
    fn pull(&mut self) -> io::Result<Option<C>> {
        Ok(self.chars.next().map(|c| C::from_code(c as u32)))
    }
}

pub fn from_str(text: &str) -> TextInput<'_> {
    TextInput { chars: text.chars() }
}

/// Reads a byte at a time from a reader
pub struct ReaderInput<R> {
    bytes: Bytes<R>,
}

impl<C: Cell, R: Read> Input<C> for ReaderInput<R> {
    fn pull(&mut self) -> io::Result<Option<C>> {
        let byte = self.bytes.next().transpose()?;
        Ok(byte.map(C::from_byte))
    }
}

pub fn from_reader<R: Read>(reader: R) -> ReaderInput<R> {
    ReaderInput {
        bytes: reader.bytes(),
    }
}

impl<C: Cell> Output<C> for Vec<C> {
    fn push(&mut self, value: C) -> io::Result<()> {
        Vec::push(self, value);
        Ok(())
    }
}

impl<C: Cell> Output<C> for String {
    fn push(&mut self, value: C) -> io::Result<()> {
        String::push(self, value.to_char());
        Ok(())
    }
}

/// Writes each cell as a single (truncated) byte
pub struct WriterOutput<W> {
    writer: W,
}

impl<W: Write> WriterOutput<W> {
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<C: Cell, W: Write> Output<C> for WriterOutput<W> {
    fn push(&mut self, value: C) -> io::Result<()> {
        self.writer.write_all(&[value.to_byte()])
    }
}

pub fn to_writer<W: Write>(writer: W) -> WriterOutput<W> {
    WriterOutput { writer }
}
