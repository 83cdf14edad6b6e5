//! Bit-level input and output
//!
//! Thin wrappers over `bitstream-io`'s big-endian reader and writer. Values are
//! read and written most-significant bit first, so a code written as `0b101`
//! with width 3 appears in the stream as the bits 1, 0, 1.

use std::io::{self, Read, Seek, SeekFrom, Write};

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

/// A sequential source of N-bit unsigned values.
pub trait BitSource {
    /// Read `bits` bits (at most 32). Returns `Ok(None)` once the source is
    /// exhausted.
    fn read_bits(&mut self, bits: u32) -> io::Result<Option<u32>>;

    fn read_bit(&mut self) -> io::Result<Option<bool>> {
        Ok(self.read_bits(1)?.map(|b| b == 1))
    }
}

/// A sequential sink of N-bit unsigned values.
pub trait BitSink {
    /// Append the low `bits` bits of `value` (at most 32).
    fn write_bits(&mut self, bits: u32, value: u32) -> io::Result<()>;

    fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.write_bits(1, bit as u32)
    }
}

/// Bit reader over any byte source.
pub struct BitInput<R: Read> {
    inner: BitReader<R, BigEndian>,
    bits_read: u64,
    start: u64,
}

impl<R: Read> BitInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: BitReader::endian(reader, BigEndian),
            bits_read: 0,
            start: 0,
        }
    }

    /// Bits consumed since construction or the last rewind.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Recover the underlying reader, dropping any partially consumed byte.
    pub fn into_inner(self) -> R {
        self.inner.into_reader()
    }
}

impl<R: Read + Seek> BitInput<R> {
    /// Bit reader starting at the current position of `reader`. [`rewind`]
    /// returns to this position rather than to offset zero.
    ///
    /// [`rewind`]: BitInput::rewind
    pub fn seekable(mut reader: R) -> io::Result<Self> {
        let start = reader.stream_position()?;
        let mut input = Self::new(reader);
        input.start = start;
        Ok(input)
    }

    /// Rewind to the position the reader had when this input was created.
    pub fn rewind(self) -> io::Result<Self> {
        let start = self.start;
        let mut reader = self.into_inner();
        reader.seek(SeekFrom::Start(start))?;
        let mut input = Self::new(reader);
        input.start = start;
        Ok(input)
    }
}

impl<R: Read> BitSource for BitInput<R> {
    fn read_bits(&mut self, bits: u32) -> io::Result<Option<u32>> {
        debug_assert!(bits > 0 && bits <= 32);
        match self.inner.read::<u32>(bits) {
            Ok(value) => {
                self.bits_read += u64::from(bits);
                Ok(Some(value))
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Bit writer over any byte sink, counting the bits it has been handed.
pub struct BitOutput<W: Write> {
    inner: BitWriter<W, BigEndian>,
    bits_written: u64,
}

impl<W: Write> BitOutput<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: BitWriter::endian(writer, BigEndian),
            bits_written: 0,
        }
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pad the final partial byte with zero bits, flush, and return the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.byte_align()?;
        let mut writer = self.inner.into_writer();
        writer.flush()?;
        Ok(writer)
    }
}

impl<W: Write> BitSink for BitOutput<W> {
    fn write_bits(&mut self, bits: u32, value: u32) -> io::Result<()> {
        debug_assert!(bits > 0 && bits <= 32);
        let masked = if bits == 32 { value } else { value & ((1u32 << bits) - 1) };
        self.inner.write(bits, masked)?;
        self.bits_written += u64::from(bits);
        Ok(())
    }
}
