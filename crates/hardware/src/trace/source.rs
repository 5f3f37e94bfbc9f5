//! Trace sources.
//!
//! A trace is a finite, non-restartable sequence of records. Sources return
//! `Ok(None)` at a clean end of stream and `Err` for a malformed record, so the
//! two conditions are never confused.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use crate::common::error::TraceError;
use crate::trace::record::{InstructionRecord, RECORD_SIZE};

/// A producer of instruction records, consumed one record per fetch.
pub trait TraceSource {
    /// Returns the next record.
    ///
    /// # Returns
    ///
    /// `Ok(Some(record))` for a well-formed record, `Ok(None)` once the
    /// stream is exhausted.
    ///
    /// # Errors
    ///
    /// Returns a [`TraceError`] for I/O failures and malformed records.
    fn next_record(&mut self) -> Result<Option<InstructionRecord>, TraceError>;
}

impl<T: TraceSource + ?Sized> TraceSource for Box<T> {
    fn next_record(&mut self) -> Result<Option<InstructionRecord>, TraceError> {
        (**self).next_record()
    }
}

/// Reads fixed-size binary records from any byte stream.
#[derive(Debug)]
pub struct TraceReader<R> {
    inner: R,
    records_read: u64,
}

impl TraceReader<BufReader<File>> {
    /// Opens a trace file for buffered reading.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Io`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> TraceReader<R> {
    /// Wraps a byte stream positioned at the first record.
    pub const fn new(inner: R) -> Self {
        Self {
            inner,
            records_read: 0,
        }
    }

    /// Number of well-formed records returned so far.
    pub const fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Fills `buf` as far as the stream allows and returns the byte count.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> TraceSource for TraceReader<R> {
    fn next_record(&mut self) -> Result<Option<InstructionRecord>, TraceError> {
        let mut buf = [0u8; RECORD_SIZE];
        let got = self.fill(&mut buf)?;
        if got == 0 {
            return Ok(None);
        }
        if got < RECORD_SIZE {
            return Err(TraceError::Truncated {
                expected: RECORD_SIZE,
                actual: got,
            });
        }
        let record = InstructionRecord::decode(&buf)?;
        self.records_read += 1;
        Ok(Some(record))
    }
}

/// An in-memory trace, drained front to back.
#[derive(Debug, Clone, Default)]
pub struct MemoryTrace {
    records: VecDeque<InstructionRecord>,
}

impl MemoryTrace {
    /// Creates a trace that yields `records` in order.
    pub fn new(records: impl IntoIterator<Item = InstructionRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Number of records not yet consumed.
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl FromIterator<InstructionRecord> for MemoryTrace {
    fn from_iter<I: IntoIterator<Item = InstructionRecord>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl TraceSource for MemoryTrace {
    fn next_record(&mut self) -> Result<Option<InstructionRecord>, TraceError> {
        Ok(self.records.pop_front())
    }
}

/// Writes records in the binary layout read by [`TraceReader`].
#[derive(Debug)]
pub struct TraceWriter<W: Write> {
    inner: W,
    records_written: u64,
}

impl TraceWriter<BufWriter<File>> {
    /// Creates (or truncates) a trace file.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Io`] if the file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> TraceWriter<W> {
    /// Wraps a byte sink.
    pub const fn new(inner: W) -> Self {
        Self {
            inner,
            records_written: 0,
        }
    }

    /// Appends one record.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Io`] if the sink rejects the write.
    pub fn write_record(&mut self, record: &InstructionRecord) -> Result<(), TraceError> {
        self.inner.write_all(&record.encode())?;
        self.records_written += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub const fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flushes the sink and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Io`] if the flush fails.
    pub fn finish(mut self) -> Result<W, TraceError> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
