use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::LogError;
use crate::scoring::Outcome;
use crate::sequence::Mode;

pub const HEADER: [&str; 5] = [
    "Time",
    "Mode",
    "Number of Digits",
    "Is Typing",
    "Correctness",
];

/// One row of the event log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub time_ms: i64,
    pub mode: Mode,
    /// length of the most recently generated sequence, 0 before the first round
    pub length: usize,
    /// false while characters are being revealed, true otherwise
    pub is_typing: bool,
    /// empty for heartbeat rows
    pub outcome: Option<Outcome>,
}

impl LogRecord {
    fn to_fields(&self) -> [String; 5] {
        [
            self.time_ms.to_string(),
            self.mode.to_string(),
            self.length.to_string(),
            if self.is_typing { "1" } else { "0" }.to_string(),
            self.outcome.map(|o| o.to_string()).unwrap_or_default(),
        ]
    }

    fn from_fields(record: &csv::StringRecord) -> Result<Self, LogError> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let malformed = |reason: String| LogError::Malformed { line, reason };

        if record.len() != HEADER.len() {
            return Err(malformed(format!(
                "expected {} fields, found {}",
                HEADER.len(),
                record.len()
            )));
        }

        let time_ms = record[0]
            .parse::<i64>()
            .map_err(|e| malformed(format!("bad time {:?}: {e}", &record[0])))?;
        let mode = Mode::from_label(&record[1])
            .ok_or_else(|| malformed(format!("unknown mode {:?}", &record[1])))?;
        let length = record[2]
            .parse::<usize>()
            .map_err(|e| malformed(format!("bad length {:?}: {e}", &record[2])))?;
        let is_typing = match &record[3] {
            "0" => false,
            "1" => true,
            other => return Err(malformed(format!("bad typing flag {other:?}"))),
        };
        let outcome = match &record[4] {
            "" => None,
            "Correct" => Some(Outcome::Correct),
            "Incorrect" => Some(Outcome::Incorrect),
            other => return Err(malformed(format!("bad correctness {other:?}"))),
        };

        Ok(Self {
            time_ms,
            mode,
            length,
            is_typing,
            outcome,
        })
    }
}

/// Append-only destination for log records
pub trait EventSink {
    /// Append one record. The record is durable once this returns Ok.
    fn append(&mut self, record: &LogRecord) -> Result<(), LogError>;

    /// Flush and release the underlying handle. Appends after close fail.
    fn close(&mut self) -> Result<(), LogError>;
}

/// Csv event log that flushes after every row.
///
/// The header is written as soon as the log is created. Dropping the log
/// flushes whatever is still buffered.
pub struct CsvEventLog<W: Write> {
    writer: Option<csv::Writer<W>>,
}

impl CsvEventLog<File> {
    /// Create (truncating) the log file at `path` and write the header row
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, LogError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| LogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_writer(file)
    }
}

impl<W: Write> CsvEventLog<W> {
    pub fn from_writer(inner: W) -> Result<Self, LogError> {
        let mut writer = csv::WriterBuilder::new().from_writer(inner);
        writer.write_record(HEADER)?;
        writer.flush()?;
        Ok(Self {
            writer: Some(writer),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}

impl<W: Write> EventSink for CsvEventLog<W> {
    fn append(&mut self, record: &LogRecord) -> Result<(), LogError> {
        let writer = self.writer.as_mut().ok_or(LogError::Closed)?;
        writer.write_record(record.to_fields())?;
        writer.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), LogError> {
        match self.writer.take() {
            Some(mut writer) => Ok(writer.flush()?),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for CsvEventLog<W> {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

/// Parse a previously written event log, header included.
///
/// The app itself never reads its log back; this serves the tests and offline tooling.
pub fn read_log<R: Read>(reader: R) -> Result<Vec<LogRecord>, LogError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.iter().ne(HEADER.iter().copied()) {
        return Err(LogError::Malformed {
            line: 1,
            reason: format!("unexpected header {:?}", headers.iter().collect::<Vec<_>>()),
        });
    }

    reader
        .records()
        .map(|record| LogRecord::from_fields(&record?))
        .collect()
}
