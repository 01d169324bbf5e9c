// src/crawl/sink.rs
// =============================================================================
// Where discovered links end up.
//
// The engine only needs two things from an output: append one link, and
// flush after a batch. The Sink trait captures that, and CsvSink is the
// real implementation that writes a single-column CSV file.
// =============================================================================

use std::fs::File;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

use super::link::{Domain, NormalizedLink};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create result file {path}: {source}")]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write record: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to flush records: {0}")]
    Flush(#[from] std::io::Error),
}

/// Append-only record writer fed by the crawl engine.
pub trait Sink: Send {
    fn write_link(&mut self, link: &NormalizedLink) -> Result<(), SinkError>;

    fn flush(&mut self) -> Result<(), SinkError>;
}

pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    // Creates (or truncates) the result file
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path).map_err(|source| SinkError::Create {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(inner: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        Self { writer }
    }
}

impl<W: Write + Send> Sink for CsvSink<W> {
    fn write_link(&mut self, link: &NormalizedLink) -> Result<(), SinkError> {
        self.writer.write_record([link.as_str()])?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

// "127.0.0.1:8080" -> "127.0.0.1:8080_result.csv"
pub fn result_file_name(domain: &Domain) -> String {
    format!("{}_result.csv", domain.as_str().replace('/', "_"))
}
