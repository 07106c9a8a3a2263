use std::io::{BufWriter, Write};

use serde_json::{Map, Value};

use spanlogic_core::{RowSink, SinkError};

fn check_width(expected: usize, row: &[String]) -> Result<(), SinkError> {
    if row.len() != expected {
        return Err(SinkError::RowWidth {
            expected,
            got: row.len(),
        });
    }
    Ok(())
}

///
/// Writes rows as tab-separated lines, preceded by a header line of column names.
///
pub struct TsvSink<W: Write> {
    writer: BufWriter<W>,
    columns: Vec<String>,
    header_written: bool,
}

impl<W: Write> TsvSink<W> {
    pub fn new(writer: W, columns: Vec<String>) -> Self {
        TsvSink {
            writer: BufWriter::new(writer),
            columns,
            header_written: false,
        }
    }

    fn write_header(&mut self) -> Result<(), SinkError> {
        if !self.header_written {
            writeln!(self.writer, "{}", self.columns.join("\t"))?;
            self.header_written = true;
        }
        Ok(())
    }
}

impl<W: Write> RowSink for TsvSink<W> {
    fn add_row(&mut self, row: Vec<String>) -> Result<(), SinkError> {
        check_width(self.columns.len(), &row)?;
        self.write_header()?;
        writeln!(self.writer, "{}", row.join("\t"))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        // an empty result still gets its header
        self.write_header()?;
        self.writer.flush()?;
        Ok(())
    }
}

///
/// Writes each row as one JSON object keyed by column name.
///
pub struct JsonLinesSink<W: Write> {
    writer: BufWriter<W>,
    columns: Vec<String>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W, columns: Vec<String>) -> Self {
        JsonLinesSink {
            writer: BufWriter::new(writer),
            columns,
        }
    }
}

impl<W: Write> RowSink for JsonLinesSink<W> {
    fn add_row(&mut self, row: Vec<String>) -> Result<(), SinkError> {
        check_width(self.columns.len(), &row)?;
        let object: Map<String, Value> = self
            .columns
            .iter()
            .cloned()
            .zip(row.into_iter().map(Value::String))
            .collect();
        serde_json::to_writer(&mut self.writer, &object)
            .map_err(|err| SinkError::Serialize(err.to_string()))?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}
