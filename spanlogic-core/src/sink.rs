use crate::errors::SinkError;

///
/// Downstream collaborator receiving one row per aggregated result, values already in
/// the column order the caller asked for.
///
pub trait RowSink {
    fn add_row(&mut self, row: Vec<String>) -> Result<(), SinkError>;

    /// Flush buffered rows. Called once after the last row.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl RowSink for Vec<Vec<String>> {
    fn add_row(&mut self, row: Vec<String>) -> Result<(), SinkError> {
        self.push(row);
        Ok(())
    }
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn add_row(&mut self, row: Vec<String>) -> Result<(), SinkError> {
        (**self).add_row(row)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}
