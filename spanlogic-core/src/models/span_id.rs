use std::fmt::{self, Display};
use std::str::FromStr;

///
/// A synthetic span identifier of the form `sequence:start-end:strand`.
///
/// The third field is optional; `r` marks the reverse strand, anything else is forward.
///
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SpanId {
    pub sequence_id: String,
    pub start: i64,
    pub end: i64,
    pub reversed: bool,
}

impl FromStr for SpanId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split(':');

        let sequence_id = fields
            .next()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| format!("missing sequence in span id {}", s))?;
        let range = fields
            .next()
            .ok_or_else(|| format!("missing range in span id {}", s))?;
        let reversed = fields.next() == Some("r");

        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| format!("range is not start-end in span id {}", s))?;
        let start = start
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("invalid start in span id {}", s))?;
        let end = end
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("invalid end in span id {}", s))?;

        Ok(SpanId {
            sequence_id: sequence_id.to_string(),
            start,
            end,
            reversed,
        })
    }
}

impl Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.sequence_id,
            self.start,
            self.end,
            if self.reversed { 'r' } else { 'f' }
        )
    }
}
