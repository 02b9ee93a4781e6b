//! Data-row windows such as `92-187`.

use std::ops::Range;

use tracing::warn;

/// A 1-based, inclusive range of data rows (the header is not counted).
///
/// Parses from `START-END`, `START` (a single row) or `START-` (to the end).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub start: usize,
    /// `None` reads to the end of the table.
    pub end: Option<usize>,
}

impl RowWindow {
    /// Zero-based index range into a table of `len` records.
    ///
    /// A window reaching past the table end is clamped. A start of 0 reads
    /// from the first row.
    pub fn bounds(&self, len: usize, label: &str) -> Range<usize> {
        let start = self.start.saturating_sub(1).min(len);
        let end = match self.end {
            Some(end) if end > len => {
                warn!(source = label, window = %self, rows = len, "row window extends past the table end");
                len
            }
            Some(end) => end,
            None => len,
        };
        start..end.max(start)
    }
}

impl std::fmt::Display for RowWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.end {
            Some(end) if end == self.start => write!(f, "{}", self.start),
            Some(end) => write!(f, "{}-{end}", self.start),
            None => write!(f, "{}-", self.start),
        }
    }
}

impl std::str::FromStr for RowWindow {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parse = |part: &str| -> std::result::Result<usize, String> {
            let n: usize = part
                .trim()
                .parse()
                .map_err(|_| format!("invalid row number '{}' in window '{s}'", part.trim()))?;
            if n == 0 {
                return Err(format!("row numbers start at 1 (window '{s}')"));
            }
            Ok(n)
        };

        let (start, end) = match s.split_once('-') {
            Some((start, end)) if end.trim().is_empty() => (parse(start)?, None),
            Some((start, end)) => (parse(start)?, Some(parse(end)?)),
            None => {
                let row = parse(s)?;
                (row, Some(row))
            }
        };

        if let Some(end) = end {
            if end < start {
                return Err(format!("row window '{s}' ends before it starts"));
            }
        }

        Ok(Self { start, end })
    }
}
