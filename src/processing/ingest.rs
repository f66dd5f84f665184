//! Site table ingestion.
//!
//! The table arrives as raw bytes in one of three layouts: comma separated,
//! tab separated, or columns aligned with runs of spaces. The layout is
//! picked from the header line by trying [`SplitStrategy::PRIORITY`] in
//! order.

use crate::error::{GenError, Result};
use crate::models::{Diagnostic, Record};
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// A delimiter must appear more than this many times in the header line.
const MIN_DELIMITER_COUNT: usize = 5;
/// Characters of a skipped row quoted in its diagnostic.
const ROW_PREFIX_LEN: usize = 30;

lazy_static! {
    static ref ALIGNED_BOUNDARY: Regex = Regex::new(r" {2,}|\t+").expect("Invalid Regex?");
}

/// How a table line is cut into fields.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitStrategy {
    Comma,
    Tab,
    /// Boundaries are runs of two or more spaces, or runs of tabs.
    Aligned,
}

impl SplitStrategy {
    pub const PRIORITY: [SplitStrategy; 3] =
        [SplitStrategy::Comma, SplitStrategy::Tab, SplitStrategy::Aligned];

    /// Does the header line look like this layout?
    pub fn detect(&self, header: &str) -> bool {
        match self {
            SplitStrategy::Comma => header.matches(',').count() > MIN_DELIMITER_COUNT,
            SplitStrategy::Tab => header.matches('\t').count() > MIN_DELIMITER_COUNT,
            SplitStrategy::Aligned => true,
        }
    }

    /// First strategy in priority order that accepts `header`.
    pub fn for_header(header: &str) -> SplitStrategy {
        SplitStrategy::PRIORITY
            .into_iter()
            .find(|s| s.detect(header))
            .unwrap_or(SplitStrategy::Aligned)
    }

    /// Split one line into untrimmed fields.
    pub fn split(&self, line: &str) -> Vec<String> {
        match self {
            SplitStrategy::Comma => split_delimited(line, b','),
            SplitStrategy::Tab => split_delimited(line, b'\t'),
            SplitStrategy::Aligned => ALIGNED_BOUNDARY
                .split(line.trim())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Split with the csv reader so quoted fields may contain the delimiter.
fn split_delimited(line: &str, delimiter: u8) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(line.as_bytes());
    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(str::to_string).collect(),
        Some(Err(e)) => {
            log::debug!("csv split failed ({e}), falling back to plain split");
            line.split(delimiter as char).map(str::to_string).collect()
        }
        None => vec![String::new()],
    }
}

/// Result of ingesting one table.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Ingested {
    pub strategy: SplitStrategy,
    pub columns: Vec<String>,
    pub records: Vec<Record>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse raw table bytes into ordered records.
///
/// Rows whose field count differs from the header are skipped and reported
/// as [`Diagnostic::RowSkipped`].
pub fn ingest(bytes: &[u8]) -> Result<Ingested> {
    log::info!("#Start ingest() {} bytes", bytes.len());
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_start_matches('\u{feff}');

    let mut lines = text
        .split('\n')
        .map(|l| l.trim_end_matches('\r'))
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty());

    let (header_line, header) = lines.next().ok_or(GenError::EmptyTable)?;
    let strategy = SplitStrategy::for_header(header);
    let columns: Vec<String> = strategy
        .split(header)
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if columns.is_empty() {
        return Err(GenError::EmptyTable);
    }
    log::debug!(
        "header line {header_line}: strategy={:?} columns=[{}]",
        strategy,
        columns.iter().join(", ")
    );

    let mut records = Vec::new();
    let mut diagnostics = Vec::new();
    for (line_no, line) in lines {
        let fields = strategy.split(line);
        if fields.len() != columns.len() {
            let diagnostic = Diagnostic::RowSkipped {
                line: line_no,
                prefix: line.trim().chars().take(ROW_PREFIX_LEN).collect(),
                expected: columns.len(),
                actual: fields.len(),
            };
            log::warn!("{diagnostic}");
            diagnostics.push(diagnostic);
            continue;
        }
        let fields = columns
            .iter()
            .cloned()
            .zip(fields.into_iter().map(|f| f.trim().to_string()))
            .collect();
        records.push(Record::new(line_no, fields));
    }

    log::info!(
        "# ingest() records={} skipped={}",
        records.len(),
        diagnostics.len()
    );
    Ok(Ingested {
        strategy,
        columns,
        records,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMA_TABLE: &str = "StoreName,Tnip1,Tnip2,VLAN3100,VLAN3137,VRF_Branch_IP,VRF_Branch_Mask\n\
        Store One,10.255.0.1,10.255.1.1,10.0.0.1,10.0.0.17,10.0.0.0,255.255.255.0\n";

    #[test]
    fn test_empty_table() {
        assert!(matches!(ingest(b""), Err(GenError::EmptyTable)));
        assert!(matches!(ingest(b"  \n\r\n"), Err(GenError::EmptyTable)));
        assert!(matches!(ingest("\u{feff}".as_bytes()), Err(GenError::EmptyTable)));
    }

    #[test]
    fn test_detect_strategy() {
        assert_eq!(SplitStrategy::for_header("a,b,c,d,e,f,g"), SplitStrategy::Comma);
        assert_eq!(SplitStrategy::for_header("a,b,c,d,e,f"), SplitStrategy::Aligned);
        assert_eq!(SplitStrategy::for_header("a\tb\tc\td\te\tf\tg"), SplitStrategy::Tab);
        assert_eq!(SplitStrategy::for_header("a  b   c"), SplitStrategy::Aligned);
    }

    #[test]
    fn test_comma_table() {
        let ingested = ingest(COMMA_TABLE.as_bytes()).unwrap();
        assert_eq!(ingested.strategy, SplitStrategy::Comma);
        assert_eq!(ingested.columns.len(), 7);
        assert_eq!(ingested.records.len(), 1);
        let r = &ingested.records[0];
        assert_eq!(r.line, 2);
        assert_eq!(r.get("StoreName"), Some("Store One"));
        assert_eq!(r.get("VRF_Branch_Mask"), Some("255.255.255.0"));
        assert!(ingested.diagnostics.is_empty());
    }

    #[test]
    fn test_short_row_is_skipped() {
        let table = "Store,a,b,c,d,e,f,g\n\
            S1,1,2,3,4,5,6,7\n\
            S2,1,2,3,4,5\n\
            S3,1,2,3,4,5,6,7\n";
        let ingested = ingest(table.as_bytes()).unwrap();
        assert_eq!(ingested.records.len(), 2);
        assert_eq!(ingested.records[1].get("Store"), Some("S3"));
        assert_eq!(
            ingested.diagnostics,
            vec![Diagnostic::RowSkipped {
                line: 3,
                prefix: "S2,1,2,3,4,5".to_string(),
                expected: 8,
                actual: 6,
            }]
        );
    }

    #[test]
    fn test_quoted_comma() {
        let table = "Store,a,b,c,d,e,f\n\"Mall, East\",1,2,3,4,5,6\n";
        let ingested = ingest(table.as_bytes()).unwrap();
        assert_eq!(ingested.records[0].get("Store"), Some("Mall, East"));
    }

    #[test]
    fn test_tab_table_with_crlf() {
        let table = "Store\tA\tB\tC\tD\tE\tF\r\n S1 \t1\t2\t3\t4\t5\t6\r\n";
        let ingested = ingest(table.as_bytes()).unwrap();
        assert_eq!(ingested.strategy, SplitStrategy::Tab);
        assert_eq!(ingested.records[0].get("Store"), Some("S1"));
        assert_eq!(ingested.records[0].get("F"), Some("6"));
    }

    #[test]
    fn test_aligned_table() {
        let table = "StoreName       Tnip1         VLAN3100\n\
            \n\
            Store One       10.255.0.1    10.0.0.1\n\
            Store Two\t10.255.0.5\t\t10.0.0.33\n";
        let ingested = ingest(table.as_bytes()).unwrap();
        assert_eq!(ingested.strategy, SplitStrategy::Aligned);
        assert_eq!(ingested.columns, vec!["StoreName", "Tnip1", "VLAN3100"]);
        assert_eq!(ingested.records.len(), 2);
        assert_eq!(ingested.records[0].get("StoreName"), Some("Store One"));
        assert_eq!(ingested.records[1].get("VLAN3100"), Some("10.0.0.33"));
        assert_eq!(ingested.records[1].line, 4);
    }

    #[test]
    fn test_header_drops_empty_fragments() {
        let table = "Store,a,b,c,d,e,\nS1,1,2,3,4,5\n";
        let ingested = ingest(table.as_bytes()).unwrap();
        assert_eq!(ingested.columns.len(), 6);
        assert_eq!(ingested.records.len(), 1);
    }

    #[test]
    fn test_ingest_is_deterministic() {
        let a = ingest(COMMA_TABLE.as_bytes()).unwrap();
        let b = ingest(COMMA_TABLE.as_bytes()).unwrap();
        assert_eq!(a, b);
    }
}
