use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::warn;

use crate::record::VcfRecord;
use crate::types::Header;

/// Number of columns before the first sample name on the `#CHROM` line.
const CHROM_LINE_FIXED_COLUMNS: usize = 9;

/// Streaming access to the records of a VCF file.
///
/// The header is consumed eagerly on construction; records are parsed one
/// per iteration step, so a partially consumed iterator reads no further
/// input. Lines that fail to parse are skipped with a warning.
pub struct VcfRecords<R: BufRead> {
    header: Header,
    line_buf: String,
    line_no: u64,
    inner: R,
}

impl VcfRecords<BufReader<Box<dyn Read>>> {
    /// Opens a plain or gzip-compressed VCF file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let (reader, _format) = niffler::from_path(path)?;
        Self::new(BufReader::new(reader))
    }
}

impl<R: BufRead> VcfRecords<R> {
    /// Reads all `#`-prefixed header lines off the front of `reader`.
    pub fn new(mut reader: R) -> anyhow::Result<Self> {
        let mut lines = Vec::new();
        let mut samples = Vec::new();
        let mut line_no = 0u64;
        loop {
            // one byte of lookahead decides whether the next line is still header
            let buf = reader.fill_buf()?;
            if buf.is_empty() || buf[0] != b'#' {
                break;
            }
            let mut line = String::new();
            reader.read_line(&mut line)?;
            line_no += 1;
            let line = line.trim_end_matches(|c| c == '\n' || c == '\r');
            if line.starts_with("#CHROM") {
                let columns: Vec<&str> = line.split('\t').collect();
                if columns.len() > CHROM_LINE_FIXED_COLUMNS {
                    samples = columns[CHROM_LINE_FIXED_COLUMNS..]
                        .iter()
                        .map(|s| s.to_string())
                        .collect();
                }
            }
            lines.push(line.to_owned());
        }
        Ok(Self {
            header: Header { lines, samples },
            line_buf: String::new(),
            line_no,
            inner: reader,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }
}

impl<R: BufRead> Iterator for VcfRecords<R> {
    type Item = VcfRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line_buf.clear();
            self.line_no += 1;
            match self.inner.read_line(&mut self.line_buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => {
                    warn!("stopping at line {}: {}", self.line_no, err);
                    return None;
                }
            }
            let line = self.line_buf.trim_end_matches(|c| c == '\n' || c == '\r');
            if line.is_empty() {
                continue;
            }
            match VcfRecord::parse(line) {
                Ok(record) => return Some(record),
                // a single bad line must not abort an otherwise valid file
                Err(err) => warn!("skipping malformed record at line {}: {}", self.line_no, err),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    const INPUT: &str = "\
##fileformat=VCFv4.2\n\
##source=exome-pipeline\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tHG001\tHG002\n\
chr1\t100\t.\tA\tC\t50\tPASS\tDP=10\tGT\t0/1\t1/1\n\
chr1\tnot-a-number\t.\tA\tC\t50\tPASS\tDP=10\tGT\t0/1\t1/1\n\
chr1\t200\t.\tG\tT\t99\tPASS\tDP=12\tGT\t0/0\t0/1\n";

    #[test]
    fn header_lines_pass_through_verbatim() {
        let records = VcfRecords::new(Cursor::new(INPUT)).unwrap();
        assert_eq!(
            records.header().lines(),
            &vec![
                "##fileformat=VCFv4.2".to_owned(),
                "##source=exome-pipeline".to_owned(),
                "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tHG001\tHG002".to_owned(),
            ]
        );
    }

    #[test]
    fn samples_from_chrom_line() {
        let records = VcfRecords::new(Cursor::new(INPUT)).unwrap();
        assert_eq!(records.header().samples(), &vec!["HG001".to_owned(), "HG002".to_owned()]);
    }

    #[test]
    fn malformed_record_is_skipped() {
        let positions: Vec<u64> = VcfRecords::new(Cursor::new(INPUT))
            .unwrap()
            .map(|record| record.pos())
            .collect();
        assert_eq!(positions, vec![100, 200]);
    }

    #[test]
    fn headerless_input() {
        let records = VcfRecords::new(Cursor::new("chr1\t100\t.\tA\tC\t50\tPASS\tDP=10\n")).unwrap();
        assert!(records.header().lines().is_empty());
        assert_eq!(records.count(), 1);
    }

    #[test]
    fn header_only_input() {
        let mut records = VcfRecords::new(Cursor::new("##fileformat=VCFv4.2\n")).unwrap();
        assert!(records.next().is_none());
    }
}
