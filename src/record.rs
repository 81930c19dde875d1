use indexmap::IndexMap;
use nom::combinator::all_consuming;

use crate::parser;
use crate::types::{Genotype, GenotypeAllele, InfoValue};

/// CHROM, POS, ID, REF, ALT, QUAL, FILTER, INFO.
pub const MIN_FIELDS: usize = 8;

const FORMAT_COLUMN: usize = 8;
const FIRST_SAMPLE_COLUMN: usize = 9;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("line has {found} tab-delimited fields, expected at least {expected}")]
    TooFewFields { expected: usize, found: usize },
    #[error("POS is not an integer: {0:?}")]
    InvalidPosition(String),
}

/// One data line of a VCF file.
///
/// Parsed once, immutable afterwards. The original line is retained so that
/// accepted records can be written back out byte for byte.
#[derive(Debug, Clone)]
pub struct VcfRecord {
    raw: String,
    chrom: String,
    pos: u64,
    id: String,
    ref_allele: String,
    alt_alleles: String,
    qual: Option<f64>,
    filters: String,
    info: IndexMap<String, InfoValue>,
    genotypes: Vec<Genotype>,
}

impl VcfRecord {
    /// Parses one tab-delimited data line.
    ///
    /// Fails if the line has fewer than [`MIN_FIELDS`] columns or POS is not
    /// an integer. Sample entries whose GT value does not parse become
    /// missing genotypes instead of failing the record.
    ///
    /// # Examples
    ///
    /// ```
    /// use vcf_sift::VcfRecord;
    ///
    /// let record =
    ///     VcfRecord::parse("chr1\t817186\trs3094315\tG\tA\t50\tPASS\tAF=0.2;DB").unwrap();
    /// assert_eq!(record.chrom(), "chr1");
    /// assert_eq!(record.pos(), 817186);
    /// assert!(record.has_flag("DB"));
    /// ```
    pub fn parse(line: &str) -> Result<VcfRecord, RecordError> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < MIN_FIELDS {
            return Err(RecordError::TooFewFields {
                expected: MIN_FIELDS,
                found: fields.len(),
            });
        }
        let pos = fields[1]
            .parse()
            .map_err(|_| RecordError::InvalidPosition(fields[1].to_owned()))?;
        let qual = match fields[5] {
            "." => None,
            text => text.parse().ok(),
        };
        Ok(VcfRecord {
            raw: line.to_owned(),
            chrom: fields[0].to_owned(),
            pos,
            id: fields[2].to_owned(),
            ref_allele: fields[3].to_owned(),
            alt_alleles: fields[4].to_owned(),
            qual,
            filters: fields[6].to_owned(),
            info: parse_info(fields[7]),
            genotypes: parse_genotypes(&fields),
        })
    }

    /// Returns the target sequence identifier of this record, i.e. CHROM.
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// Returns the position of this record, i.e. POS, 1-based.
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Returns the ID of this record (`.` if unset).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the reference allele of this record, i.e. REF.
    pub fn ref_allele(&self) -> &str {
        &self.ref_allele
    }

    /// Returns the alternative alleles of this record as written in the ALT
    /// column (possibly comma-joined).
    pub fn alt_alleles(&self) -> &str {
        &self.alt_alleles
    }

    /// Returns the quality value of this record, i.e. QUAL.
    /// If not set (`.` in VCF), returns `None` — never zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use vcf_sift::VcfRecord;
    ///
    /// let record = VcfRecord::parse("1\t100\t.\tA\tC\t.\tPASS\t.").unwrap();
    /// assert_eq!(record.qual(), None);
    /// ```
    pub fn qual(&self) -> Option<f64> {
        self.qual
    }

    /// Returns the FILTER column as written, e.g. `PASS` or `q10;s50`.
    pub fn filters(&self) -> &str {
        &self.filters
    }

    /// For a given INFO tag, return its value.
    ///
    /// # Examples
    ///
    /// ```
    /// use vcf_sift::VcfRecord;
    ///
    /// let record = VcfRecord::parse("1\t100\t.\tA\tC\t50\tPASS\tDP=132").unwrap();
    /// assert_eq!(record.info("DP").and_then(|value| value.as_number()), Some(132.0));
    /// assert!(record.info("AF").is_none());
    /// ```
    pub fn info(&self, tag: &str) -> Option<&InfoValue> {
        self.info.get(tag)
    }

    /// `true` if the INFO column carries the given presence-only flag.
    pub fn has_flag(&self, tag: &str) -> bool {
        matches!(self.info.get(tag), Some(InfoValue::Flag))
    }

    /// Per-sample genotypes, in sample column order. Samples whose entry
    /// could not be parsed are present as missing genotypes.
    pub fn genotypes(&self) -> &[Genotype] {
        &self.genotypes
    }

    /// The unmodified input line this record was parsed from.
    pub fn as_line(&self) -> &str {
        &self.raw
    }
}

fn parse_info(field: &str) -> IndexMap<String, InfoValue> {
    if field == "." {
        return IndexMap::new();
    }
    match all_consuming(parser::info)(field) {
        Ok((_, entries)) => entries.into_iter().collect(),
        Err(_) => IndexMap::new(),
    }
}

fn missing_genotype() -> Genotype {
    vec![GenotypeAllele::UnphasedMissing, GenotypeAllele::UnphasedMissing]
}

/// Pulls the GT value out of each sample column, at the slot the FORMAT
/// column declares. Anything unparsable is recorded as missing, never as
/// homozygous-reference.
fn parse_genotypes(fields: &[&str]) -> Vec<Genotype> {
    if fields.len() <= FIRST_SAMPLE_COLUMN {
        return Vec::new();
    }
    let gt_slot = fields[FORMAT_COLUMN].split(':').position(|key| key == "GT");
    fields[FIRST_SAMPLE_COLUMN..]
        .iter()
        .map(|sample| {
            gt_slot
                .and_then(|slot| sample.split(':').nth(slot))
                .and_then(|gt| {
                    all_consuming(parser::genotype)(gt)
                        .ok()
                        .map(|(_, alleles)| alleles)
                })
                .unwrap_or_else(missing_genotype)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::GenotypeClass;

    const LINE: &str =
        "chr1\t860416\trs4475692\tG\tA\t87.5\tPASS\tAC=2;AF=0.333;DB\tGT:DP\t0/1:32\t1|1:29\t./.:0";

    #[test]
    fn fixed_fields() {
        let record = VcfRecord::parse(LINE).unwrap();
        assert_eq!(record.chrom(), "chr1");
        assert_eq!(record.pos(), 860416);
        assert_eq!(record.id(), "rs4475692");
        assert_eq!(record.ref_allele(), "G");
        assert_eq!(record.alt_alleles(), "A");
        assert_eq!(record.qual(), Some(87.5));
        assert_eq!(record.filters(), "PASS");
        assert_eq!(record.as_line(), LINE);
    }

    #[test]
    fn info_values_and_flags() {
        let record = VcfRecord::parse(LINE).unwrap();
        assert_eq!(record.info("AC"), Some(&InfoValue::Value("2".into())));
        assert_eq!(record.info("AF").and_then(|v| v.as_number()), Some(0.333));
        assert!(record.has_flag("DB"));
        assert!(!record.has_flag("AC"));
        assert!(record.info("XYZ").is_none());
    }

    #[test]
    fn genotypes_by_declared_slot() {
        let record = VcfRecord::parse(LINE).unwrap();
        let classes: Vec<_> = record
            .genotypes()
            .iter()
            .map(|gt| GenotypeClass::classify(gt))
            .collect();
        assert_eq!(
            classes,
            vec![GenotypeClass::Het, GenotypeClass::HomAlt, GenotypeClass::Missing]
        );
    }

    #[test]
    fn gt_not_first_format_key() {
        let record =
            VcfRecord::parse("1\t100\t.\tA\tC\t50\tPASS\tDP=10\tDP:GT\t32:0/1").unwrap();
        assert_eq!(GenotypeClass::classify(&record.genotypes()[0]), GenotypeClass::Het);
    }

    #[test]
    fn unparsable_genotype_is_missing() {
        let record =
            VcfRecord::parse("1\t100\t.\tA\tC\t50\tPASS\tDP=10\tGT\t0/1\tweird\t0/0").unwrap();
        let classes: Vec<_> = record
            .genotypes()
            .iter()
            .map(|gt| GenotypeClass::classify(gt))
            .collect();
        assert_eq!(
            classes,
            vec![GenotypeClass::Het, GenotypeClass::Missing, GenotypeClass::HomRef]
        );
    }

    #[test]
    fn no_gt_key_means_all_missing() {
        let record = VcfRecord::parse("1\t100\t.\tA\tC\t50\tPASS\tDP=10\tDP\t32\t17").unwrap();
        assert_eq!(record.genotypes().len(), 2);
        assert!(record
            .genotypes()
            .iter()
            .all(|gt| GenotypeClass::classify(gt) == GenotypeClass::Missing));
    }

    #[test]
    fn no_sample_columns() {
        let record = VcfRecord::parse("1\t100\t.\tA\tC\t50\tPASS\tDP=10").unwrap();
        assert!(record.genotypes().is_empty());
    }

    #[test]
    fn missing_qual_is_none() {
        let record = VcfRecord::parse("1\t100\t.\tA\tC\t.\tPASS\t.").unwrap();
        assert_eq!(record.qual(), None);
        assert!(record.info.is_empty());
    }

    #[test]
    fn too_few_fields() {
        let err = VcfRecord::parse("1\t100\t.\tA").unwrap_err();
        assert!(matches!(err, RecordError::TooFewFields { found: 4, .. }));
    }

    #[test]
    fn bad_position() {
        let err = VcfRecord::parse("1\tabc\t.\tA\tC\t50\tPASS\t.").unwrap_err();
        assert!(matches!(err, RecordError::InvalidPosition(_)));
    }
}
