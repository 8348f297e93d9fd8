use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

lazy_static! {
    static ref READ1_SUFFIX: Regex = Regex::new(r"_1$").unwrap();
}

/// Extension carried by every raw read file named in the manifest.
const FASTQ_SUFFIX: &str = ".fq.gz";

/// Sequencing platform written into every read group.
pub const PLATFORM: &str = "Illumina";

/// Fields extracted positionally from an Illumina read header such as
/// `A00742:819:H5T7HDSXC:1:1101:1832:1000`. Only the flowcell reaches the
/// output document (as the `PU` tag), but the full set is parsed so a
/// malformed header is rejected up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadHeader {
    pub instrument: String,
    pub run_number: String,
    pub flowcell: String,
    pub lane: String,
}

impl ReadHeader {
    /// Parse a colon-delimited instrument header. Indices 0, 1, 2 and 6
    /// carry the instrument, run number, flowcell ID and lane; anything
    /// shorter than seven fields is malformed.
    pub fn parse(header: &str) -> Result<Self> {
        let fields: Vec<&str> = header.split(':').collect();
        if fields.len() < 7 {
            bail!(
                "read header '{}' has {} colon-delimited fields, expected at least 7",
                header,
                fields.len()
            );
        }
        Ok(ReadHeader {
            instrument: fields[0].to_string(),
            run_number: fields[1].to_string(),
            flowcell: fields[2].to_string(),
            lane: fields[6].to_string(),
        })
    }
}

/// One sample derived from a single manifest line.
///
/// The serialized form is the per-sample object of the output document:
/// `fq1`/`fq2` name the paired read files (relative, extension stripped)
/// and `ID`/`SM`/`PU`/`PL` are the read-group tags handed to the aligner.
/// The stem keys the object in the document and is also used for `ID` and
/// `SM`, so it must be unique per biological sample; the translator does
/// not enforce that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleRecord {
    #[serde(skip)]
    pub stem: String,
    #[serde(skip)]
    pub header: ReadHeader,
    pub fq1: String,
    pub fq2: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "SM")]
    pub sample: String,
    #[serde(rename = "PU")]
    pub platform_unit: String,
    #[serde(rename = "PL")]
    pub platform: String,
}

impl SampleRecord {
    /// Build a record from one manifest line of the form
    ///
    /// ```text
    /// 01.RawData/A_14/A_14_1.fq.gz  A00742:819:H5T7HDSXC:1:1101:1832:1000 ...
    /// ```
    ///
    /// The first whitespace field is the path to the first read of the
    /// pair: component 1 is the sample stem and component 2 the leaf
    /// filename. The second field is the instrument header embedded in
    /// that file. The path of the second read is derived by swapping the
    /// trailing `_1` for `_2`; a first-read name without that suffix
    /// would silently pair the sample with itself, so it is rejected.
    pub fn from_line(line: &str) -> Result<Self> {
        let mut fields = line.split_whitespace();
        let path = fields
            .next()
            .context("manifest line is empty")?;
        let header = fields
            .next()
            .with_context(|| format!("manifest line '{}' has no read header field", path))?;

        let components: Vec<&str> = path.split('/').collect();
        if components.len() < 3 {
            bail!(
                "read path '{}' has {} slash-delimited components, expected at least 3",
                path,
                components.len()
            );
        }
        let stem = components[1].to_string();
        let leaf = components[2];

        let base = format!("{}/{}", stem, leaf);
        let base = base.strip_suffix(FASTQ_SUFFIX).unwrap_or(&base).to_string();
        if !READ1_SUFFIX.is_match(&base) {
            bail!(
                "first-read path '{}' does not end in '_1'; cannot derive its mate",
                path
            );
        }
        let fq2 = READ1_SUFFIX.replace(&base, "_2").into_owned();

        let header = ReadHeader::parse(header)?;

        Ok(SampleRecord {
            id: stem.clone(),
            sample: stem.clone(),
            platform_unit: header.flowcell.clone(),
            platform: PLATFORM.to_string(),
            stem,
            header,
            fq1: base,
            fq2,
        })
    }
}

/// Read a manifest file and derive one `SampleRecord` per line, in file
/// order. Duplicate stems are kept as-is. Any malformed line aborts the
/// whole read with an error naming the 1-based line number.
pub fn read_manifest(path: &Path) -> Result<Vec<SampleRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open manifest {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let record = SampleRecord::from_line(&line)
            .with_context(|| format!("manifest line {}", idx + 1))?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str =
        "01.RawData/A_14/A_14_1.fq.gz  A00742:819:H5T7HDSXC:1:1101:1832:1000 1:N:0:TACCAACTGC+TNCGAGCTTG";

    #[test]
    fn test_record_from_line() {
        let rec = SampleRecord::from_line(LINE).unwrap();
        assert_eq!(rec.stem, "A_14");
        assert_eq!(rec.fq1, "A_14/A_14_1");
        assert_eq!(rec.fq2, "A_14/A_14_2");
        assert_eq!(rec.id, "A_14");
        assert_eq!(rec.sample, "A_14");
        assert_eq!(rec.platform_unit, "H5T7HDSXC");
        assert_eq!(rec.platform, "Illumina");
    }

    #[test]
    fn test_header_fields_positional() {
        let rec = SampleRecord::from_line(LINE).unwrap();
        assert_eq!(rec.header.instrument, "A00742");
        assert_eq!(rec.header.run_number, "819");
        assert_eq!(rec.header.flowcell, "H5T7HDSXC");
        assert_eq!(rec.header.lane, "1000");
    }

    #[test]
    fn test_mate_substitution_anchored_at_end() {
        // Inner `_1` tokens must survive; only the trailing one is swapped.
        let line = "raw/S_1_a/S_1_a_1.fq.gz  M:2:FC:1:1:1:4";
        let rec = SampleRecord::from_line(line).unwrap();
        assert_eq!(rec.fq1, "S_1_a/S_1_a_1");
        assert_eq!(rec.fq2, "S_1_a/S_1_a_2");
    }

    #[test]
    fn test_missing_read1_suffix_is_an_error() {
        let line = "raw/S1/S1.fq.gz  M:2:FC:1:1:1:4";
        let err = SampleRecord::from_line(line).unwrap_err();
        assert!(err.to_string().contains("does not end in '_1'"));
    }

    #[test]
    fn test_too_few_path_components() {
        let line = "S1_1.fq.gz  M:2:FC:1:1:1:4";
        let err = SampleRecord::from_line(line).unwrap_err();
        assert!(err.to_string().contains("slash-delimited"));
    }

    #[test]
    fn test_short_read_header() {
        let line = "raw/S1/S1_1.fq.gz  M:2:FC:1";
        let err = SampleRecord::from_line(line).unwrap_err();
        assert!(err.to_string().contains("expected at least 7"));
    }

    #[test]
    fn test_missing_header_field() {
        let err = SampleRecord::from_line("raw/S1/S1_1.fq.gz").unwrap_err();
        assert!(err.to_string().contains("no read header field"));
    }

    #[test]
    fn test_extra_header_fields_are_fine() {
        let header = "M:2:FC:1:1:1:4:extra:more";
        let parsed = ReadHeader::parse(header).unwrap();
        assert_eq!(parsed.lane, "4");
    }
}
