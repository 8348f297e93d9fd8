use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::manifest::SampleRecord;

/// Read suffixes of a pair, in the order the pipeline iterates them.
pub const READ_SUFFIXES: [&str; 2] = ["1", "2"];

/// Static input/output directory entries copied verbatim into the document
/// header. The downstream pipeline looks these up by exact key, including
/// the `Comment*` prose entries, so the spellings are load-bearing.
const DIRECTORY_ENTRIES: [(&str, &str); 10] = [
    (
        "Commment_Input_Output_Directories",
        "This section specifies the input and output directories for scripts",
    ),
    ("counts_dir", "../counts/"),
    (
        "rawReads",
        "/research/labs/neurology/fryer/projects/aducanumab/2024_bulkRNA/01.RawData/",
    ),
    ("rawQC", "../rawQC/"),
    ("trimmedReads", "../trimmedReads/"),
    ("trimmedQC", "../trimmedQC/"),
    ("starAligned", "../starAligned/"),
    ("bamstats", "../bamstats/"),
    ("multiQC_raw_report", "../rawQC/multiqc_report"),
    ("multiQC_trimmed_report", "../trimmedQC/multiqc_report"),
];

/// Static reference-genome entries, also copied through unchanged.
const REFERENCE_ENTRIES: [(&str, &str); 4] = [
    (
        "Comment_Reference",
        "This section specifies the location of the mouse , Ensembl reference genome",
    ),
    (
        "Mmusculus_dir",
        "/research/labs/neurology/fryer/projects/references/mouse/refdata-gex-mm10-2020-A_star_2.7.4/",
    ),
    (
        "Mmusculus_gtf",
        "/research/labs/neurology/fryer/projects/references/mouse/refdata-gex-mm10-2020-A/genes/genes.gtf",
    ),
    (
        "Mmusculus_fa",
        "/research/labs/neurology/fryer/projects/references/mouse/refdata-gex-mm10-2020-A/fasta/genome.fa",
    ),
];

const SAMPLE_SECTION_COMMENT: (&str, &str) = (
    "Comment_Sample_Info",
    "The following section lists the samples that are to be analyzed",
);

/// Assemble the full configuration document: static header entries, the
/// ordered `sample_names` list, the `read` suffix list, then one object
/// per sample keyed by its stem. Key order follows insertion order, so
/// the records appear in manifest order.
///
/// An empty record list yields a document with an empty `sample_names`
/// and no per-sample objects, which still parses as JSON.
pub fn build_document(records: &[SampleRecord]) -> Result<Value> {
    let mut doc = Map::new();

    for (key, value) in DIRECTORY_ENTRIES {
        doc.insert(key.to_string(), json!(value));
    }
    for (key, value) in REFERENCE_ENTRIES {
        doc.insert(key.to_string(), json!(value));
    }

    let (key, value) = SAMPLE_SECTION_COMMENT;
    doc.insert(key.to_string(), json!(value));

    let stems: Vec<&str> = records.iter().map(|r| r.stem.as_str()).collect();
    doc.insert("sample_names".to_string(), json!(stems));
    doc.insert("read".to_string(), json!(READ_SUFFIXES));

    for record in records {
        let value = serde_json::to_value(record)
            .with_context(|| format!("Failed to serialize sample '{}'", record.stem))?;
        doc.insert(record.stem.clone(), value);
    }

    Ok(Value::Object(doc))
}

/// Write the document for `records` to `path`, overwriting any previous
/// run's output. Pretty-printed JSON with a trailing newline.
pub fn write_config(path: &Path, records: &[SampleRecord]) -> Result<()> {
    let document = build_document(records)?;
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &document)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
