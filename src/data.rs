//! CSV loading and validation for the launch records dataset.
//!
//! The file is read exactly once at startup. A missing file or a missing
//! required column is fatal; individual rows that fail to parse are counted,
//! logged, and skipped.

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::record::{Dataset, LaunchRecord, Outcome};

pub const COL_SITE: &str = "Launch Site";
pub const COL_PAYLOAD: &str = "Payload Mass (kg)";
pub const COL_BOOSTER: &str = "Booster Version Category";
pub const COL_CLASS: &str = "class";

pub const REQUIRED_COLUMNS: [&str; 4] = [COL_SITE, COL_PAYLOAD, COL_BOOSTER, COL_CLASS];

/// Column positions resolved from the header; extra columns and ordering
/// differences are tolerated.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    site: usize,
    payload: usize,
    booster: usize,
    class: usize,
}

impl ColumnIndex {
    fn resolve(header: &[String]) -> Result<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| anyhow!("missing required column: {:?}", name))
        };
        Ok(Self {
            site: find(COL_SITE)?,
            payload: find(COL_PAYLOAD)?,
            booster: find(COL_BOOSTER)?,
            class: find(COL_CLASS)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub rows: usize,
    pub bad_rows: u64,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetManifest {
    pub path: String,
    pub hash_sha256: String,
    pub row_count: usize,
    pub bad_rows: u64,
    pub payload_min: f64,
    pub payload_max: f64,
    pub sites: Vec<String>,
    pub generated_at_epoch_ms: u64,
}

/// Load the launch records CSV once. Fatal on missing file, empty file, or a
/// missing required column.
pub fn load_dataset(path: &Path) -> Result<(Dataset, LoadReport)> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header_line = loop {
        match lines.next() {
            Some(line) => {
                let line = line.context("read error in CSV header")?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => bail!("{}: empty CSV, no header row", path.display()),
        }
    };
    let header: Vec<String> = header_line.split(',').map(|s| s.trim().to_string()).collect();
    let cols = ColumnIndex::resolve(&header)
        .with_context(|| format!("bad header in {}", path.display()))?;

    let mut records = Vec::new();
    let mut bad_rows = 0u64;
    let mut warnings = Vec::new();
    for (lineno, line) in lines.enumerate() {
        let line = line.context("read error in CSV body")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_row(trimmed, cols) {
            Ok(record) => records.push(record),
            Err(err) => {
                bad_rows += 1;
                warnings.push(format!("line {}: {}", lineno + 2, err));
            }
        }
    }

    let report = LoadReport { rows: records.len(), bad_rows, warnings };
    Ok((Dataset::new(records), report))
}

fn parse_row(line: &str, cols: ColumnIndex) -> Result<LaunchRecord> {
    let fields: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
    let needed = cols.site.max(cols.payload).max(cols.booster).max(cols.class);
    if fields.len() <= needed {
        bail!("expected at least {} columns, got {}", needed + 1, fields.len());
    }

    let site = fields[cols.site];
    if site.is_empty() {
        bail!("empty launch site");
    }
    let payload_mass_kg: f64 = fields[cols.payload]
        .parse()
        .map_err(|e| anyhow!("bad payload mass {:?}: {}", fields[cols.payload], e))?;
    if payload_mass_kg < 0.0 {
        bail!("negative payload mass: {}", payload_mass_kg);
    }
    let class: u8 = fields[cols.class]
        .parse()
        .map_err(|e| anyhow!("bad class {:?}: {}", fields[cols.class], e))?;
    let outcome = Outcome::from_class(class)
        .ok_or_else(|| anyhow!("class must be 0 or 1, got {}", class))?;

    Ok(LaunchRecord {
        site: site.to_string(),
        payload_mass_kg,
        booster_category: fields[cols.booster].to_string(),
        outcome,
    })
}

/// Provenance record for a loaded dataset file.
pub fn manifest(path: &Path, dataset: &Dataset, report: &LoadReport) -> Result<DatasetManifest> {
    let (payload_min, payload_max) = dataset.payload_bounds();
    Ok(DatasetManifest {
        path: path.display().to_string(),
        hash_sha256: file_sha256(path)?,
        row_count: dataset.len(),
        bad_rows: report.bad_rows,
        payload_min,
        payload_max,
        sites: dataset.sites().to_vec(),
        generated_at_epoch_ms: crate::logging::ts_epoch_ms(),
    })
}

pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
