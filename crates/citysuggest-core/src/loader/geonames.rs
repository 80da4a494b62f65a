// crates/citysuggest-core/src/loader/geonames.rs

//! GeoNames dump format (`cities15000.txt`, `cities_canada-usa.tsv`, ...).
//!
//! Tab-separated, 19 columns, optionally preceded by a header line:
//!
//! ```text
//! 0: geonameid   1: name       2: asciiname  3: alternatenames
//! 4: latitude    5: longitude  6: fclass     7: fcode
//! 8: country     9: cc2       10: admin1    11: admin2
//! 12: admin3    13: admin4    14: population 15: elevation
//! 16: dem       17: timezone  18: modified
//! ```

use super::{open_stream, CatalogSource};
use crate::error::{CitySuggestError, Result};
use crate::model::CityRecord;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::warn;

const MIN_COLUMNS: usize = 15;

#[derive(Debug, Clone)]
pub struct GeoNamesTsv {
    path: PathBuf,
}

impl GeoNamesTsv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for GeoNamesTsv {
    fn load(&self) -> Result<Vec<CityRecord>> {
        let reader = BufReader::new(open_stream(&self.path)?);
        let mut out = Vec::new();
        let mut skipped = 0usize;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            if line.trim().is_empty() || (line_no == 1 && is_header(&line)) {
                continue;
            }
            match parse_row(&line, line_no) {
                Ok(city) => out.push(city),
                Err(e) => {
                    skipped += 1;
                    warn!(path = %self.path.display(), error = %e, "skipping row");
                }
            }
        }

        if skipped > 0 {
            warn!(path = %self.path.display(), skipped, kept = out.len(), "some rows were skipped");
        }
        Ok(out)
    }
}

fn is_header(line: &str) -> bool {
    line.split('\t')
        .next()
        .is_some_and(|first| first.trim().eq_ignore_ascii_case("id") || first.trim().eq_ignore_ascii_case("geonameid"))
}

fn parse_row(line: &str, line_no: usize) -> Result<CityRecord> {
    let invalid = |reason: String| CitySuggestError::InvalidRecord {
        line: line_no,
        reason,
    };

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < MIN_COLUMNS {
        return Err(invalid(format!(
            "expected at least {MIN_COLUMNS} columns, found {}",
            fields.len()
        )));
    }

    let id = fields[0].trim().parse::<u64>().unwrap_or(line_no as u64);
    let latitude = parse_f64(fields[4]).ok_or_else(|| invalid(format!("bad latitude {:?}", fields[4])))?;
    let longitude = parse_f64(fields[5]).ok_or_else(|| invalid(format!("bad longitude {:?}", fields[5])))?;
    let population = fields[14].trim().parse::<u64>().unwrap_or(0);

    let city = CityRecord::new(id, fields[1], latitude, longitude)
        .map_err(|e| invalid(e.to_string()))?
        .with_location(fields[8], fields[10])
        .with_population(population);
    Ok(city)
}

fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}
