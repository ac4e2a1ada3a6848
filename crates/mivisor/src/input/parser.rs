//! CSV/TSV reader with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::cell::CellValue;
use super::source::{Dataset, SourceMetadata};
use crate::error::{MivisorError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Reads delimited text files into datasets.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file into a dataset with source metadata attached.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| MivisorError::io(path, e))?;
        let size_bytes = file
            .metadata()
            .map_err(|e| MivisorError::io(path, e))?
            .len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| MivisorError::io(path, e))?;

        let hash = hash_bytes(&contents);

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)
                .ok_or_else(|| MivisorError::parse(path, "no lines to analyze"))?,
        };
        debug!(delimiter = %(delimiter as char).escape_default(), "detected delimiter");

        let dataset = self.parse_bytes(&contents, delimiter).map_err(|e| match e {
            MivisorError::Validation(message) => MivisorError::parse(path, message),
            other => other,
        })?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        let source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            dataset.row_count(),
            dataset.column_count(),
        );
        info!(
            file = %source.file,
            rows = source.row_count,
            columns = source.column_count,
            "parsed delimited file"
        );

        Ok(dataset.with_source(source))
    }

    /// Parse bytes directly.
    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers = normalize_headers(reader.headers()?.iter().map(str::to_string));
        if headers.is_empty() {
            return Err(MivisorError::Validation("no columns found".to_string()));
        }

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            rows.push(record.iter().map(CellValue::from_text).collect());
        }

        Dataset::from_rows(headers, rows)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a CSV/TSV file with the default parser settings.
pub fn read_delimited(path: impl AsRef<Path>) -> Result<Dataset> {
    Parser::new().parse_file(path)
}

/// SHA-256 of file contents, prefixed with the algorithm name.
pub(crate) fn hash_bytes(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    format!("sha256:{:x}", hasher.finalize())
}

/// Give blank headers a positional name and suffix duplicates.
///
/// `["", "AMP", "AMP"]` becomes `["Unnamed: 0", "AMP", "AMP.1"]`.
pub(crate) fn normalize_headers(raw: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();

    for (idx, header) in raw.into_iter().enumerate() {
        let base = match header.trim() {
            "" => format!("Unnamed: {}", idx),
            trimmed => trimmed.to_string(),
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while headers.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        headers.push(candidate);
    }

    headers
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Option<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return None;
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tab breaks ties.
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Some(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
