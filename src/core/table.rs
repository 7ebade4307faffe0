//! In-memory delimited tables: the wide FANTASIA summary, per-term and
//! per-gene outputs. Cells stay as text; numeric views are taken per column.

use crate::bio::annotation::parse_score;
use crate::IntegratorError;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DelimitedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DelimitedTable {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn read_tsv<P: AsRef<Path>>(path: P) -> Result<Self, IntegratorError> {
        Self::read_delimited(path, b'\t')
    }

    pub fn read_delimited<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self, IntegratorError> {
        let file = File::open(path.as_ref())?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let mut table = Self::new(reader.headers()?.iter().map(|h| h.trim().to_string()));
        for record in reader.records() {
            let record = record?;
            table.push_row(record.iter().map(str::to_string).collect());
        }
        Ok(table)
    }

    pub fn write_tsv<P: AsRef<Path>>(&self, path: P) -> Result<(), IntegratorError> {
        self.write_delimited(path, b'\t')
    }

    pub fn write_delimited<P: AsRef<Path>>(&self, path: P, delimiter: u8) -> Result<(), IntegratorError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(path.as_ref())?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// First of `candidates` that is a column of this table
    pub fn find_column(&self, candidates: &[&str]) -> Option<usize> {
        candidates.iter().find_map(|name| self.column(name))
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Column coerced to numbers; blanks and non-numeric cells become `None`
    pub fn numeric(&self, col: usize) -> Vec<Option<f64>> {
        self.rows
            .iter()
            .map(|row| row.get(col).and_then(|v| parse_score(v)))
            .collect()
    }

    /// Append a row, padding or truncating it to the header width
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Replace a column's values, appending the column if it is new
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        let col = match self.column(name) {
            Some(col) => col,
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(String::new());
                }
                self.headers.len() - 1
            }
        };
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[col] = value;
        }
    }

    /// Same columns, only the rows for which `keep` holds
    pub fn select_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(usize, &[String]) -> bool,
    {
        Self {
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .enumerate()
                .filter(|(i, row)| keep(*i, row))
                .map(|(_, row)| row.clone())
                .collect(),
        }
    }
}
