//! Header line to column position lookup.

use std::collections::HashMap;

use super::split_fields;

/// Column name to zero-based position, built from the header line.
///
/// Names are the raw header tokens, untrimmed and case-sensitive. When a
/// name occurs more than once, the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
    columns: Vec<String>,
}

impl ColumnIndex {
    /// Build the index from a header line. Never fails.
    pub fn resolve(header_line: &str) -> Self {
        let mut index = Self::default();

        for (position, name) in split_fields(header_line).into_iter().enumerate() {
            index.positions.insert(name.to_string(), position);
            index.columns.push(name.to_string());
        }

        index
    }

    /// Position of a column, `None` if the header does not name it.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Header tokens in file order, duplicates included.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of header tokens.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Names occurring more than once, in order of first occurrence.
    pub fn duplicates(&self) -> Vec<&str> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut duplicates = Vec::new();

        for name in &self.columns {
            let count = seen.entry(name.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(name.as_str());
            }
        }

        duplicates
    }

    /// Names from `required` that the header does not contain.
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| self.index_of(name).is_none())
            .collect()
    }
}
