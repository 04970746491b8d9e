use std::fmt::Debug;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use crate::errors::*;

/// Row of a tab-separated table, with its 1-based line number
pub struct Row {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Reads a tab-separated table, skipping blank lines and `#` comments
pub fn read<P: AsRef<Path> + Debug>(path: &P) -> Result<Vec<Row>> {
    let file = File::open(path).chain_err(|| format!("failed to open table {:?}", path))?;
    let reader = BufReader::new(file);

    let mut table = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.chain_err(|| "error reading line from table")?;
        if !line.trim().is_empty() && !line.starts_with('#') {
            table.push(Row {
                line: idx + 1,
                fields: line.split('\t').map(|v| v.trim().to_string()).collect(),
            });
        }
    }

    Ok(table)
}

/// True for a header row: the first row, when `column` does not hold a number
pub fn is_header(idx: usize, row: &Row, column: usize) -> bool {
    idx == 0 && row.fields.get(column).map_or(false, |v| v.parse::<u64>().is_err())
}
