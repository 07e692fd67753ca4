use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    UpToDate,
    Stale,
    Missing,
}

/// Outcome of comparing freshly generated output with the file on disk.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub output: PathBuf,
    pub status: CheckStatus,
    /// 1-based line of the first difference, when the file is stale.
    pub first_difference: Option<usize>,
    pub has_drift: bool,
}

pub fn compare_output(output: &Path, expected: &[u8], actual: Option<&[u8]>) -> CheckReport {
    let (status, first_difference) = match actual {
        None => (CheckStatus::Missing, None),
        Some(actual) if actual == expected => (CheckStatus::UpToDate, None),
        Some(actual) => (
            CheckStatus::Stale,
            Some(first_differing_line(expected, actual)),
        ),
    };
    CheckReport {
        output: output.to_path_buf(),
        status,
        first_difference,
        has_drift: status != CheckStatus::UpToDate,
    }
}

fn first_differing_line(a: &[u8], b: &[u8]) -> usize {
    let mut lines_a = a.split(|&c| c == b'\n');
    let mut lines_b = b.split(|&c| c == b'\n');
    let mut line = 1;
    loop {
        match (lines_a.next(), lines_b.next()) {
            (Some(x), Some(y)) if x == y => line += 1,
            _ => return line,
        }
    }
}
