use std::fmt;
use std::str::FromStr;

/// Inclusive spreadsheet column span such as `B:J`, stored as 0-based indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRange {
    pub first: u32,
    pub last: u32,
}

impl ColumnRange {
    pub fn width(&self) -> usize {
        (self.last - self.first + 1) as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> {
        self.first..=self.last
    }
}

impl FromStr for ColumnRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, last) = s
            .split_once(':')
            .ok_or_else(|| format!("column range '{s}' must look like 'B:J'"))?;
        let first = column_index(first)?;
        let last = column_index(last)?;
        if last < first {
            return Err(format!("column range '{s}' ends before it starts"));
        }
        Ok(Self { first, last })
    }
}

impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", column_letters(self.first), column_letters(self.last))
    }
}

/// "A" → 0, "Z" → 25, "AA" → 26, "AH" → 33
pub fn column_index(letters: &str) -> Result<u32, String> {
    let letters = letters.trim();
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(format!("'{letters}' is not a column reference"));
    }
    // XFD is the last column of a worksheet
    if letters.len() > 3 {
        return Err(format!("column '{letters}' is out of range"));
    }

    let index = letters
        .chars()
        .map(|c| c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)
        .fold(0, |acc, d| acc * 26 + d);
    Ok(index - 1)
}

pub fn column_letters(index: u32) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    out.iter().rev().collect()
}
