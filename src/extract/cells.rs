use calamine::Data;

/// One source cell after the workbook reader is done with it.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn from_data(cell: Option<&Data>) -> Self {
        match cell {
            None | Some(Data::Empty) => Cell::Empty,
            Some(Data::String(s)) if s.trim().is_empty() => Cell::Empty,
            Some(Data::String(s)) => Cell::Text(s.trim().to_string()),
            Some(Data::Float(f)) => Cell::Number(*f),
            Some(Data::Int(v)) => Cell::Number(*v as f64),
            // Convert boolean to f64: true -> 1.0, false -> 0.0
            Some(Data::Bool(b)) => Cell::Number(if *b { 1.0 } else { 0.0 }),
            Some(Data::DateTime(dt)) => Cell::Number(dt.as_f64()),
            Some(other) => Cell::Text(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric value of the cell. Text is accepted when it reads as a number
    /// once thousands separators are removed ("1,234.5"). Infinities and NaN,
    /// spelled out or not, are not numbers here.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(f) => Some(*f),
            Cell::Text(s) => s.replace(',', "").parse::<f64>().ok(),
            Cell::Empty => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// Text used when the cell is a row or column label.
    pub fn label(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            // Whole numbers print without the trailing ".0"
            Cell::Number(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
            Cell::Number(f) => f.to_string(),
        }
    }
}
