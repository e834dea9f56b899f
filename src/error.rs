use thiserror::Error;

/// Everything that can stop a load run.
///
/// The first five variants are the data taxonomy: they always name the sheet or
/// dataset, and where one exists the region and the financial start year.
/// The remaining variants wrap failures from the workbook reader, the
/// dataframe engine and the SQLite store.
#[derive(Debug, Error)]
pub enum EtlError {
    /// The sheet layout deviates from its template.
    #[error("format error in sheet '{sheet}': {message}")]
    Format { sheet: String, message: String },

    /// No row for a required (region, year) combination.
    #[error("missing data in '{dataset}': no value for '{key}' in {start_year}")]
    MissingData {
        dataset: String,
        key: String,
        start_year: i32,
    },

    /// More than one row for a (region, year) combination.
    #[error("ambiguous data in '{dataset}': {rows} rows for '{key}' in {start_year}")]
    AmbiguousData {
        dataset: String,
        key: String,
        start_year: i32,
        rows: usize,
    },

    /// A record references a region that the catalog does not hold.
    #[error("referential error: {0}")]
    Referential(String),

    /// Commit or rollback itself failed.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// Region catalog or template catalog is not usable. Raised at startup.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("dataframe error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EtlError {
    pub(crate) fn format(sheet: impl Into<String>, message: impl Into<String>) -> Self {
        EtlError::Format {
            sheet: sheet.into(),
            message: message.into(),
        }
    }

    pub(crate) fn missing(dataset: impl Into<String>, key: impl Into<String>, start_year: i32) -> Self {
        EtlError::MissingData {
            dataset: dataset.into(),
            key: key.into(),
            start_year,
        }
    }
}

impl From<garde::Report> for EtlError {
    fn from(report: garde::Report) -> Self {
        EtlError::Config(report.to_string())
    }
}
