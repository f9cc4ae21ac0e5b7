use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// The uploaded file could not be turned into a [`Dataset`](crate::data::model::Dataset).
///
/// Recovered locally: the previously loaded dataset (if any) stays in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("malformed delimited text: {0}")]
    Csv(String),

    #[error("unreadable spreadsheet: {0}")]
    Spreadsheet(String),
}

/// The current selection cannot be submitted. No request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no file has been loaded")]
    NoDataset,

    #[error("the loaded file has no columns")]
    NoColumns,

    #[error("please select a method")]
    MissingMethod,

    #[error("please select the X column")]
    MissingPrimaryColumn,

    #[error("please select both X and Y columns for correlation analysis")]
    MissingSecondaryColumn,

    #[error("column {index} does not exist (the file has {len} columns)")]
    UnknownColumn { index: usize, len: usize },

    #[error("a request is already running")]
    SubmissionInFlight,
}

/// The analysis service could not be reached or refused the request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("could not create HTTP client: {0}")]
    Client(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("service answered {status}: {body}")]
    Status { status: u16, body: String },
}

/// Everything that can go wrong between pressing "Run" and showing a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unexpected response from service: {0}")]
    ResponseFormat(String),
}

impl AnalysisError {
    /// Transport and response-format failures are shown to the user the same way.
    pub fn is_service_failure(&self) -> bool {
        matches!(self, AnalysisError::Transport(_) | AnalysisError::ResponseFormat(_))
    }
}
