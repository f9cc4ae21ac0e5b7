use std::sync::Arc;

use super::method::{ColumnShape, Endpoint, Method};
use crate::data::model::{Dataset, SourceFile};
use crate::error::ValidationError;
use crate::state::Selection;

/// Multipart part name the service expects the uploaded file under.
pub const FILE_FIELD: &str = "csvFile";

/// A single outbound analysis request. Built per submission and sent once.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub method: Method,
    pub endpoint: Endpoint,
    pub file_name: String,
    pub file_bytes: Arc<[u8]>,
    /// Text fields appended after the file, in order.
    pub fields: Vec<(&'static str, String)>,
}

impl AnalysisRequest {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Assemble the request for a ready selection.
///
/// Column values are the header names at the selected positions; the parsed
/// cells are never sent, the service re-reads the original file.
pub fn build(
    file: &SourceFile,
    dataset: &Dataset,
    selection: &Selection,
) -> Result<AnalysisRequest, ValidationError> {
    selection.validate(dataset)?;
    let method = selection.method.ok_or(ValidationError::MissingMethod)?;
    let column = |index: Option<usize>, missing: ValidationError| {
        let index = index.ok_or(missing)?;
        dataset
            .column_name(index)
            .map(str::to_string)
            .ok_or(ValidationError::UnknownColumn {
                index,
                len: dataset.column_count(),
            })
    };

    let fields = match method.shape() {
        ColumnShape::TwoColumn => vec![
            ("columnX", column(selection.primary, ValidationError::MissingPrimaryColumn)?),
            (
                "columnY",
                column(selection.effective_secondary(), ValidationError::MissingSecondaryColumn)?,
            ),
        ],
        ColumnShape::SingleColumn => vec![(
            "column",
            column(selection.primary, ValidationError::MissingPrimaryColumn)?,
        )],
        ColumnShape::FileOnly => Vec::new(),
    };

    Ok(AnalysisRequest {
        method,
        endpoint: method.endpoint(),
        file_name: file.name.clone(),
        file_bytes: Arc::clone(&file.bytes),
        fields,
    })
}
