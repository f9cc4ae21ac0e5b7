use crate::analysis::method::Method;
use crate::analysis::request::{self, AnalysisRequest};
use crate::analysis::result::AnalysisResult;
use crate::data::model::{Dataset, SourceFile};
use crate::error::{AnalysisError, ParseError, ValidationError};

// ---------------------------------------------------------------------------
// Selection – which columns and which method
// ---------------------------------------------------------------------------

/// Columns are tracked by position so duplicate header names stay distinct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// "X" column.
    pub primary: Option<usize>,
    /// "Y" column, only meaningful for two-column methods.
    pub secondary: Option<usize>,
    pub method: Option<Method>,
}

impl Selection {
    /// The secondary column as far as the chosen method is concerned.
    ///
    /// Kept in memory across method switches, but only two-column methods
    /// ever see it.
    pub fn effective_secondary(&self) -> Option<usize> {
        match self.method {
            Some(m) if m.needs_secondary() => self.secondary,
            _ => None,
        }
    }

    /// Primary and method set, and a secondary present iff the method needs one.
    pub fn is_ready(&self) -> bool {
        match self.method {
            Some(m) => {
                self.primary.is_some() && self.effective_secondary().is_some() == m.needs_secondary()
            }
            None => false,
        }
    }

    /// Check the selection against the dataset it refers to.
    pub fn validate(&self, dataset: &Dataset) -> Result<(), ValidationError> {
        if !dataset.has_columns() {
            return Err(ValidationError::NoColumns);
        }
        let method = self.method.ok_or(ValidationError::MissingMethod)?;
        let primary = self.primary.ok_or(ValidationError::MissingPrimaryColumn)?;
        check_column(dataset, primary)?;
        if method.needs_secondary() {
            let secondary = self
                .effective_secondary()
                .ok_or(ValidationError::MissingSecondaryColumn)?;
            check_column(dataset, secondary)?;
        }
        Ok(())
    }
}

fn check_column(dataset: &Dataset, index: usize) -> Result<(), ValidationError> {
    if index < dataset.column_count() {
        Ok(())
    } else {
        Err(ValidationError::UnknownColumn {
            index,
            len: dataset.column_count(),
        })
    }
}

// ---------------------------------------------------------------------------
// Phase – derived view of where the workflow stands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No dataset loaded.
    Empty,
    /// Dataset present, no method chosen.
    Loaded,
    /// Method chosen but the column selection is incomplete.
    MethodChosen,
    /// Ready to submit.
    Ready,
    /// A request is in flight.
    Submitting,
    /// Ready, and a result is being shown.
    Resulted,
}

/// The request currently in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub method: Method,
    pub source_file: String,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
///
/// Only mutated on the UI thread; background work reports back through
/// `finish_decode` / `finish_submit`.
#[derive(Debug, Default)]
pub struct AppState {
    /// The uploaded file, kept verbatim for requests.
    pub file: Option<SourceFile>,

    /// Parsed view of `file` (None until a file decodes successfully).
    pub dataset: Option<Dataset>,

    pub selection: Selection,

    /// Last successful result.
    pub result: Option<AnalysisResult>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Name of the file being decoded, if any.
    pub loading: Option<String>,

    decode_generation: u64,
    submission: Option<PendingSubmission>,
}

impl AppState {
    pub fn phase(&self) -> Phase {
        if self.dataset.is_none() {
            Phase::Empty
        } else if self.submission.is_some() {
            Phase::Submitting
        } else if self.selection.method.is_none() {
            Phase::Loaded
        } else if !self.selection.is_ready() {
            Phase::MethodChosen
        } else if self.result.is_some() {
            Phase::Resulted
        } else {
            Phase::Ready
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file.as_ref().map(|f| f.name.as_str())
    }

    pub fn submission(&self) -> Option<&PendingSubmission> {
        self.submission.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.is_some()
    }

    // -- file decoding --

    /// Start decoding a new file; any decode still outstanding is superseded.
    ///
    /// Returns the generation the completion must carry.
    pub fn begin_decode(&mut self, name: &str) -> u64 {
        self.decode_generation += 1;
        self.loading = Some(name.to_string());
        self.decode_generation
    }

    /// Apply a decode completion. Returns `false` if it was superseded.
    pub fn finish_decode(
        &mut self,
        generation: u64,
        file: SourceFile,
        parsed: Result<Dataset, ParseError>,
    ) -> bool {
        if generation != self.decode_generation {
            log::warn!("Discarding superseded decode of {}", file.name);
            return false;
        }
        self.loading = None;
        match parsed {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} with {} rows and columns {:?}",
                    file.name,
                    dataset.len(),
                    dataset.header
                );
                self.set_dataset(file, dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", file.name);
                self.status_message = Some(format!("Error reading {}: {e}", file.name));
            }
        }
        true
    }

    /// Ingest a newly loaded dataset. Selection and result start over.
    pub fn set_dataset(&mut self, file: SourceFile, dataset: Dataset) {
        self.file = Some(file);
        self.dataset = Some(dataset);
        self.selection = Selection::default();
        self.result = None;
        self.status_message = None;
    }

    // -- selection --

    pub fn set_method(&mut self, method: Method) {
        self.selection.method = Some(method);
    }

    pub fn set_primary(&mut self, index: usize) -> Result<(), ValidationError> {
        self.check_column(index)?;
        self.selection.primary = Some(index);
        Ok(())
    }

    pub fn set_secondary(&mut self, index: usize) -> Result<(), ValidationError> {
        self.check_column(index)?;
        self.selection.secondary = Some(index);
        Ok(())
    }

    /// Whether the "Y" picker is shown for the current method.
    pub fn secondary_visible(&self) -> bool {
        self.selection.method.map_or(true, Method::shows_secondary)
    }

    fn check_column(&self, index: usize) -> Result<(), ValidationError> {
        let dataset = self.dataset.as_ref().ok_or(ValidationError::NoDataset)?;
        check_column(dataset, index)
    }

    // -- submission --

    /// Local precondition check for "Run"; never involves the service.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let dataset = self.dataset.as_ref().ok_or(ValidationError::NoDataset)?;
        if self.submission.is_some() {
            return Err(ValidationError::SubmissionInFlight);
        }
        self.selection.validate(dataset)
    }

    /// Build the request for the current selection and mark it in flight.
    ///
    /// The method is captured here; later selection changes do not affect the
    /// label of the result this request produces.
    pub fn begin_submit(&mut self) -> Result<AnalysisRequest, ValidationError> {
        self.validate()?;
        let (Some(file), Some(dataset)) = (&self.file, &self.dataset) else {
            return Err(ValidationError::NoDataset);
        };
        let request = request::build(file, dataset, &self.selection)?;
        self.submission = Some(PendingSubmission {
            method: request.method,
            source_file: request.file_name.clone(),
        });
        self.status_message = None;
        log::info!("Submitting {} for {}", request.file_name, request.method);
        Ok(request)
    }

    /// Apply the outcome of the in-flight request. Only the result and the
    /// status message are touched.
    pub fn finish_submit(&mut self, outcome: Result<AnalysisResult, AnalysisError>) {
        if self.submission.take().is_none() {
            log::warn!("Received a response with no request in flight");
        }
        match outcome {
            Ok(result) => {
                log::info!("{} {}", result.label(), result.reference);
                self.result = Some(result);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Error processing request: {e}");
                let prefix = if e.is_service_failure() {
                    "Error processing file"
                } else {
                    "Request rejected"
                };
                self.status_message = Some(format!("{prefix}: {e}"));
            }
        }
    }
}
