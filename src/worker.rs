use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use eframe::egui;

use crate::analysis::client::AnalysisClient;
use crate::analysis::result::AnalysisResult;
use crate::data::loader;
use crate::data::model::{Dataset, SourceFile};
use crate::error::{AnalysisError, ParseError};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Background completions
// ---------------------------------------------------------------------------

/// A finished background operation, delivered to the UI thread.
#[derive(Debug)]
pub enum Completion {
    Decoded {
        generation: u64,
        file: SourceFile,
        parsed: Result<Dataset, ParseError>,
    },
    Submitted(Result<AnalysisResult, AnalysisError>),
}

/// Runs file decoding and service requests off the UI thread.
///
/// At most one decode matters at a time (newer ones supersede older ones by
/// generation) and at most one submission runs, enforced by [`AppState`].
pub struct Worker {
    client: AnalysisClient,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    repaint: Option<egui::Context>,
}

impl Worker {
    pub fn new(client: AnalysisClient, repaint: Option<egui::Context>) -> Self {
        let (tx, rx) = channel();
        Worker {
            client,
            tx,
            rx,
            repaint,
        }
    }

    pub fn client(&self) -> &AnalysisClient {
        &self.client
    }

    /// Start decoding `file` in the background.
    pub fn decode(&self, state: &mut AppState, file: SourceFile) {
        let generation = state.begin_decode(&file.name);
        let tx = self.tx.clone();
        let repaint = self.repaint.clone();
        thread::spawn(move || {
            let parsed = loader::parse(&file.bytes, Some(&file.name));
            // The receiver only disappears when the app is shutting down.
            let _ = tx.send(Completion::Decoded {
                generation,
                file,
                parsed,
            });
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    /// Validate the selection and, if ready, post it to the service.
    pub fn submit(&self, state: &mut AppState) {
        let request = match state.begin_submit() {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Run rejected: {e}");
                state.status_message = Some(format!("Please select a valid file, column(s), and method: {e}"));
                return;
            }
        };

        let client = self.client.clone();
        let tx = self.tx.clone();
        let repaint = self.repaint.clone();
        thread::spawn(move || {
            let outcome = client.submit(request);
            let _ = tx.send(Completion::Submitted(outcome));
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    /// Apply every completion that has arrived since the last frame.
    pub fn poll(&self, state: &mut AppState) {
        while let Ok(completion) = self.rx.try_recv() {
            apply(state, completion);
        }
    }

    #[cfg(test)]
    fn wait(&self, state: &mut AppState) {
        let completion = self
            .rx
            .recv_timeout(std::time::Duration::from_secs(30))
            .expect("background task did not finish");
        apply(state, completion);
    }
}

fn apply(state: &mut AppState, completion: Completion) {
    match completion {
        Completion::Decoded {
            generation,
            file,
            parsed,
        } => {
            state.finish_decode(generation, file, parsed);
        }
        Completion::Submitted(outcome) => state.finish_submit(outcome),
    }
}
