use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

use crate::{
    coordinator::{QueryCoordinator, UploadCoordinator},
    error::SessionError,
    gateway::DocumentGateway,
    selection::DocumentFile,
    session::{apply, SessionEvent, SessionState},
};

const STATE_CHANNEL_CAPACITY: usize = 64;

struct ControllerState {
    session: SessionState,
    /// Bumped by every reset so continuations started before it can be
    /// recognised and discarded.
    generation: u64,
}

/// Owns the session state. Coordinators compute outcomes; only this type
/// applies them.
pub struct SessionController {
    uploads: UploadCoordinator,
    queries: QueryCoordinator,
    inner: Mutex<ControllerState>,
    states: broadcast::Sender<SessionState>,
}

impl SessionController {
    pub fn new(gateway: Arc<dyn DocumentGateway>) -> Self {
        let (states, _) = broadcast::channel(STATE_CHANNEL_CAPACITY);
        Self {
            uploads: UploadCoordinator::new(Arc::clone(&gateway)),
            queries: QueryCoordinator::new(gateway),
            inner: Mutex::new(ControllerState {
                session: SessionState::default(),
                generation: 0,
            }),
            states,
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.lock().await.session.clone()
    }

    /// Receives a copy of the state after every applied event.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionState> {
        self.states.subscribe()
    }

    fn commit(&self, inner: &mut ControllerState, event: SessionEvent) {
        let current = std::mem::take(&mut inner.session);
        inner.session = apply(current, event);
        // No subscribers is fine.
        let _ = self.states.send(inner.session.clone());
    }

    pub async fn select_files(&self, files: Vec<DocumentFile>) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;
        if inner.session.phase().is_chatting() {
            return Err(SessionError::NotUploading);
        }
        // The in-flight upload owns the current selection.
        if inner.session.is_loading() {
            return Err(SessionError::Busy);
        }
        debug!(file_count = files.len(), "selection replaced");
        self.commit(&mut inner, SessionEvent::FilesSelected(files));
        Ok(())
    }

    pub async fn set_question(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;
        if !inner.session.phase().is_chatting() {
            return Err(SessionError::NotChatting);
        }
        self.commit(&mut inner, SessionEvent::QuestionEdited(text.into()));
        Ok(())
    }

    /// Uploads the current selection. An empty selection only sets the
    /// prompt status; transport failures end up in the status line.
    pub async fn upload(&self) -> Result<(), SessionError> {
        let (files, generation) = {
            let mut inner = self.inner.lock().await;
            if inner.session.phase().is_chatting() {
                return Err(SessionError::NotUploading);
            }
            if inner.session.is_loading() {
                return Err(SessionError::Busy);
            }
            if inner.session.selection().is_empty() {
                self.commit(&mut inner, SessionEvent::UploadRejectedEmpty);
                return Ok(());
            }
            let files = inner.session.selection().files().to_vec();
            self.commit(&mut inner, SessionEvent::UploadStarted);
            (files, inner.generation)
        };

        let outcome = self.uploads.upload(&files).await;

        let mut inner = self.inner.lock().await;
        if inner.generation == generation {
            self.commit(&mut inner, SessionEvent::UploadFinished(outcome));
            if inner.session.phase().is_chatting() {
                info!(document = %inner.session.selection().selected_name(), "chat session started");
            }
        } else {
            debug!("upload completed after reset; result dropped");
            self.commit(&mut inner, SessionEvent::CallAbandoned);
        }
        Ok(())
    }

    /// Checks that a query may start and raises the loading flag. Runs
    /// inside the same critical section that picked the question.
    fn begin_query(
        &self,
        inner: &mut ControllerState,
        filename: &str,
    ) -> Result<u64, SessionError> {
        if !inner.session.phase().is_chatting() {
            return Err(SessionError::NotChatting);
        }
        if inner.session.is_loading() {
            return Err(SessionError::Busy);
        }
        let selected = inner.session.selection().selected_name();
        if selected != filename {
            return Err(SessionError::FilenameMismatch {
                requested: filename.to_string(),
                selected: selected.to_string(),
            });
        }
        self.commit(inner, SessionEvent::QueryStarted);
        Ok(inner.generation)
    }

    async fn finish_query(&self, question: String, filename: String, generation: u64) {
        let outcome = self.queries.ask(&question, &filename).await;

        let mut inner = self.inner.lock().await;
        if inner.generation == generation {
            self.commit(&mut inner, SessionEvent::QueryFinished { question, outcome });
        } else {
            debug!("query completed after reset; result dropped");
            self.commit(&mut inner, SessionEvent::CallAbandoned);
        }
    }

    /// Asks `question` about `filename`, which must be the selected
    /// document. Both answers and failures are recorded in the transcript.
    pub async fn ask(
        &self,
        question: impl Into<String>,
        filename: impl Into<String>,
    ) -> Result<(), SessionError> {
        let question = question.into();
        let filename = filename.into();
        let generation = {
            let mut inner = self.inner.lock().await;
            self.begin_query(&mut inner, &filename)?
        };
        self.finish_query(question, filename, generation).await;
        Ok(())
    }

    /// Asks the pending question about the selected document. Edits made
    /// after this call starts do not change what is sent.
    pub async fn submit_question(&self) -> Result<(), SessionError> {
        let (question, filename, generation) = {
            let mut inner = self.inner.lock().await;
            let question = inner.session.pending_question().to_string();
            let filename = inner.session.selection().selected_name().to_string();
            let generation = self.begin_query(&mut inner, &filename)?;
            (question, filename, generation)
        };
        self.finish_query(question, filename, generation).await;
        Ok(())
    }

    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        self.commit(&mut inner, SessionEvent::Reset);
        info!("session reset");
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
