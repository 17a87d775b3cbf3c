//! Session state and the pure transition function that drives it.

use shared::domain::SessionPhase;

use crate::{
    coordinator::{QueryOutcome, UploadOutcome},
    selection::{DocumentFile, SelectionState},
    transcript::{Transcript, TranscriptEntry},
};

pub const SELECT_FILE_PROMPT: &str = "Please select a file before uploading.";
pub const UPLOAD_ERROR_TEXT: &str = "Error uploading files. Please try again.";
pub const QUERY_ERROR_TEXT: &str = "Error retrieving answer. Please try again.";

const UPLOAD_HEADING: &str = "Upload PDF";
const CHAT_HEADING: &str = "Query";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    selection: SelectionState,
    pending_question: String,
    transcript: Transcript,
    phase: SessionPhase,
    loading: bool,
    status: String,
}

impl SessionState {
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn pending_question(&self) -> &str {
        &self.pending_question
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn can_upload(&self) -> bool {
        self.phase == SessionPhase::Uploading && !self.loading && !self.selection.is_empty()
    }

    pub fn can_ask(&self) -> bool {
        self.phase == SessionPhase::Chatting && !self.loading
    }

    pub fn heading(&self) -> &'static str {
        match self.phase {
            SessionPhase::Uploading => UPLOAD_HEADING,
            SessionPhase::Chatting => CHAT_HEADING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    FilesSelected(Vec<DocumentFile>),
    QuestionEdited(String),
    UploadRejectedEmpty,
    UploadStarted,
    UploadFinished(UploadOutcome),
    QueryStarted,
    QueryFinished {
        question: String,
        outcome: QueryOutcome,
    },
    /// A round-trip that outlived a reset came back; only the loading flag
    /// is released.
    CallAbandoned,
    Reset,
}

/// Applies one event. Events that make no sense in the current phase leave
/// the state untouched; the controller rejects those before they get here.
pub fn apply(mut state: SessionState, event: SessionEvent) -> SessionState {
    match event {
        SessionEvent::FilesSelected(files) => {
            if state.phase == SessionPhase::Uploading && !state.loading {
                state.selection.select(files);
            }
        }
        SessionEvent::QuestionEdited(text) => {
            if state.phase == SessionPhase::Chatting {
                state.pending_question = text;
            }
        }
        SessionEvent::UploadRejectedEmpty => {
            state.status = SELECT_FILE_PROMPT.to_string();
        }
        SessionEvent::UploadStarted | SessionEvent::QueryStarted => {
            state.loading = true;
        }
        SessionEvent::UploadFinished(outcome) => {
            match outcome {
                UploadOutcome::Accepted { message } => {
                    state.status = message;
                    state.transcript.clear();
                    state.phase = SessionPhase::Chatting;
                }
                UploadOutcome::Failed { .. } => {
                    state.status = UPLOAD_ERROR_TEXT.to_string();
                }
            }
            state.loading = false;
        }
        SessionEvent::QueryFinished { question, outcome } => {
            if state.phase == SessionPhase::Chatting {
                let reply = match outcome {
                    QueryOutcome::Answered { answer } => TranscriptEntry::bot(answer),
                    QueryOutcome::Failed { detail } => {
                        TranscriptEntry::bot_failure(QUERY_ERROR_TEXT, detail)
                    }
                };
                state.transcript.push_exchange(question, reply);
                state.pending_question.clear();
            }
            state.loading = false;
        }
        SessionEvent::CallAbandoned => {
            state.loading = false;
        }
        SessionEvent::Reset => {
            state.selection.clear();
            state.pending_question.clear();
            state.transcript.clear();
            state.status.clear();
            state.phase = SessionPhase::Uploading;
        }
    }
    state
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
