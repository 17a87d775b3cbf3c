//! Client-side core of the document Q&A session: file selection, the
//! upload/chat state machine, and the gateway to the remote backend.

pub mod controller;
pub mod coordinator;
pub mod error;
pub mod gateway;
pub mod selection;
pub mod session;
pub mod transcript;

pub use controller::SessionController;
pub use coordinator::{QueryCoordinator, QueryOutcome, UploadCoordinator, UploadOutcome};
pub use error::{DocumentFileError, GatewayError, SessionError};
pub use gateway::{DocumentGateway, HttpGateway};
pub use selection::{DocumentFile, SelectionState};
pub use session::{
    apply, SessionEvent, SessionState, QUERY_ERROR_TEXT, SELECT_FILE_PROMPT, UPLOAD_ERROR_TEXT,
};
pub use shared::domain::{Sender, SessionPhase};
pub use transcript::{Transcript, TranscriptEntry};
