//! Line-oriented front end: parses user input and renders session state.

use std::{fmt::Write as _, path::PathBuf};

use client_core::{SessionState, Sender};
use shared::domain::SessionPhase;
use tokio::sync::broadcast;

pub const HELP: &str = "\
commands:
  :select <path>...   choose the documents to upload (replaces the selection)
  :upload             send the selection to the backend
  :new | :reset       drop the conversation and start a new upload
  :status             redraw the current screen
  :help               show this text
  :quit               leave
anything else is sent as a question once a document has been uploaded;
start a line with \"::\" to send a question that begins with ':'";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(Vec<PathBuf>),
    Upload,
    Reset,
    Status,
    Help,
    Quit,
    Question(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix(':') else {
        return Command::Question(line.to_string());
    };
    // "::" sends the rest of the line, leading colon included.
    if rest.starts_with(':') {
        return Command::Question(rest.to_string());
    }

    let mut words = rest.split_whitespace();
    match words.next().unwrap_or_default() {
        "select" | "s" => Command::Select(words.map(PathBuf::from).collect()),
        "upload" | "u" => Command::Upload,
        "new" | "reset" => Command::Reset,
        "status" => Command::Status,
        "help" | "h" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Question(line.to_string()),
    }
}

/// Redraws after every state the controller publishes, skipping frames that
/// would look identical to the previous one. Ends when the controller is
/// dropped.
pub async fn render_updates(
    mut states: broadcast::Receiver<SessionState>,
    mut emit: impl FnMut(String),
) {
    let mut last = String::new();
    loop {
        match states.recv().await {
            Ok(state) => {
                let frame = render(&state);
                if frame != last {
                    emit(frame.clone());
                    last = frame;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "renderer fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

pub fn render(state: &SessionState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", state.heading());

    match state.phase() {
        SessionPhase::Uploading => {
            let name = state.selection().selected_name();
            if !name.is_empty() {
                let _ = writeln!(out, "Selected file: {name}");
            }
            if state.is_loading() {
                let _ = writeln!(out, "(uploading...)");
            }
            if !state.status().is_empty() {
                let _ = writeln!(out, "{}", state.status());
            }
        }
        SessionPhase::Chatting => {
            for entry in state.transcript().entries() {
                let label = match entry.sender() {
                    Sender::User => "you>",
                    Sender::Bot => "bot>",
                };
                let _ = writeln!(out, "{label} {}", entry.text());
            }
            if state.is_loading() {
                let _ = writeln!(out, "(waiting for answer...)");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use client_core::{
        apply, DocumentFile, DocumentGateway, GatewayError, QueryOutcome, SessionController,
        SessionError, SessionEvent, UploadOutcome,
    };
    use shared::protocol::{QueryRequest, QueryResponse, UploadResponse};
    use tokio::sync::{mpsc, oneshot};

    use super::*;

    /// Upload parks until released; queries always fail.
    struct HeldUploadGateway {
        release: Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl DocumentGateway for HeldUploadGateway {
        async fn submit_upload(
            &self,
            _files: &[DocumentFile],
        ) -> Result<UploadResponse, GatewayError> {
            let held = self.release.lock().expect("release").take();
            if let Some(rx) = held {
                let _ = rx.await;
            }
            Ok(UploadResponse {
                message: "Indexed 12 pages".to_string(),
            })
        }

        async fn submit_query(
            &self,
            _request: &QueryRequest,
        ) -> Result<QueryResponse, GatewayError> {
            Err(GatewayError::Transport("not scripted".to_string()))
        }
    }

    fn chatting() -> SessionState {
        let file = DocumentFile::new("report.pdf", None, Vec::new()).expect("document");
        [
            SessionEvent::FilesSelected(vec![file]),
            SessionEvent::UploadStarted,
            SessionEvent::UploadFinished(UploadOutcome::Accepted {
                message: "Indexed 12 pages".to_string(),
            }),
            SessionEvent::QueryStarted,
            SessionEvent::QueryFinished {
                question: "What is the total?".to_string(),
                outcome: QueryOutcome::Answered {
                    answer: "$4,200".to_string(),
                },
            },
        ]
        .into_iter()
        .fold(SessionState::default(), apply)
    }

    #[test]
    fn parses_commands_and_questions() {
        assert_eq!(
            parse_command(":select a.pdf b.pdf"),
            Command::Select(vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")])
        );
        assert_eq!(parse_command(":upload"), Command::Upload);
        assert_eq!(parse_command(":new"), Command::Reset);
        assert_eq!(parse_command(":q"), Command::Quit);
        assert_eq!(parse_command(":help"), Command::Help);
        assert_eq!(
            parse_command("What is the total?\n"),
            Command::Question("What is the total?".to_string())
        );
        assert_eq!(parse_command(""), Command::Question(String::new()));
    }

    #[test]
    fn colon_questions_are_not_swallowed() {
        assert_eq!(
            parse_command(":-) what is this?"),
            Command::Question(":-) what is this?".to_string())
        );
        assert_eq!(
            parse_command("::upload means what?"),
            Command::Question(":upload means what?".to_string())
        );
    }

    #[test]
    fn renders_upload_screen() {
        let text = render(&SessionState::default());
        assert_eq!(text, "== Upload PDF ==\n");
    }

    #[test]
    fn renders_transcript_in_order() {
        let text = render(&chatting());
        assert_eq!(
            text,
            "== Query ==\nyou> What is the total?\nbot> $4,200\n"
        );
    }

    #[tokio::test]
    async fn loading_line_is_drawn_while_upload_is_in_flight() {
        let (release, held) = oneshot::channel();
        let controller = Arc::new(SessionController::new(Arc::new(HeldUploadGateway {
            release: Mutex::new(Some(held)),
        })));
        let (frames_tx, mut frames) = mpsc::unbounded_channel();
        let renderer = tokio::spawn(render_updates(controller.subscribe(), move |frame| {
            let _ = frames_tx.send(frame);
        }));

        let file = DocumentFile::new("report.pdf", None, b"%PDF".to_vec()).expect("document");
        controller.select_files(vec![file]).await.expect("select");
        let upload = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.upload().await })
        };

        let loading = loop {
            let frame = frames.recv().await.expect("frame");
            if frame.contains("(uploading...)") {
                break frame;
            }
        };
        assert_eq!(
            loading,
            "== Upload PDF ==\nSelected file: report.pdf\n(uploading...)\n"
        );
        assert_eq!(controller.upload().await, Err(SessionError::Busy));

        release.send(()).expect("release");
        upload.await.expect("join").expect("upload");

        let chat = frames.recv().await.expect("frame");
        assert_eq!(chat, "== Query ==\n");
        renderer.abort();
    }
}
