use shared::{domain::Sender, error::FailureDetail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    sender: Sender,
    text: String,
    failure: Option<FailureDetail>,
}

impl TranscriptEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            failure: None,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            failure: None,
        }
    }

    /// Bot entry standing in for an answer that could not be retrieved.
    pub fn bot_failure(text: impl Into<String>, failure: FailureDetail) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            failure: Some(failure),
        }
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn failure(&self) -> Option<&FailureDetail> {
        self.failure.as_ref()
    }
}

/// Append-only log of question/answer exchanges, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Appends a user question and its reply as one contiguous pair.
    pub fn push_exchange(&mut self, question: impl Into<String>, reply: TranscriptEntry) {
        debug_assert_eq!(reply.sender(), Sender::Bot);
        self.entries.reserve(2);
        self.entries.push(TranscriptEntry::user(question));
        self.entries.push(reply);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
