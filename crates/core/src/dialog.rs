//! Modal prompts used to collect insertion parameters.
//!
//! A [`ModalDialog`] moves through `Closed -> Collecting -> Confirmed | Cancelled`.
//! The host renders the state and feeds input, while the insertion flow
//! awaits the reply through the [`Prompter`] trait.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::{self, Future};
use std::rc::Rc;
use tokio::sync::oneshot;

/// How a prompt was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Confirmed(String),
    Cancelled,
}

impl PromptOutcome {
    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::Confirmed(text) => Some(text),
            Self::Cancelled => None,
        }
    }
}

/// Something that can ask the user for a line of text.
pub trait Prompter {
    fn prompt(&self, message: &str) -> impl Future<Output = PromptOutcome>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Collecting {
        message: String,
        input: String,
    },
    Confirmed(String),
    Cancelled,
}

#[derive(Debug, Default)]
struct DialogInner {
    state: DialogState,
    reply: Option<oneshot::Sender<PromptOutcome>>,
}

impl DialogInner {
    fn resolve(&mut self, outcome: PromptOutcome) {
        if let Some(reply) = self.reply.take() {
            // The awaiting flow may have been dropped already.
            let _ = reply.send(outcome);
        }
    }
}

/// Handle to a single modal text prompt shared between host and flow.
#[derive(Debug, Clone, Default)]
pub struct ModalDialog {
    inner: Rc<RefCell<DialogInner>>,
}

impl ModalDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DialogState {
        self.inner.borrow().state.clone()
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self.inner.borrow().state, DialogState::Collecting { .. })
    }

    /// Show a prompt and return the pending reply.
    ///
    /// A prompt that is still open is cancelled first.
    pub fn open(&self, message: impl Into<String>) -> PromptReply {
        let (tx, rx) = oneshot::channel();
        let mut inner = self.inner.borrow_mut();
        inner.resolve(PromptOutcome::Cancelled);
        inner.state = DialogState::Collecting {
            message: message.into(),
            input: String::new(),
        };
        inner.reply = Some(tx);
        PromptReply { rx }
    }

    /// Replace the typed input. Returns false when no prompt is open.
    pub fn set_input(&self, text: impl Into<String>) -> bool {
        match &mut self.inner.borrow_mut().state {
            DialogState::Collecting { input, .. } => {
                *input = text.into();
                true
            }
            _ => false,
        }
    }

    /// Accept the current input. Returns false when no prompt is open.
    pub fn confirm(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        let input = match &inner.state {
            DialogState::Collecting { input, .. } => input.clone(),
            _ => return false,
        };
        inner.state = DialogState::Confirmed(input.clone());
        inner.resolve(PromptOutcome::Confirmed(input));
        true
    }

    /// Dismiss the prompt. Returns false when no prompt is open.
    pub fn cancel(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        if !matches!(inner.state, DialogState::Collecting { .. }) {
            return false;
        }
        inner.state = DialogState::Cancelled;
        inner.resolve(PromptOutcome::Cancelled);
        true
    }

    /// Hide the dialog, cancelling an open prompt.
    pub fn close(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.resolve(PromptOutcome::Cancelled);
        inner.state = DialogState::Closed;
    }
}

impl Prompter for ModalDialog {
    fn prompt(&self, message: &str) -> impl Future<Output = PromptOutcome> {
        self.open(message).recv()
    }
}

/// The answer to an open prompt, resolved on confirm or cancel.
#[derive(Debug)]
pub struct PromptReply {
    rx: oneshot::Receiver<PromptOutcome>,
}

impl PromptReply {
    pub async fn recv(self) -> PromptOutcome {
        self.rx.await.unwrap_or(PromptOutcome::Cancelled)
    }
}

/// Answers prompts from a prepared queue; cancels once it runs dry.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<PromptOutcome>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_outcomes(
            answers
                .into_iter()
                .map(|a| PromptOutcome::Confirmed(a.into())),
        )
    }

    pub fn from_outcomes(outcomes: impl IntoIterator<Item = PromptOutcome>) -> Self {
        Self {
            answers: RefCell::new(outcomes.into_iter().collect()),
            asked: RefCell::default(),
        }
    }

    /// Messages of the prompts shown so far.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&self, message: &str) -> impl Future<Output = PromptOutcome> {
        self.asked.borrow_mut().push(message.to_string());
        let outcome = self
            .answers
            .borrow_mut()
            .pop_front()
            .unwrap_or(PromptOutcome::Cancelled);
        future::ready(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_confirm_resolves_reply() {
        let dialog = ModalDialog::new();
        assert_eq!(dialog.state(), DialogState::Closed);

        let reply = dialog.open("Enter number of rows (1-10):");
        assert!(dialog.is_collecting());
        assert!(dialog.set_input("4"));
        assert!(dialog.confirm());

        assert_eq!(dialog.state(), DialogState::Confirmed("4".into()));
        assert_eq!(reply.recv().await, PromptOutcome::Confirmed("4".into()));
    }

    #[tokio::test]
    async fn test_cancel_resolves_reply() {
        let dialog = ModalDialog::new();
        let reply = dialog.open("Select chart type");
        dialog.set_input("2");
        assert!(dialog.cancel());

        assert_eq!(dialog.state(), DialogState::Cancelled);
        assert_eq!(reply.recv().await, PromptOutcome::Cancelled);
    }

    #[test]
    fn test_transitions_need_open_prompt() {
        let dialog = ModalDialog::new();
        assert!(!dialog.set_input("x"));
        assert!(!dialog.confirm());
        assert!(!dialog.cancel());
        assert_eq!(dialog.state(), DialogState::Closed);
    }

    #[tokio::test]
    async fn test_reopen_cancels_previous_prompt() {
        let dialog = ModalDialog::new();
        let first = dialog.open("first");
        let second = dialog.open("second");
        dialog.set_input("ok");
        dialog.confirm();

        assert_eq!(first.recv().await, PromptOutcome::Cancelled);
        assert_eq!(second.recv().await, PromptOutcome::Confirmed("ok".into()));
    }

    #[tokio::test]
    async fn test_close_and_drop_cancel() {
        let dialog = ModalDialog::new();
        let reply = dialog.open("rows");
        dialog.close();
        assert_eq!(dialog.state(), DialogState::Closed);
        assert_eq!(reply.recv().await, PromptOutcome::Cancelled);

        let reply = dialog.open("rows");
        drop(dialog);
        assert_eq!(reply.recv().await, PromptOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_prompter_trait_on_dialog() {
        let dialog = ModalDialog::new();
        let pending = dialog.prompt("cols");
        dialog.set_input("7");
        dialog.confirm();
        assert_eq!(pending.await, PromptOutcome::Confirmed("7".into()));
    }

    #[tokio::test]
    async fn test_scripted_prompter() {
        let prompter = ScriptedPrompter::new(["5"]);
        assert_eq!(prompter.prompt("a").await.answer(), Some("5"));
        assert_eq!(prompter.prompt("b").await, PromptOutcome::Cancelled);
        assert_eq!(prompter.asked(), vec!["a", "b"]);
    }
}
