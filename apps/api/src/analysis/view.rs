//! Analysis View Controller: the three-view flow around one analysis call.
//!
//! ```text
//! Input --submit--> Loading --succeed--> Dashboard --reset--> Input
//!                      \--fail--> Input (with notice)
//! ```
//!
//! At most one submission is outstanding. Transitions are synchronous and
//! either apply fully or leave the controller untouched.

use thiserror::Error;

use crate::analysis::models::AnalysisResult;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    #[default]
    Input,
    Loading,
    Dashboard(AnalysisResult),
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Input => "input",
            ViewState::Loading => "loading",
            ViewState::Dashboard(_) => "dashboard",
        }
    }
}

/// Proof of the outstanding submission. Consumed when it is resolved.
#[derive(Debug, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("An analysis is already in progress")]
    AlreadyLoading,

    #[error("Cannot {action} from the {from} view")]
    NotAllowed {
        action: &'static str,
        from: &'static str,
    },

    #[error("Submission is no longer outstanding")]
    StaleTicket,
}

#[derive(Debug, Default)]
pub struct AnalysisViewController {
    state: ViewState,
    notice: Option<String>,
    outstanding: Option<u64>,
    issued: u64,
}

impl AnalysisViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The error surfaced by the last failed submission, if the user has not
    /// submitted again since.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_submit_ready(&self) -> bool {
        matches!(self.state, ViewState::Input)
    }

    pub fn submit(&mut self) -> Result<SubmissionTicket, TransitionError> {
        match self.state {
            ViewState::Input => {
                self.issued += 1;
                self.outstanding = Some(self.issued);
                self.notice = None;
                self.state = ViewState::Loading;
                Ok(SubmissionTicket(self.issued))
            }
            ViewState::Loading => Err(TransitionError::AlreadyLoading),
            ViewState::Dashboard(_) => Err(self.not_allowed("submit")),
        }
    }

    pub fn succeed(
        &mut self,
        ticket: SubmissionTicket,
        result: AnalysisResult,
    ) -> Result<(), TransitionError> {
        self.resolve(ticket)?;
        self.state = ViewState::Dashboard(result);
        Ok(())
    }

    pub fn fail(
        &mut self,
        ticket: SubmissionTicket,
        message: impl Into<String>,
    ) -> Result<(), TransitionError> {
        self.resolve(ticket)?;
        self.state = ViewState::Input;
        self.notice = Some(message.into());
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), TransitionError> {
        match self.state {
            ViewState::Dashboard(_) => {
                self.state = ViewState::Input;
                self.notice = None;
                Ok(())
            }
            _ => Err(self.not_allowed("reset")),
        }
    }

    fn resolve(&mut self, ticket: SubmissionTicket) -> Result<(), TransitionError> {
        if !matches!(self.state, ViewState::Loading) {
            return Err(self.not_allowed("complete a submission"));
        }
        if self.outstanding != Some(ticket.0) {
            return Err(TransitionError::StaleTicket);
        }
        self.outstanding = None;
        Ok(())
    }

    fn not_allowed(&self, action: &'static str) -> TransitionError {
        TransitionError::NotAllowed {
            action,
            from: self.state.name(),
        }
    }
}
