use std::sync::Arc;

use crate::view_state::TicketCounter;
use crate::{
    AnalysisReply, Answer, CallFailure, Effect, Recommendations, RequestTicket, ViewState,
    IMAGE_QA_MESSAGES, RECOMMENDER_MESSAGES,
};

/// An image picked for upload, with its client-side preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Arc<[u8]>,
    /// `data:<mime>;base64,...` rendering of `bytes`.
    pub preview_data_url: String,
}

/// Result of a submit attempt on a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Submit {
    /// A call is already in flight; nothing changed.
    Ignored,
    /// Required input missing; the controller now shows the validation message.
    Rejected,
    /// The controller is pending and the effect performs the call.
    Started(Effect),
}

/// Controller for the image question-answering backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageQaController {
    image: Option<SelectedImage>,
    question: String,
    /// Question sent with the call in flight, used when the backend echoes none.
    sent_question: Option<String>,
    view: ViewState<Answer>,
}

impl ImageQaController {
    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn view_state(&self) -> &ViewState<Answer> {
        &self.view
    }

    /// True when the submit trigger should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.view.is_pending() && self.has_required_input()
    }

    fn has_required_input(&self) -> bool {
        self.image.is_some() && !self.question.trim().is_empty()
    }

    /// Replaces (or clears) the selected image. A new selection invalidates a
    /// shown result or error, but never interrupts a pending call.
    pub(crate) fn select_image(&mut self, image: Option<SelectedImage>) {
        self.image = image;
        if !self.view.is_pending() {
            self.view = ViewState::Idle;
        }
    }

    pub(crate) fn set_question(&mut self, question: String) {
        self.question = question;
    }

    pub(crate) fn submit(&mut self, tickets: &mut TicketCounter) -> Submit {
        if self.view.is_pending() {
            return Submit::Ignored;
        }
        let image = match &self.image {
            Some(image) if self.has_required_input() => image.clone(),
            _ => {
                self.view = ViewState::Failure(IMAGE_QA_MESSAGES.validation.to_string());
                return Submit::Rejected;
            }
        };

        let ticket = tickets.next();
        self.view = ViewState::Pending { ticket };
        self.sent_question = Some(self.question.clone());
        Submit::Started(Effect::AnalyzeImage {
            ticket,
            image,
            question: self.question.clone(),
        })
    }

    /// Applies a completion. Returns false when `ticket` is not the call in
    /// flight, in which case nothing changes.
    pub(crate) fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<AnalysisReply, CallFailure>,
    ) -> bool {
        if self.view.pending_ticket() != Some(ticket) {
            return false;
        }
        let sent_question = self.sent_question.take().unwrap_or_default();
        self.view = match outcome {
            Ok(reply) => ViewState::Success(Answer {
                answer: reply.answer,
                question: reply
                    .question
                    .filter(|echoed| !echoed.is_empty())
                    .unwrap_or(sent_question),
            }),
            Err(failure) => ViewState::Failure(IMAGE_QA_MESSAGES.describe(&failure)),
        };
        true
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Controller for the coding-agent recommender backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecommenderController {
    task: String,
    view: ViewState<Recommendations>,
}

impl RecommenderController {
    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn view_state(&self) -> &ViewState<Recommendations> {
        &self.view
    }

    pub fn can_submit(&self) -> bool {
        !self.view.is_pending() && !self.task.trim().is_empty()
    }

    pub(crate) fn set_task(&mut self, task: String) {
        self.task = task;
    }

    pub(crate) fn submit(&mut self, tickets: &mut TicketCounter) -> Submit {
        if self.view.is_pending() {
            return Submit::Ignored;
        }
        let task = self.task.trim();
        if task.is_empty() {
            self.view = ViewState::Failure(RECOMMENDER_MESSAGES.validation.to_string());
            return Submit::Rejected;
        }

        let ticket = tickets.next();
        let task = task.to_string();
        self.view = ViewState::Pending { ticket };
        Submit::Started(Effect::Recommend { ticket, task })
    }

    pub(crate) fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<Recommendations, CallFailure>,
    ) -> bool {
        if self.view.pending_ticket() != Some(ticket) {
            return false;
        }
        self.view = match outcome {
            Ok(recommendations) => ViewState::Success(recommendations),
            Err(failure) => ViewState::Failure(RECOMMENDER_MESSAGES.describe(&failure)),
        };
        true
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
