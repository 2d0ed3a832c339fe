use crate::controller::Submit;
use crate::view_model::{self, AppViewModel};
use crate::view_state::TicketCounter;
use crate::{
    AgentCatalog, AnalysisReply, CallFailure, Effect, ImageQaController, Recommendations,
    RecommenderController, RequestTicket, SelectedImage,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogState {
    #[default]
    NotRequested,
    Loading,
    Loaded(AgentCatalog),
    /// Load failed; the text is kept for diagnostics and never shown as an error.
    Unavailable(String),
}

/// Both controllers plus the agent catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    image_qa: ImageQaController,
    recommender: RecommenderController,
    catalog: CatalogState,
    tickets: TicketCounter,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        view_model::build(self)
    }

    pub fn image_qa(&self) -> &ImageQaController {
        &self.image_qa
    }

    pub fn recommender(&self) -> &RecommenderController {
        &self.recommender
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// True while any backend call started by a controller is outstanding.
    pub fn has_pending_call(&self) -> bool {
        self.image_qa.view_state().is_pending() || self.recommender.view_state().is_pending()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn request_catalog(&mut self) -> Option<Effect> {
        if self.catalog != CatalogState::NotRequested {
            return None;
        }
        self.catalog = CatalogState::Loading;
        self.mark_dirty();
        Some(Effect::LoadAgentCatalog)
    }

    pub(crate) fn apply_catalog(&mut self, result: Result<AgentCatalog, String>) {
        self.catalog = match result {
            Ok(catalog) => CatalogState::Loaded(catalog),
            Err(reason) => CatalogState::Unavailable(reason),
        };
        self.mark_dirty();
    }

    pub(crate) fn select_image(&mut self, image: Option<SelectedImage>) {
        self.image_qa.select_image(image);
        self.mark_dirty();
    }

    pub(crate) fn set_question(&mut self, question: String) {
        if self.image_qa.question() != question {
            self.image_qa.set_question(question);
            self.mark_dirty();
        }
    }

    pub(crate) fn submit_image_question(&mut self) -> Option<Effect> {
        let submit = self.image_qa.submit(&mut self.tickets);
        self.after_submit(submit)
    }

    pub(crate) fn finish_analysis(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<AnalysisReply, CallFailure>,
    ) {
        if self.image_qa.complete(ticket, outcome) {
            self.mark_dirty();
        }
    }

    pub(crate) fn reset_image_qa(&mut self) {
        self.image_qa.reset();
        self.mark_dirty();
    }

    pub(crate) fn set_task(&mut self, task: String) {
        if self.recommender.task() != task {
            self.recommender.set_task(task);
            self.mark_dirty();
        }
    }

    pub(crate) fn submit_task(&mut self) -> Option<Effect> {
        let submit = self.recommender.submit(&mut self.tickets);
        self.after_submit(submit)
    }

    pub(crate) fn finish_recommendations(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<Recommendations, CallFailure>,
    ) {
        if self.recommender.complete(ticket, outcome) {
            self.mark_dirty();
        }
    }

    pub(crate) fn reset_recommender(&mut self) {
        self.recommender.reset();
        self.mark_dirty();
    }

    fn after_submit(&mut self, submit: Submit) -> Option<Effect> {
        match submit {
            Submit::Ignored => None,
            Submit::Rejected => {
                self.mark_dirty();
                None
            }
            Submit::Started(effect) => {
                self.mark_dirty();
                Some(effect)
            }
        }
    }
}
