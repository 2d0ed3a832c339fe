use crate::{RequestTicket, SelectedImage};

/// IO requested by [`crate::update`]; the front end performs it and reports
/// back with the matching `Msg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Upload `image` with `question`; answer with `Msg::AnalysisFinished`.
    AnalyzeImage {
        ticket: RequestTicket,
        image: SelectedImage,
        question: String,
    },
    /// Ask for agents matching `task`; answer with `Msg::RecommendationsFinished`.
    Recommend { ticket: RequestTicket, task: String },
    /// Fetch the agent catalog; answer with `Msg::CatalogLoaded`.
    LoadAgentCatalog,
}
