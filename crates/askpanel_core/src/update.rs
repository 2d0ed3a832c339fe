use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effect = match msg {
        Msg::Startup => state.request_catalog(),
        Msg::ImageSelected(image) => {
            state.select_image(Some(image));
            None
        }
        Msg::ImageCleared => {
            state.select_image(None);
            None
        }
        Msg::QuestionChanged(question) => {
            state.set_question(question);
            None
        }
        Msg::AnalyzeClicked => state.submit_image_question(),
        Msg::AnalysisFinished { ticket, outcome } => {
            state.finish_analysis(ticket, outcome);
            None
        }
        Msg::ImageQaResetClicked => {
            state.reset_image_qa();
            None
        }
        Msg::TaskChanged(task) => {
            state.set_task(task);
            None
        }
        Msg::RecommendClicked => state.submit_task(),
        Msg::RecommendationsFinished { ticket, outcome } => {
            state.finish_recommendations(ticket, outcome);
            None
        }
        Msg::RecommenderResetClicked => {
            state.reset_recommender();
            None
        }
        Msg::CatalogLoaded(result) => {
            state.apply_catalog(result);
            None
        }
        Msg::NoOp => None,
    };

    (state, effect.into_iter().collect())
}
