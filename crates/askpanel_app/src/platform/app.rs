use std::time::{Duration, Instant};

use askpanel_core::{update, AppState, AppViewModel, Msg};

use super::effects::EffectRunner;

/// Upper bound for one blocking wait on the engine, so callers can interleave
/// other input.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Owns the application state and feeds every message through `update`,
/// handing the resulting effects to the engine.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    pub fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    /// Applies at most one engine message, waiting up to `timeout` for it.
    pub fn pump(&mut self, timeout: Duration) -> bool {
        match self.runner.next_msg(timeout) {
            Some(msg) => {
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    /// Pumps engine messages until `done` holds or `timeout` elapses.
    pub fn wait_until(&mut self, timeout: Duration, done: impl Fn(&AppState) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while !done(&self.state) {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            self.pump((deadline - now).min(POLL_INTERVAL));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use askpanel_core::{CatalogState, Phase, SelectedImage};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::platform::test_support::scripted_session;

    fn session() -> Session {
        scripted_session(Duration::ZERO)
    }

    fn image(name: &str) -> SelectedImage {
        SelectedImage {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes: Arc::from(vec![1u8, 2, 3]),
            preview_data_url: "data:image/png;base64,AQID".to_string(),
        }
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn analysis_round_trip_echoes_question() {
        let mut session = session();
        session.dispatch(Msg::ImageSelected(image("cat.png")));
        session.dispatch(Msg::QuestionChanged("What animal?".to_string()));
        session.dispatch(Msg::AnalyzeClicked);
        assert_eq!(session.view().image_qa.phase, Phase::Pending);

        assert!(session.wait_until(WAIT, |state| !state.image_qa().view_state().is_pending()));

        let view = session.view().image_qa;
        assert_eq!(view.phase, Phase::Success);
        let answer = view.answer.unwrap();
        assert_eq!(answer.answer, "A cat on a sofa.");
        assert_eq!(answer.question, "What animal?");
    }

    #[test]
    fn rejected_analysis_shows_backend_error() {
        let mut session = session();
        session.dispatch(Msg::ImageSelected(image("broken.png")));
        session.dispatch(Msg::QuestionChanged("What?".to_string()));
        session.dispatch(Msg::AnalyzeClicked);

        assert!(session.wait_until(WAIT, |state| !state.image_qa().view_state().is_pending()));

        let view = session.view().image_qa;
        assert_eq!(view.phase, Phase::Failure);
        assert_eq!(view.error.as_deref(), Some("Could not decode image"));
    }

    #[test]
    fn startup_loads_catalog_and_recommendation_hides_it() {
        let mut session = session();
        session.dispatch(Msg::Startup);
        let loaded = |state: &AppState| matches!(state.catalog(), CatalogState::Loaded(_));
        assert!(session.wait_until(WAIT, loaded));
        assert!(matches!(
            session.view().catalog,
            askpanel_core::CatalogView::Overview(ref cards) if cards.len() == 2
        ));

        session.dispatch(Msg::TaskChanged("refactor a Rust crate".to_string()));
        session.dispatch(Msg::RecommendClicked);
        assert!(session.wait_until(WAIT, |state| !state.has_pending_call()));

        let view = session.view();
        assert_eq!(view.recommender.phase, Phase::Success);
        assert_eq!(view.catalog, askpanel_core::CatalogView::Hidden);
    }

    #[test]
    fn wait_until_gives_up_without_events() {
        let mut session = session();
        let pending = |state: &AppState| state.has_pending_call();
        assert!(!session.wait_until(Duration::from_millis(50), pending));
    }
}
