use crate::{AgentProfile, AppState, Answer, CatalogState, Phase, Recommendations};

/// Shown instead of an empty explanation list.
pub const GENERAL_PURPOSE_REASON: &str = "General purpose coding agent";

const CARD_LANGUAGES: usize = 3;
const CARD_STRENGTHS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub image_qa: ImageQaView,
    pub recommender: RecommenderView,
    pub catalog: CatalogView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageQaView {
    pub phase: Phase,
    pub image: Option<ImageSummary>,
    pub question: String,
    pub can_submit: bool,
    pub error: Option<String>,
    pub answer: Option<Answer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSummary {
    pub file_name: String,
    pub content_type: String,
    pub byte_len: usize,
    /// A `data:` preview was generated for the selection.
    pub has_preview: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecommenderView {
    pub phase: Phase,
    pub task: String,
    pub can_submit: bool,
    pub error: Option<String>,
    pub result: Option<RecommendationsView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationsView {
    pub task: String,
    pub total_agents: usize,
    pub rows: Vec<AgentRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRowView {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub name: String,
    pub score: i32,
    pub match_level: MatchLevel,
    pub best_match: bool,
    pub reasons: Vec<String>,
    pub profile: AgentProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLevel {
    Excellent,
    Good,
    Partial,
}

impl MatchLevel {
    pub fn from_score(score: i32) -> Self {
        if score >= 6 {
            MatchLevel::Excellent
        } else if score >= 3 {
            MatchLevel::Good
        } else {
            MatchLevel::Partial
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchLevel::Excellent => "Excellent Match",
            MatchLevel::Good => "Good Match",
            MatchLevel::Partial => "Partial Match",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogView {
    /// Not loaded, failed, or covered by a recommendation result.
    #[default]
    Hidden,
    Loading,
    Overview(Vec<CatalogCardView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCardView {
    pub name: String,
    pub languages: Vec<String>,
    /// Languages beyond the ones listed.
    pub more_languages: usize,
    pub strengths: Vec<String>,
    pub requires_setup: bool,
    pub offline_support: bool,
    pub ideal_task_count: usize,
}

pub(crate) fn build(state: &AppState) -> AppViewModel {
    AppViewModel {
        image_qa: image_qa_view(state),
        recommender: recommender_view(state),
        catalog: catalog_view(state),
        dirty: state.is_dirty(),
    }
}

fn image_qa_view(state: &AppState) -> ImageQaView {
    let controller = state.image_qa();
    let view = controller.view_state();
    ImageQaView {
        phase: view.phase(),
        image: controller.image().map(|image| ImageSummary {
            file_name: image.file_name.clone(),
            content_type: image.content_type.clone(),
            byte_len: image.bytes.len(),
            has_preview: !image.preview_data_url.is_empty(),
        }),
        question: controller.question().to_string(),
        can_submit: controller.can_submit(),
        error: view.error().map(ToOwned::to_owned),
        answer: view.result().cloned(),
    }
}

fn recommender_view(state: &AppState) -> RecommenderView {
    let controller = state.recommender();
    let view = controller.view_state();
    RecommenderView {
        phase: view.phase(),
        task: controller.task().to_string(),
        can_submit: controller.can_submit(),
        error: view.error().map(ToOwned::to_owned),
        result: view.result().map(recommendations_view),
    }
}

fn recommendations_view(recommendations: &Recommendations) -> RecommendationsView {
    let rows = recommendations
        .agents
        .iter()
        .enumerate()
        .map(|(index, agent)| AgentRowView {
            rank: index + 1,
            name: agent.name.clone(),
            score: agent.score,
            match_level: MatchLevel::from_score(agent.score),
            best_match: index == 0,
            reasons: if agent.explanation.is_empty() {
                vec![GENERAL_PURPOSE_REASON.to_string()]
            } else {
                agent.explanation.clone()
            },
            profile: agent.profile.clone(),
        })
        .collect();

    RecommendationsView {
        task: recommendations.task.clone(),
        total_agents: recommendations.total_agents,
        rows,
    }
}

fn catalog_view(state: &AppState) -> CatalogView {
    if state.recommender().view_state().result().is_some() {
        return CatalogView::Hidden;
    }
    match state.catalog() {
        CatalogState::NotRequested | CatalogState::Unavailable(_) => CatalogView::Hidden,
        CatalogState::Loading => CatalogView::Loading,
        CatalogState::Loaded(catalog) => CatalogView::Overview(
            catalog
                .iter()
                .map(|(name, profile)| CatalogCardView {
                    name: name.clone(),
                    languages: profile.languages.iter().take(CARD_LANGUAGES).cloned().collect(),
                    more_languages: profile.languages.len().saturating_sub(CARD_LANGUAGES),
                    strengths: profile.strengths.iter().take(CARD_STRENGTHS).cloned().collect(),
                    requires_setup: profile.requires_setup,
                    offline_support: profile.offline_support,
                    ideal_task_count: profile.ideal_tasks.len(),
                })
                .collect(),
        ),
    }
}
