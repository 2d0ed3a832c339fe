use std::time::Duration;

use askpanel_core::{
    AgentCatalog, AgentProfile, AnalysisReply, CallFailure, Effect, Msg, RankedAgent,
    Recommendations,
};
use askpanel_engine::{
    AgentInfo, BackendError, BackendSettings, EngineError, EngineEvent, EngineHandle, ImageUpload,
    RecommendationSet,
};
use panel_logging::{panel_debug, panel_info, panel_warn};

/// Executes core effects on the engine and turns engine events back into
/// core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: BackendSettings) -> Result<Self, EngineError> {
        Ok(Self::with_engine(EngineHandle::new(settings)?))
    }

    pub fn with_engine(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::AnalyzeImage {
                    ticket,
                    image,
                    question,
                } => {
                    panel_info!(
                        "AnalyzeImage ticket={} file={} bytes={} question_len={}",
                        ticket,
                        image.file_name,
                        image.bytes.len(),
                        question.len()
                    );
                    let upload = ImageUpload {
                        file_name: image.file_name,
                        content_type: image.content_type,
                        bytes: image.bytes,
                    };
                    self.engine.analyze(ticket, upload, question);
                }
                Effect::Recommend { ticket, task } => {
                    panel_info!("Recommend ticket={} task_len={}", ticket, task.len());
                    self.engine.recommend(ticket, task);
                }
                Effect::LoadAgentCatalog => {
                    panel_debug!("LoadAgentCatalog");
                    self.engine.load_agents();
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event that maps to a message.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).and_then(map_event)
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::AnalysisCompleted { call_id, result } => Some(Msg::AnalysisFinished {
            ticket: call_id,
            outcome: result
                .map(|reply| AnalysisReply {
                    answer: reply.answer,
                    question: reply.question,
                })
                .map_err(|err| call_failure("analysis", call_id, err)),
        }),
        EngineEvent::RecommendationsCompleted { call_id, result } => {
            Some(Msg::RecommendationsFinished {
                ticket: call_id,
                outcome: result
                    .map(map_recommendations)
                    .map_err(|err| call_failure("recommendation", call_id, err)),
            })
        }
        EngineEvent::AgentsLoaded(result) => Some(Msg::CatalogLoaded(
            result
                .map(|agents| {
                    agents
                        .into_iter()
                        .map(|(name, info)| (name, map_profile(info)))
                        .collect::<AgentCatalog>()
                })
                .map_err(|err| {
                    panel_warn!("Agent catalog unavailable: {}", err);
                    err.to_string()
                }),
        )),
        EngineEvent::HealthChecked(_) => None,
    }
}

fn call_failure(what: &str, call_id: u64, err: BackendError) -> CallFailure {
    panel_warn!("{} call {} failed: {}", what, call_id, err);
    if err.is_rejection() {
        CallFailure::Reported {
            message: err.backend_message,
        }
    } else {
        CallFailure::Transport {
            backend_message: err.backend_message,
        }
    }
}

fn map_recommendations(set: RecommendationSet) -> Recommendations {
    Recommendations {
        task: set.task,
        agents: set
            .recommendations
            .into_iter()
            .map(|agent| RankedAgent {
                name: agent.name,
                score: agent.score,
                explanation: agent.explanation,
                profile: map_profile(agent.agent_info),
            })
            .collect(),
        total_agents: set.total_agents,
    }
}

fn map_profile(info: AgentInfo) -> AgentProfile {
    AgentProfile {
        languages: info.languages,
        strengths: info.strengths,
        weaknesses: info.weaknesses,
        ideal_tasks: info.ideal_tasks,
        requires_setup: info.requires_setup,
        offline_support: info.offline_support,
    }
}

#[cfg(test)]
mod tests {
    use askpanel_engine::{AgentMatch, FailureKind};

    use super::*;

    fn error(kind: FailureKind, backend_message: Option<&str>) -> BackendError {
        BackendError {
            kind,
            message: "test".to_string(),
            backend_message: backend_message.map(str::to_string),
        }
    }

    #[test]
    fn rejection_maps_to_reported_failure() {
        let msg = map_event(EngineEvent::AnalysisCompleted {
            call_id: 3,
            result: Err(error(FailureKind::Rejected, Some("bad image"))),
        });
        assert_eq!(
            msg,
            Some(Msg::AnalysisFinished {
                ticket: 3,
                outcome: Err(CallFailure::Reported {
                    message: Some("bad image".to_string())
                }),
            })
        );
    }

    #[test]
    fn other_errors_map_to_transport_failure() {
        let msg = map_event(EngineEvent::RecommendationsCompleted {
            call_id: 4,
            result: Err(error(
                FailureKind::HttpStatus(400),
                Some("Task description is required."),
            )),
        });
        assert_eq!(
            msg,
            Some(Msg::RecommendationsFinished {
                ticket: 4,
                outcome: Err(CallFailure::Transport {
                    backend_message: Some("Task description is required.".to_string())
                }),
            })
        );
    }

    #[test]
    fn recommendations_pass_through() {
        let msg = map_event(EngineEvent::RecommendationsCompleted {
            call_id: 1,
            result: Ok(RecommendationSet {
                task: "offline".to_string(),
                recommendations: vec![AgentMatch {
                    name: "Tabnine".to_string(),
                    score: 1,
                    explanation: vec!["✅ Supports offline usage".to_string()],
                    agent_info: AgentInfo {
                        offline_support: true,
                        ..AgentInfo::default()
                    },
                }],
                total_agents: 7,
            }),
        });

        let Some(Msg::RecommendationsFinished {
            outcome: Ok(result),
            ..
        }) = msg
        else {
            panic!("unexpected {msg:?}");
        };
        assert_eq!(result.total_agents, 7);
        assert_eq!(result.agents[0].name, "Tabnine");
        assert!(result.agents[0].profile.offline_support);
    }

    #[test]
    fn health_events_are_not_messages() {
        let event = EngineEvent::HealthChecked(Err(error(FailureKind::Timeout, None)));
        assert_eq!(map_event(event), None);
    }
}
