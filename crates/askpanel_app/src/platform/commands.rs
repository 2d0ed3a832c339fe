//! One-shot subcommands: drive a single submit to completion and print the
//! resulting panel.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context};
use askpanel_core::{CatalogState, Msg, Phase};
use askpanel_engine::{BackendSettings, EngineEvent, EngineHandle};
use panel_logging::panel_warn;

use super::app::Session;
use super::{image, render};

pub fn ask(
    session: &mut Session,
    image_path: Option<&Path>,
    question: String,
    wait: Duration,
) -> anyhow::Result<ExitCode> {
    if let Some(path) = image_path {
        let selected = image::load_image(path)?;
        session.dispatch(Msg::ImageSelected(selected));
    }
    session.dispatch(Msg::QuestionChanged(question));
    session.dispatch(Msg::AnalyzeClicked);

    if !session.wait_until(wait, |state| !state.image_qa().view_state().is_pending()) {
        bail!("no answer from the image QA backend within {:?}", wait);
    }
    let view = session.view().image_qa;
    print!("{}", render::image_qa(&view));
    Ok(exit_code(view.phase))
}

pub fn recommend(
    session: &mut Session,
    words: Vec<String>,
    wait: Duration,
) -> anyhow::Result<ExitCode> {
    session.dispatch(Msg::TaskChanged(words.join(" ")));
    session.dispatch(Msg::RecommendClicked);

    if !session.wait_until(wait, |state| !state.recommender().view_state().is_pending()) {
        bail!("no answer from the recommender backend within {:?}", wait);
    }
    let view = session.view().recommender;
    print!("{}", render::recommender(&view));
    Ok(exit_code(view.phase))
}

pub fn agents(session: &mut Session, wait: Duration) -> anyhow::Result<ExitCode> {
    session.dispatch(Msg::Startup);
    if !session.wait_until(wait, |state| *state.catalog() != CatalogState::Loading) {
        bail!("agent catalog did not arrive within {:?}", wait);
    }
    if let CatalogState::Unavailable(reason) = session.state().catalog() {
        eprintln!("Agent catalog unavailable: {reason}");
        return Ok(ExitCode::FAILURE);
    }
    print!("{}", render::catalog(&session.view().catalog));
    Ok(ExitCode::SUCCESS)
}

pub fn status(settings: BackendSettings, wait: Duration) -> anyhow::Result<ExitCode> {
    let url = settings.recommender_url.clone();
    let engine = EngineHandle::new(settings).context("starting the engine")?;
    engine.check_health();

    match engine.recv_timeout(wait) {
        Some(EngineEvent::HealthChecked(Ok(report))) => {
            print!("{url} {}", render::health(&report));
            Ok(ExitCode::SUCCESS)
        }
        Some(EngineEvent::HealthChecked(Err(err))) => {
            panel_warn!("Health check failed: {}", err);
            eprintln!("{url} is not reachable: {err}");
            Ok(ExitCode::FAILURE)
        }
        Some(other) => bail!("unexpected engine event {other:?}"),
        None => bail!("no health report from {url} within {wait:?}"),
    }
}

fn exit_code(phase: Phase) -> ExitCode {
    if phase == Phase::Failure {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
