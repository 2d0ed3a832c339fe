//! Plain-text renderings of the view model, one block per panel.

use std::fmt::Write as _;

use askpanel_core::{
    AgentRowView, CatalogCardView, CatalogView, ImageQaView, Phase, RecommenderView,
};
use askpanel_engine::HealthReport;

const RULE: &str = "----------------------------------------";

pub fn image_qa(view: &ImageQaView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Image QA [{}]", view.phase.label());
    match &view.image {
        Some(image) => {
            let _ = writeln!(
                out,
                "  image:    {} ({}, {})",
                image.file_name,
                image.content_type,
                format_bytes(image.byte_len)
            );
            if image.has_preview {
                out.push_str("  preview:  ready\n");
            }
        }
        None => out.push_str("  image:    (none)\n"),
    }
    let _ = writeln!(out, "  question: {}", display_or_dash(&view.question));

    match view.phase {
        Phase::Idle => {
            if view.can_submit {
                out.push_str("  ready to analyze\n");
            }
        }
        Phase::Pending => out.push_str("  analyzing...\n"),
        Phase::Success => {
            if let Some(answer) = &view.answer {
                let _ = writeln!(out, "  Q: {}", answer.question);
                let _ = writeln!(out, "  A: {}", answer.answer);
            }
        }
        Phase::Failure => {
            if let Some(error) = &view.error {
                let _ = writeln!(out, "  error: {error}");
            }
        }
    }
    out
}

pub fn recommender(view: &RecommenderView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Recommender [{}]", view.phase.label());
    let _ = writeln!(out, "  task: {}", display_or_dash(&view.task));

    match view.phase {
        Phase::Idle => {}
        Phase::Pending => out.push_str("  finding the best agents...\n"),
        Phase::Failure => {
            if let Some(error) = &view.error {
                let _ = writeln!(out, "  error: {error}");
            }
        }
        Phase::Success => {
            let Some(result) = &view.result else {
                return out;
            };
            let _ = writeln!(
                out,
                "  Top {} of {} agents for \"{}\"",
                result.rows.len(),
                result.total_agents,
                result.task
            );
            for row in &result.rows {
                out.push_str(RULE);
                out.push('\n');
                agent_row(&mut out, row);
            }
        }
    }
    out
}

fn agent_row(out: &mut String, row: &AgentRowView) {
    let badge = if row.best_match { "  * Best Match" } else { "" };
    let _ = writeln!(
        out,
        "#{} {}  score {}  {}{}",
        row.rank,
        row.name,
        row.score,
        row.match_level.label(),
        badge
    );
    out.push_str("  Why:\n");
    for reason in &row.reasons {
        let _ = writeln!(out, "    - {reason}");
    }

    let profile = &row.profile;
    if !profile.languages.is_empty() {
        let _ = writeln!(out, "  Languages: {}", profile.languages.join(", "));
    }
    if !profile.strengths.is_empty() {
        let _ = writeln!(out, "  Strengths: {}", profile.strengths.join(", "));
    }
    let setup = if profile.requires_setup {
        "Requires setup"
    } else {
        "No setup required"
    };
    let offline = if profile.offline_support {
        "Offline capable"
    } else {
        "Online only"
    };
    let _ = writeln!(out, "  {setup} | {offline}");
    if !profile.weaknesses.is_empty() {
        let _ = writeln!(out, "  Considerations: {}", profile.weaknesses.join(", "));
    }
}

/// Empty when there is nothing to show.
pub fn catalog(view: &CatalogView) -> String {
    match view {
        CatalogView::Hidden => String::new(),
        CatalogView::Loading => "Available agents: loading...\n".to_string(),
        CatalogView::Overview(cards) => {
            let mut out = format!("Available agents ({})\n", cards.len());
            for card in cards {
                catalog_card(&mut out, card);
            }
            out
        }
    }
}

fn catalog_card(out: &mut String, card: &CatalogCardView) {
    let mut languages = card.languages.join(", ");
    if card.more_languages > 0 {
        let _ = write!(languages, " +{}", card.more_languages);
    }
    let mut flags = Vec::new();
    if card.offline_support {
        flags.push("offline");
    }
    if card.requires_setup {
        flags.push("setup");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };
    let _ = writeln!(out, "  {}{}", card.name, flags);
    if !languages.is_empty() {
        let _ = writeln!(out, "    languages: {languages}");
    }
    if !card.strengths.is_empty() {
        let _ = writeln!(out, "    strengths: {}", card.strengths.join(", "));
    }
    let _ = writeln!(out, "    {} ideal tasks", card.ideal_task_count);
}

pub fn health(report: &HealthReport) -> String {
    let mut out = format!("{}: {}\n", report.status, report.message);
    if !report.endpoints.is_empty() {
        let _ = writeln!(out, "  endpoints: {}", report.endpoints.join(", "));
    }
    out
}

fn display_or_dash(text: &str) -> &str {
    if text.trim().is_empty() {
        "-"
    } else {
        text
    }
}

fn format_bytes(len: usize) -> String {
    if len >= 1024 * 1024 {
        format!("{:.1} MiB", len as f64 / (1024.0 * 1024.0))
    } else if len >= 1024 {
        format!("{:.1} KiB", len as f64 / 1024.0)
    } else {
        format!("{len} B")
    }
}
