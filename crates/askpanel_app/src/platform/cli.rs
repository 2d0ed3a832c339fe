use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use panel_logging::LogDestination;

/// Terminal front end for the image QA and coding-agent recommender backends.
#[derive(Parser, Debug)]
#[command(name = "askpanel", version)]
pub struct Cli {
    /// RON config file. Defaults to ./askpanel.ron when it exists.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Base URL of the image QA backend.
    #[arg(long, global = true)]
    pub image_qa_url: Option<String>,
    /// Base URL of the recommender backend.
    #[arg(long, global = true)]
    pub recommender_url: Option<String>,
    #[arg(long, value_enum, default_value_t = LogTarget::Terminal, global = true)]
    pub log: LogTarget,
    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask a question about an image.
    Ask {
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long, default_value = "")]
        question: String,
    },
    /// Recommend coding agents for a task.
    Recommend {
        #[arg(num_args = 0..)]
        task: Vec<String>,
    },
    /// List every agent the recommender knows.
    Agents,
    /// Check that the recommender backend answers.
    Status,
    /// Interactive session driving both panels.
    Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(value: LogTarget) -> Self {
        match value {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}
