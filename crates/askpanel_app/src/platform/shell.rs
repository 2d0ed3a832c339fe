//! Line-oriented interactive session over both panels.
//!
//! Stdin is read on its own thread so engine completions keep rendering while
//! the user is typing. A panel is reprinted only when its text changed.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use askpanel_core::{AppViewModel, CatalogState, Msg};
use panel_logging::{panel_debug, panel_info, panel_warn};
use thiserror::Error;

use super::app::Session;
use super::{image, render};

const POLL_INTERVAL: Duration = Duration::from_millis(75);

const HELP: &str = "\
Commands:
  image <path>          select an image (jpg, png, gif, bmp, webp)
  clear-image           drop the selected image
  question <text>       set the question about the image
  ask [text]            analyze the image (optionally setting the question)
  task <text>           set the task description
  recommend [text]      recommend agents (optionally setting the task)
  reset [qa|rec]        return one or both panels to idle
  agents                show the agent catalog
  show                  print every panel
  help                  this text
  quit                  leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    ImageQa,
    Recommender,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Image(PathBuf),
    ClearImage,
    Question(String),
    Ask(Option<String>),
    Task(String),
    Recommend(Option<String>),
    Reset(Option<Panel>),
    Agents,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command {0:?}; try `help`")]
    UnknownCommand(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("unknown panel {0:?}; use `qa` or `rec`")]
    UnknownPanel(String),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(None);
    }
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (trimmed, ""),
    };
    let optional = |rest: &str| (!rest.trim().is_empty()).then(|| rest.to_string());

    let command = match word {
        "image" => {
            if rest.trim().is_empty() {
                return Err(ParseError::MissingArgument("image"));
            }
            ShellCommand::Image(PathBuf::from(rest.trim()))
        }
        "clear-image" => ShellCommand::ClearImage,
        "question" => ShellCommand::Question(rest.to_string()),
        "ask" => ShellCommand::Ask(optional(rest)),
        "task" => ShellCommand::Task(rest.to_string()),
        "recommend" => ShellCommand::Recommend(optional(rest)),
        "reset" => match rest.trim() {
            "" => ShellCommand::Reset(None),
            "qa" => ShellCommand::Reset(Some(Panel::ImageQa)),
            "rec" => ShellCommand::Reset(Some(Panel::Recommender)),
            other => return Err(ParseError::UnknownPanel(other.to_string())),
        },
        "agents" => ShellCommand::Agents,
        "show" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

/// Terminal output that remembers the last text printed for each panel.
struct Console<W: Write> {
    out: W,
    image_qa: String,
    recommender: String,
    catalog: String,
}

impl<W: Write> Console<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            image_qa: String::new(),
            recommender: String::new(),
            catalog: String::new(),
        }
    }

    fn print_changed(&mut self, view: &AppViewModel) -> io::Result<()> {
        let image_qa = render::image_qa(&view.image_qa);
        let recommender = render::recommender(&view.recommender);
        let catalog = render::catalog(&view.catalog);
        for (last, next) in [
            (&mut self.image_qa, image_qa),
            (&mut self.recommender, recommender),
            (&mut self.catalog, catalog),
        ] {
            if *last != next {
                if !next.is_empty() {
                    writeln!(self.out, "{next}")?;
                }
                *last = next;
            }
        }
        self.out.flush()
    }

    fn print_all(&mut self, view: &AppViewModel) -> io::Result<()> {
        self.image_qa.clear();
        self.recommender.clear();
        self.catalog.clear();
        self.print_changed(view)
    }

    fn line(&mut self, text: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }
}

/// Runs the shell on stdin and stdout. When input ends, calls still in
/// flight get up to `wait` to finish so their results are shown.
pub fn run(session: &mut Session, wait: Duration) -> io::Result<()> {
    let lines = spawn_stdin_reader();
    drive(session, &lines, wait, io::stdout().lock())
}

fn drive<W: Write>(
    session: &mut Session,
    lines: &Receiver<String>,
    wait: Duration,
    out: W,
) -> io::Result<()> {
    let mut console = Console::new(out);

    console.line(format_args!("{HELP}\n"))?;
    session.dispatch(Msg::Startup);
    console.print_all(&session.view())?;
    session.consume_dirty();
    console.prompt()?;

    loop {
        match lines.recv_timeout(POLL_INTERVAL) {
            Ok(line) => {
                match parse_command(&line) {
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(command)) => apply(session, &mut console, command)?,
                    Ok(None) => {}
                    Err(err) => console.line(err)?,
                }
                console.prompt()?;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                finish_pending(session, wait);
                if session.consume_dirty() {
                    console.print_changed(&session.view())?;
                }
                break;
            }
        }

        while session.pump(Duration::ZERO) {}
        if session.consume_dirty() {
            console.print_changed(&session.view())?;
        }
    }
    panel_info!("Shell closed");
    Ok(())
}

fn finish_pending(session: &mut Session, wait: Duration) {
    if !session.state().has_pending_call() {
        return;
    }
    panel_info!("Input closed; waiting up to {:?} for calls in flight", wait);
    if !session.wait_until(wait, |state| !state.has_pending_call()) {
        panel_warn!("Calls still pending after {:?}; leaving without their results", wait);
    }
}

fn apply<W: Write>(
    session: &mut Session,
    console: &mut Console<W>,
    command: ShellCommand,
) -> io::Result<()> {
    panel_debug!("Shell command {:?}", command);
    match command {
        ShellCommand::Image(path) => match image::load_image(&path) {
            Ok(selected) => session.dispatch(Msg::ImageSelected(selected)),
            Err(err) => console.line(err)?,
        },
        ShellCommand::ClearImage => session.dispatch(Msg::ImageCleared),
        ShellCommand::Question(text) => session.dispatch(Msg::QuestionChanged(text)),
        ShellCommand::Ask(text) => {
            if let Some(text) = text {
                session.dispatch(Msg::QuestionChanged(text));
            }
            session.dispatch(Msg::AnalyzeClicked);
        }
        ShellCommand::Task(text) => session.dispatch(Msg::TaskChanged(text)),
        ShellCommand::Recommend(text) => {
            if let Some(text) = text {
                session.dispatch(Msg::TaskChanged(text));
            }
            session.dispatch(Msg::RecommendClicked);
        }
        ShellCommand::Reset(panel) => {
            if panel != Some(Panel::Recommender) {
                session.dispatch(Msg::ImageQaResetClicked);
            }
            if panel != Some(Panel::ImageQa) {
                session.dispatch(Msg::RecommenderResetClicked);
            }
        }
        ShellCommand::Agents => match session.state().catalog() {
            CatalogState::Unavailable(reason) => {
                console.line(format_args!("Agent catalog unavailable: {reason}"))?
            }
            _ => {
                let text = render::catalog(&session.view().catalog);
                if text.is_empty() {
                    console.line(
                        "Agent catalog is hidden while recommendations are shown; \
                         `reset rec` to see it.",
                    )?;
                } else {
                    console.line(text)?;
                }
            }
        },
        ShellCommand::Show => console.print_all(&session.view())?,
        ShellCommand::Help => console.line(HELP)?,
        ShellCommand::Quit => {}
    }
    Ok(())
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
