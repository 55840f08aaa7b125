//! Line-based control of a console dashboard.
//!
//! Each command turns into the interaction event a chat client would send.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chatdash_core::event::{ActorId, ControlId, InteractionEvent};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;

use crate::console::ConsoleState;

const COMMANDS: &[&str] = &[
    "select", "edit", "reset", "submit", "dismiss", "as", "help", "quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Select(String),
    Edit,
    Reset,
    Submit(BTreeMap<String, String>),
    Dismiss,
    /// Run a command as another user
    As(ActorId, Box<ReplCommand>),
    Help,
    Quit,
}

/// Parses one input line.
pub fn parse_command(line: &str) -> std::result::Result<ReplCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "select" if !rest.is_empty() => Ok(ReplCommand::Select(rest.to_string())),
        "select" => Err("usage: select <category>".to_string()),
        "edit" => Ok(ReplCommand::Edit),
        "reset" => Ok(ReplCommand::Reset),
        "submit" => parse_values(rest).map(ReplCommand::Submit),
        "dismiss" => Ok(ReplCommand::Dismiss),
        "as" => {
            let (actor, command) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: as <user> <command>".to_string())?;
            let inner = parse_command(command)?;
            if matches!(inner, ReplCommand::As(..) | ReplCommand::Help | ReplCommand::Quit) {
                return Err(format!("cannot run '{}' as another user", command.trim()));
            }
            Ok(ReplCommand::As(ActorId::new(actor), Box::new(inner)))
        }
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" => Ok(ReplCommand::Quit),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

/// Parses `Name=value; Other=value`. Values may contain `=`.
fn parse_values(input: &str) -> std::result::Result<BTreeMap<String, String>, String> {
    let mut values = BTreeMap::new();
    for pair in input.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected <Setting>=<value>, got '{pair}'"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("missing setting name in '{pair}'"));
        }
        values.insert(name.to_string(), value.trim().replace("\\n", "\n"));
    }
    Ok(values)
}

impl ReplCommand {
    /// Builds the event for this command.
    ///
    /// # Errors
    ///
    /// A message for the user when the command does not fit the dashboard's
    /// current state, or is not an interaction at all.
    pub fn to_event(
        &self,
        actor: &ActorId,
        state: &ConsoleState,
    ) -> std::result::Result<InteractionEvent, String> {
        match self {
            Self::Select(category) => Ok(InteractionEvent::select(actor.clone(), category.clone())),
            Self::Edit => state
                .category
                .as_ref()
                .map(|c| InteractionEvent::press(actor.clone(), ControlId::edit(c)))
                .ok_or_else(|| "select a category first".to_string()),
            Self::Reset => state
                .category
                .as_ref()
                .map(|c| InteractionEvent::press(actor.clone(), ControlId::reset(c)))
                .ok_or_else(|| "select a category first".to_string()),
            Self::Submit(values) => state
                .form
                .as_ref()
                .map(|f| InteractionEvent::submit(actor.clone(), f.correlation.clone(), values.clone()))
                .ok_or_else(|| "no edit form is open (use 'edit')".to_string()),
            Self::Dismiss => state
                .form
                .as_ref()
                .map(|f| InteractionEvent::dismiss(actor.clone(), f.correlation.clone()))
                .ok_or_else(|| "no edit form is open".to_string()),
            Self::As(other, command) => command.to_event(other, state),
            Self::Help | Self::Quit => Err("not an interaction".to_string()),
        }
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_yellow());
    println!("  select <category>              show a category");
    println!("  edit                           open the edit form of the shown category");
    println!("  reset                          restore the shown category's defaults");
    println!("  submit <Setting>=<value>; ...  submit the open form (\\n for newlines)");
    println!("  dismiss                        close the open form");
    println!("  as <user> <command>            act as someone other than the owner");
    println!("  quit                           close the dashboard");
}

/// Completion and hints for command words.
#[derive(Clone)]
struct ReplHelper {
    commands: Vec<String>,
}

impl ReplHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(' ') {
            return Ok((0, vec![]));
        }
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match line.split_whitespace().next() {
            Some(word) if line.starts_with(word) && self.commands.iter().any(|c| c == word) => {
                Owned(format!("{}{}", word.bright_cyan(), &line[word.len()..]))
            }
            _ => Borrowed(line),
        }
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() || line.contains(' ') {
            return None;
        }
        self.commands
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for ReplHelper {}

/// Reads commands until the user quits or the dashboard closes.
///
/// Runs on a blocking thread; events are handed to the session through
/// `events`.
pub fn run(
    events: mpsc::Sender<InteractionEvent>,
    owner: ActorId,
    state: Arc<Mutex<ConsoleState>>,
) -> Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(ReplHelper::new()));

    println!("{}", "=== chatdash ===".bright_magenta().bold());
    println!(
        "{}",
        "Type 'help' for commands, 'quit' to close the dashboard.".bright_black()
    );

    loop {
        let snapshot = match state.lock() {
            Ok(state) => state.clone(),
            Err(_) => break,
        };
        if snapshot.closed {
            break;
        }

        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let command = match parse_command(trimmed) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{}", message.yellow());
                        continue;
                    }
                };
                match command {
                    ReplCommand::Quit => break,
                    ReplCommand::Help => print_help(),
                    command => {
                        let snapshot = match state.lock() {
                            Ok(state) => state.clone(),
                            Err(_) => break,
                        };
                        match command.to_event(&owner, &snapshot) {
                            Ok(event) => {
                                if events.blocking_send(event).is_err() {
                                    println!("{}", "The dashboard is closed.".bright_black());
                                    break;
                                }
                            }
                            Err(message) => println!("{}", message.yellow()),
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatdash_core::event::{ControlAction, CorrelationId, InteractionKind};
    use chatdash_core::render::FormPayload;

    fn owner() -> ActorId {
        ActorId::new("console")
    }

    #[test]
    fn test_parse_select_keeps_spaces() {
        assert_eq!(
            parse_command("select  Auto Moderation "),
            Ok(ReplCommand::Select("Auto Moderation".to_string()))
        );
        assert!(parse_command("select").is_err());
    }

    #[test]
    fn test_parse_submit_values() {
        let command = parse_command("submit Prefix = !; Welcome=Hi\\nthere; Url=a=b").unwrap();
        let ReplCommand::Submit(values) = command else {
            panic!("expected submit");
        };
        assert_eq!(values["Prefix"], "!");
        assert_eq!(values["Welcome"], "Hi\nthere");
        assert_eq!(values["Url"], "a=b");

        assert!(parse_command("submit nonsense").is_err());
        assert_eq!(parse_command("submit"), Ok(ReplCommand::Submit(BTreeMap::new())));
    }

    #[test]
    fn test_parse_as() {
        assert_eq!(
            parse_command("as mallory select General"),
            Ok(ReplCommand::As(
                ActorId::new("mallory"),
                Box::new(ReplCommand::Select("General".to_string()))
            ))
        );
        assert!(parse_command("as mallory quit").is_err());
        assert!(parse_command("as mallory").is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse_command("frobnicate").is_err());
        assert_eq!(parse_command("exit"), Ok(ReplCommand::Quit));
    }

    #[test]
    fn test_buttons_need_a_shown_category() {
        let mut state = ConsoleState::default();
        assert!(ReplCommand::Edit.to_event(&owner(), &state).is_err());

        state.category = Some("General".to_string());
        let event = ReplCommand::Reset.to_event(&owner(), &state).unwrap();
        match event.kind {
            InteractionKind::ButtonPress { control } => {
                assert_eq!(control.category, "General");
                assert_eq!(control.action, ControlAction::Reset);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_submit_uses_open_form() {
        let mut state = ConsoleState::default();
        let submit = ReplCommand::Submit(BTreeMap::new());
        assert!(submit.to_event(&owner(), &state).is_err());

        let correlation = CorrelationId::generate("General");
        state.form = Some(FormPayload {
            title: "General".to_string(),
            correlation: correlation.clone(),
            fields: Vec::new(),
        });
        let event = ReplCommand::As(ActorId::new("mallory"), Box::new(submit))
            .to_event(&owner(), &state)
            .unwrap();
        assert_eq!(event.actor, ActorId::new("mallory"));
        match event.kind {
            InteractionKind::FormSubmission { correlation: c, .. } => assert_eq!(c, correlation),
            other => panic!("unexpected kind: {other:?}"),
        }
    }
}
