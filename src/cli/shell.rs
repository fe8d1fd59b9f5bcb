use std::{
    env,
    io::{self, BufRead, IsTerminal},
    sync::Arc,
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Context as ReadlineContext, Editor, Helper,
};
use tracing::info;

use crate::{
    bot::{BotSettings, Dispatcher},
    config::{Config, ConfigManager},
    core::{Clock, SystemClock},
    domain::{UserId, UserProfile},
    ledger::LedgerStore,
};

use super::{
    console::ConsoleNotifier,
    input::{parse_line, MetaCommand, ShellInput, META_COMMANDS},
    CliError,
};

const SCRIPT_ENV: &str = "FINANCE_TRACKER_CLI_SCRIPT";
const EXPORT_DIR: &str = "exports";
const DEFAULT_USER_ID: UserId = 1;

const SHELL_HELP: &str = "\
/command args   run a bot command (/help lists them)
!payload        press an inline button, e.g. !delete_tx:3
:as <id> [name] act as another user
:quit           leave the shell
anything else   is sent as a chat message";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

impl CliMode {
    /// Script mode when forced through the environment or stdin is piped.
    pub fn detect() -> Self {
        if env::var_os(SCRIPT_ENV).is_some() || !io::stdin().is_terminal() {
            CliMode::Script
        } else {
            CliMode::Interactive
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub struct ShellContext {
    dispatcher: Dispatcher,
    profile: UserProfile,
    mode: CliMode,
}

impl ShellContext {
    pub fn new(dispatcher: Dispatcher, mode: CliMode) -> Self {
        Self {
            dispatcher,
            profile: UserProfile::new(DEFAULT_USER_ID),
            mode,
        }
    }

    /// Opens the ledger named by `config` and wires it to the console.
    pub fn from_config(config: &Config, mode: CliMode) -> Result<Self, CliError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = LedgerStore::open_path(config.resolve_database_path(), Arc::clone(&clock))?;
        let notifier = ConsoleNotifier::new(config.resolve_data_dir().join(EXPORT_DIR));
        let dispatcher = Dispatcher::new(
            Arc::new(store),
            Arc::new(notifier),
            clock,
            BotSettings::from(config),
        );
        Ok(Self::new(dispatcher, mode))
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    fn prompt(&self) -> String {
        format!("finance[{}]> ", self.profile.id)
    }

    pub(crate) fn process_line(&mut self, line: &str) -> LoopControl {
        match parse_line(line, &self.profile) {
            Ok(ShellInput::Empty) => LoopControl::Continue,
            Ok(ShellInput::Meta(meta)) => self.run_meta(meta),
            Ok(ShellInput::Event(event)) => {
                if let Err(err) = self.dispatcher.handle(event) {
                    report_error(&CliError::from(err));
                }
                LoopControl::Continue
            }
            Err(message) => {
                eprintln!("{}", format!("warning: {message}").yellow());
                LoopControl::Continue
            }
        }
    }

    fn run_meta(&mut self, meta: MetaCommand) -> LoopControl {
        match meta {
            MetaCommand::As { user_id, username } => {
                let mut profile = UserProfile::new(user_id);
                profile.username = username;
                self.profile = profile;
                info!(user_id, "console identity switched");
                println!("{}", format!("acting as user {user_id}").cyan());
                LoopControl::Continue
            }
            MetaCommand::Help => {
                println!("{SHELL_HELP}");
                LoopControl::Continue
            }
            MetaCommand::Quit => LoopControl::Exit,
        }
    }

    fn completion_words(&self) -> Vec<String> {
        let mut words: Vec<String> = self
            .dispatcher
            .registry()
            .names()
            .map(|name| format!("/{name}"))
            .collect();
        words.extend(META_COMMANDS.iter().map(|name| format!(":{name}")));
        words.sort();
        words
    }
}

pub fn run_cli() -> Result<(), CliError> {
    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    crate::init_with_filter(config.log_filter.as_deref());

    let mode = CliMode::detect();
    if mode == CliMode::Script {
        colored::control::set_override(false);
    }
    let mut context = ShellContext::from_config(&config, mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper {
        words: context.completion_words(),
    }));
    println!("{}", "Type :help for shell usage, /help for bot commands.".dimmed());

    loop {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if context.process_line(trimmed) == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if context.process_line(&line?) == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

fn report_error(err: &CliError) {
    eprintln!("{}", format!("error: {err}").red());
}

struct CommandHelper {
    words: Vec<String>,
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        if prefix.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let candidates = self
            .words
            .iter()
            .filter(|word| word.starts_with(prefix))
            .map(|word| Pair {
                display: word.clone(),
                replacement: word.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}
