use shell_words::split;
use strsim::levenshtein;

use crate::{
    bot::InboundEvent,
    domain::{UserId, UserProfile},
};

pub const META_COMMANDS: [&str; 3] = ["as", "help", "quit"];

/// Shell-only commands, written with a leading `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    /// Act as another identity from now on.
    As {
        user_id: UserId,
        username: Option<String>,
    },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    Empty,
    Meta(MetaCommand),
    Event(InboundEvent),
}

/// Classifies one console line.
///
/// `:meta args` is handled by the shell, `!payload` presses an inline
/// button, and everything else is what the user would type in a chat.
pub fn parse_line(line: &str, profile: &UserProfile) -> Result<ShellInput, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(ShellInput::Empty);
    }
    if let Some(rest) = trimmed.strip_prefix(':') {
        return parse_meta(rest).map(ShellInput::Meta);
    }
    if let Some(payload) = trimmed.strip_prefix('!') {
        return Ok(ShellInput::Event(InboundEvent::button(
            profile.clone(),
            payload.trim(),
        )));
    }
    Ok(ShellInput::Event(InboundEvent::from_message(
        profile.clone(),
        line,
    )))
}

fn parse_meta(input: &str) -> Result<MetaCommand, String> {
    let tokens = split(input).map_err(|err| err.to_string())?;
    let Some((name, args)) = tokens.split_first() else {
        return Err("missing shell command after `:`".into());
    };
    match name.to_lowercase().as_str() {
        "as" => {
            let id = args
                .first()
                .ok_or_else(|| "usage: :as <user id> [username]".to_string())?;
            let user_id = id
                .parse()
                .map_err(|_| format!("`{id}` is not a numeric user id"))?;
            Ok(MetaCommand::As {
                user_id,
                username: args.get(1).cloned(),
            })
        }
        "help" | "?" => Ok(MetaCommand::Help),
        "quit" | "q" | "exit" => Ok(MetaCommand::Quit),
        other => Err(match suggest_meta(other) {
            Some(best) => format!("unknown shell command `:{other}`. Suggestion: `:{best}`?"),
            None => format!("unknown shell command `:{other}`"),
        }),
    }
}

fn suggest_meta(input: &str) -> Option<&'static str> {
    META_COMMANDS
        .iter()
        .map(|name| (levenshtein(name, input), *name))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name)
}
