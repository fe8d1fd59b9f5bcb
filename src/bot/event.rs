use crate::domain::{UserId, UserProfile};

/// What the transport delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// `/name args`; `name` has no leading slash and `args` is the raw rest.
    Command { name: String, args: String },
    FreeText(String),
    /// Opaque payload attached to an inline button.
    ButtonPress(String),
}

impl EventKind {
    pub fn tag(&self) -> &'static str {
        match self {
            EventKind::Command { .. } => "command",
            EventKind::FreeText(_) => "text",
            EventKind::ButtonPress(_) => "button",
        }
    }

    /// Raw payload for logging.
    pub fn payload(&self) -> String {
        match self {
            EventKind::Command { name, args } if args.is_empty() => format!("/{name}"),
            EventKind::Command { name, args } => format!("/{name} {args}"),
            EventKind::FreeText(text) | EventKind::ButtonPress(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub profile: UserProfile,
    pub kind: EventKind,
}

impl InboundEvent {
    pub fn command(profile: UserProfile, name: &str, args: &str) -> Self {
        Self {
            profile,
            kind: EventKind::Command {
                name: name.trim_start_matches('/').to_lowercase(),
                args: args.trim().to_string(),
            },
        }
    }

    pub fn text(profile: UserProfile, text: impl Into<String>) -> Self {
        Self {
            profile,
            kind: EventKind::FreeText(text.into()),
        }
    }

    pub fn button(profile: UserProfile, payload: impl Into<String>) -> Self {
        Self {
            profile,
            kind: EventKind::ButtonPress(payload.into()),
        }
    }

    /// Classifies a typed message: a leading `/` makes it a command, with the
    /// first word as the name and the remainder as arguments.
    pub fn from_message(profile: UserProfile, text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.strip_prefix('/') {
            Some(rest) if !rest.is_empty() => {
                let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Self::command(profile, name, args)
            }
            _ => Self::text(profile, text),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.profile.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_text_becomes_a_command() {
        let event = InboundEvent::from_message(UserProfile::new(3), "/set_budget еда  5 000");
        assert_eq!(
            event.kind,
            EventKind::Command {
                name: "set_budget".into(),
                args: "еда  5 000".into()
            }
        );
        assert_eq!(event.kind.payload(), "/set_budget еда  5 000");
    }

    #[test]
    fn plain_text_stays_free_text() {
        let event = InboundEvent::from_message(UserProfile::new(3), "450");
        assert_eq!(event.kind, EventKind::FreeText("450".into()));
        assert_eq!(event.kind.tag(), "text");

        let lone_slash = InboundEvent::from_message(UserProfile::new(3), "/");
        assert_eq!(lone_slash.kind, EventKind::FreeText("/".into()));
    }
}
