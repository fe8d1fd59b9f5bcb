pub mod persistence;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "finance_tracker=info";
const MAX_LOG_LEN: usize = 400;

/// Initializes the global tracing subscriber, writing to stderr.
///
/// `directive` replaces the default `finance_tracker=info` filter; `RUST_LOG`
/// still applies on top of either.
pub fn init_tracing(directive: Option<&str>) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        match directive.unwrap_or(DEFAULT_DIRECTIVE).parse() {
            Ok(parsed) => filter = filter.add_directive(parsed),
            Err(err) => eprintln!("ignoring invalid log filter: {err}"),
        }

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Flattens and truncates user-supplied text before it is written to the log.
pub fn clip_for_log(text: &str) -> String {
    let sanitized = text.replace('\n', "\\n");
    if sanitized.chars().count() <= MAX_LOG_LEN {
        return sanitized;
    }
    let mut clipped: String = sanitized.chars().take(MAX_LOG_LEN).collect();
    clipped.push('…');
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_only_escapes_newlines() {
        assert_eq!(clip_for_log("coffee\nbeans"), "coffee\\nbeans");
    }

    #[test]
    fn long_text_is_truncated_on_char_boundary() {
        let text = "ё".repeat(500);
        let clipped = clip_for_log(&text);
        assert_eq!(clipped.chars().count(), 401);
        assert!(clipped.ends_with('…'));
    }
}
