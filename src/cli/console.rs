use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use colored::Colorize;

use crate::{
    bot::{Keyboard, MenuAction, Notification, Notifier},
    domain::UserId,
    errors::Result,
    utils::persistence::write_atomic,
};

/// Prints notifications to stdout and saves exported documents to disk.
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    export_dir: PathBuf,
}

impl ConsoleNotifier {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    fn render(&self, notification: &Notification) -> Result<String> {
        let rendered = match notification {
            Notification::Message { text, keyboard } => {
                let mut out = text.clone();
                if let Some(controls) = render_keyboard(keyboard) {
                    out.push('\n');
                    out.push_str(&controls);
                }
                out
            }
            Notification::Notice { text, alert: true } => format!("(!) {text}").yellow().to_string(),
            Notification::Notice { text, alert: false } => format!("(✓) {text}").green().to_string(),
            Notification::BudgetAlert(text) => text.bold().yellow().to_string(),
            Notification::Document { file_name, content } => {
                let path = self.export_dir.join(file_name);
                write_atomic(&path, content)?;
                format!("[document] {}", path.display()).cyan().to_string()
            }
        };
        Ok(rendered)
    }
}

fn render_keyboard(keyboard: &Keyboard) -> Option<String> {
    match keyboard {
        Keyboard::None => None,
        Keyboard::MainMenu => {
            let labels: Vec<String> = MenuAction::ALL
                .iter()
                .map(|action| format!("[{}]", action.label()))
                .collect();
            Some(labels.join(" ").dimmed().to_string())
        }
        Keyboard::Inline(rows) => {
            let lines: Vec<String> = rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| format!("[{} !{}]", button.label, button.payload))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            Some(lines.join("\n").blue().to_string())
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, _user_id: UserId, notification: Notification) -> Result<()> {
        let rendered = self.render(&notification)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{rendered}")?;
        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::Button;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn documents_are_written_to_the_export_dir() {
        colored::control::set_override(false);
        let dir = tempdir().unwrap();
        let notifier = ConsoleNotifier::new(dir.path().join("exports"));

        let rendered = notifier
            .render(&Notification::Document {
                file_name: "finance_1_2025_01.csv".into(),
                content: b"id,type\n".to_vec(),
            })
            .unwrap();

        let path = dir.path().join("exports").join("finance_1_2025_01.csv");
        assert_eq!(fs::read_to_string(&path).unwrap(), "id,type\n");
        assert!(rendered.contains("finance_1_2025_01.csv"));
    }

    #[test]
    fn inline_buttons_show_their_payloads() {
        colored::control::set_override(false);
        let keyboard = Keyboard::Inline(vec![vec![
            Button::new("Удалить 3", "delete_tx:3"),
            Button::new("Удалить 4", "delete_tx:4"),
        ]]);
        assert_eq!(
            render_keyboard(&keyboard).unwrap(),
            "[Удалить 3 !delete_tx:3] [Удалить 4 !delete_tx:4]"
        );
        assert_eq!(render_keyboard(&Keyboard::None), None);
    }
}
