//! Rendering of screens into text plus button rows, and the callback
//! data those buttons carry.

use crate::consts::{entries, find_language, limits};
use crate::panel::{Panel, Side};
use crate::utils::{char_counter, escape_html, escape_html_truncated};

/// Telegram caps messages at 4096 chars; leave room for the panel chrome.
const MAX_OUTPUT_CHARS: usize = 3000;

/// What a button press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start screen: mount the panel
    Open,
    Display(Side),
    Swap,
    Pick(&'static str),
    Translate,
    Close,
}

impl Action {
    pub fn data(&self) -> String {
        match self {
            Action::Open => "open".to_string(),
            Action::Display(Side::Source) => "side:src".to_string(),
            Action::Display(Side::Target) => "side:dst".to_string(),
            Action::Swap => "swap".to_string(),
            Action::Pick(code) => format!("pick:{}", code),
            Action::Translate => "go".to_string(),
            Action::Close => "close".to_string(),
        }
    }

    /// Parses callback data. Picks of codes outside the registry are rejected.
    pub fn parse(data: &str) -> Option<Action> {
        match data {
            "open" => Some(Action::Open),
            "side:src" => Some(Action::Display(Side::Source)),
            "side:dst" => Some(Action::Display(Side::Target)),
            "swap" => Some(Action::Swap),
            "go" => Some(Action::Translate),
            "close" => Some(Action::Close),
            other => {
                let code = other.strip_prefix("pick:")?;
                find_language(code).map(|l| Action::Pick(l.code))
            }
        }
    }

    /// Picker entries are the only buttons inside the overlay
    pub fn in_overlay(&self) -> bool {
        matches!(self, Action::Pick(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: Action,
}

impl Button {
    fn new(label: impl Into<String>, action: Action) -> Self {
        Self { label: label.into(), action }
    }
}

/// A rendered screen: HTML text and keyboard rows
#[derive(Debug, Clone)]
pub struct View {
    pub text: String,
    pub rows: Vec<Vec<Button>>,
}

pub fn render_start() -> View {
    View {
        text: "🌐 <b>Language Translator</b>\n\nPick two languages, send some text, get it translated.".to_string(),
        rows: vec![vec![Button::new("Let's get started", Action::Open)]],
    }
}

pub fn render_panel(panel: &Panel) -> View {
    let session = panel.session();
    let open = panel.picker().side();

    let mut text = format!(
        "<b>{}</b>  ⇄  <b>{}</b>\n\n",
        panel.source_name(),
        panel.target_name()
    );

    if session.input.is_empty() {
        text.push_str("✏️ <i>Send a message to translate</i>\n");
    } else {
        text.push_str(&format!("✏️ {}\n", escape_html(&session.input)));
    }
    text.push_str(&format!("<code>{}</code>\n\n", char_counter(&session.input)));

    if panel.is_pending() {
        text.push_str("⏳ Translating...");
    } else if let Some(err) = &session.error {
        text.push_str(&format!("⚠️ {}", escape_html(err)));
    } else if !session.translated.is_empty() {
        text.push_str(&format!("➡️ {}", escape_html_truncated(&session.translated, MAX_OUTPUT_CHARS)));
    }

    let display = |side: Side, name: &str| {
        let label = if open == Some(side) { format!("{} ▾", name) } else { name.to_string() };
        Button::new(label, Action::Display(side))
    };

    let mut rows = vec![vec![
        display(Side::Source, panel.source_name()),
        Button::new("⇄", Action::Swap),
        display(Side::Target, panel.target_name()),
    ]];

    if let Some(side) = open {
        let current = match side {
            Side::Source => session.source,
            Side::Target => session.target,
        };
        let picks: Vec<Button> = entries()
            .map(|l| {
                let label = if l.code == current { format!("✓ {}", l.name) } else { l.name.to_string() };
                Button::new(label, Action::Pick(l.code))
            })
            .collect();
        rows.extend(picks.chunks(limits::PICKER_COLUMNS).map(|c| c.to_vec()));
    }

    rows.push(vec![
        Button::new("Translate ⬇", Action::Translate),
        Button::new("✕ Close", Action::Close),
    ]);

    View { text, rows }
}
