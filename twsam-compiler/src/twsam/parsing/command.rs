//! Command tree
//!
//! Commands are what the code generator walks. They are built once per passage, when
//! the passage is parsed, and never change afterwards.

use crate::twsam::expression::CompiledExpression;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    /// Raw text; trimmed when emitted
    Text { text: String },
    Image { path: String },
    Music { path: String },
    Link(Link),
    List {
        ordered: bool,
        children: Vec<Command>,
    },
    Set {
        target: String,
        expr: CompiledExpression,
    },
    If {
        expr: CompiledExpression,
        children: Vec<Command>,
    },
    Print { expr: CompiledExpression },
    Pause,
    Call { target: String },
    Return,
    Display { target: String },
    /// A macro that could not be parsed; carries the reason
    Invalid { message: String },
}

impl Command {
    pub fn text(text: impl Into<String>) -> Self {
        Command::Text { text: text.into() }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Command::Invalid {
            message: message.into(),
        }
    }

    /// Short name of the command kind, as used in dumps and messages
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Text { .. } => "text",
            Command::Image { .. } => "image",
            Command::Music { .. } => "music",
            Command::Link(_) => "link",
            Command::List { .. } => "list",
            Command::Set { .. } => "set",
            Command::If { .. } => "if",
            Command::Print { .. } => "print",
            Command::Pause => "pause",
            Command::Call { .. } => "call",
            Command::Return => "return",
            Command::Display { .. } => "display",
            Command::Invalid { .. } => "invalid",
        }
    }
}

/// A `[[label|target][on-click]]` link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub target: String,
    pub label: Option<String>,
    /// On-click text as written
    pub on_click: Option<String>,
    /// The on-click text compiled as an assignment: a `Set`, or `Invalid` when it is not one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Box<Command>>,
}

impl Link {
    /// Split a raw link spec.
    ///
    /// The on-click part follows the first `][`. In the rest, the text after the last
    /// `|` is the target and everything before it the label.
    pub fn parse(spec: &str) -> Link {
        let (main, on_click) = match spec.split_once("][") {
            Some((main, on_click)) => (main, Some(on_click.to_string())),
            None => (spec, None),
        };
        let (label, target) = match main.rsplit_once('|') {
            Some((label, target)) => (Some(label.to_string()), target.to_string()),
            None => (None, main.to_string()),
        };
        let action = on_click
            .as_deref()
            .map(|text| Box::new(super::macros::parse_assignment(text)));

        Link {
            target,
            label,
            on_click,
            action,
        }
    }

    /// The label shown to the player; the target when no label was given.
    pub fn actual_label(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => &self.target,
        }
    }
}
