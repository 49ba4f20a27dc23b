//! Token sequence to command tree.
//!
//! The parser walks the tokens front to back with an explicit cursor. Nesting comes from
//! the token structure: a list item's children are parsed by a nested parser, and an
//! `<<if>>` body runs until an `<<endif>>` (or `<</if>>`) or the end of the enclosing
//! sequence, whichever comes first. An `<<if>>` inside a list item therefore never
//! extends past that item.
//!
//! `<<if>>` bodies and list items together nest at most [MAX_NESTING] levels. An
//! `<<if>>` past that depth becomes an invalid command and opens no body.

use super::command::{Command, Link};
use super::macros;
use crate::twsam::lexing::{Spanned, Token};

/// Deepest nesting of `<<if>>` bodies and list items.
pub const MAX_NESTING: usize = 64;

pub struct CommandParser<'t> {
    tokens: &'t [Spanned],
    pos: usize,
    depth: usize,
}

impl<'t> CommandParser<'t> {
    pub fn new(tokens: &'t [Spanned]) -> Self {
        Self::nested(tokens, 0)
    }

    fn nested(tokens: &'t [Spanned], depth: usize) -> Self {
        CommandParser {
            tokens,
            pos: 0,
            depth,
        }
    }

    pub fn parse(mut self) -> Vec<Command> {
        self.parse_block(false)
    }

    fn parse_block(&mut self, in_if: bool) -> Vec<Command> {
        let tokens = self.tokens;
        let mut commands = Vec::new();

        while let Some((token, _)) = tokens.get(self.pos) {
            self.pos += 1;
            let command = match token {
                Token::Text { value } => Command::text(value.as_str()),
                Token::Image { path } => Command::Image { path: path.clone() },
                Token::Link { spec } => Command::Link(Link::parse(spec)),
                Token::List { ordered, children } => Command::List {
                    ordered: *ordered,
                    children: CommandParser::nested(children, self.depth + 1).parse(),
                },
                Token::Macro { name, params } if name == "if" => {
                    if self.depth >= MAX_NESTING {
                        Command::invalid(format!(
                            "<<if>> nested more than {} levels deep",
                            MAX_NESTING
                        ))
                    } else {
                        self.depth += 1;
                        let body = self.parse_block(true);
                        self.depth -= 1;
                        macros::if_command(params, body)
                    }
                }
                Token::Macro { name, .. } if macros::IF_CLOSERS.contains(&name.as_str()) => {
                    if in_if {
                        return commands;
                    }
                    Command::invalid(format!("<<{}>> without a matching <<if>>", name))
                }
                Token::Macro { name, params } => macros::parse_macro(name, params),
            };
            commands.push(command);
        }

        commands
    }
}

/// Parse a token sequence into commands.
pub fn parse_commands(tokens: &[Spanned]) -> Vec<Command> {
    CommandParser::new(tokens).parse()
}
