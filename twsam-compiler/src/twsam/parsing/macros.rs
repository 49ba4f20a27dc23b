//! Macro parsers
//!
//! Each `<<name params>>` token becomes exactly one command. A macro that cannot be
//! parsed, including one whose expression fails to compile, becomes
//! [`Command::Invalid`] and the passage goes on parsing.
//!
//! `<<if>>` and its closers are handled by the [command parser](super::parser), since
//! they shape the tree; [if_command] only builds the node.

use super::command::Command;
use crate::twsam::expression::{compile_expression, CompiledExpression};
use once_cell::sync::Lazy;
use regex::Regex;

/// `NAME = EXPR` or `NAME to EXPR`, with an optional `$` marker on the name
static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*\$?([A-Za-z_][A-Za-z0-9_]*)\s*(?:=|to\s)\s*(.*?)\s*$").unwrap()
});

/// Macro names that close an `<<if>>` body.
pub const IF_CLOSERS: &[&str] = &["endif", "/if"];

/// Build the command for any macro other than `if` and its closers.
pub fn parse_macro(name: &str, params: &str) -> Command {
    match name {
        "set" => parse_assignment(params),
        "print" => match compile(name, params) {
            Ok(expr) => Command::Print { expr },
            Err(invalid) => invalid,
        },
        "pause" => no_params(name, params, Command::Pause),
        "return" => no_params(name, params, Command::Return),
        "call" => with_param(name, params, |target| Command::Call { target }),
        "display" => with_param(name, params, |target| Command::Display { target }),
        "music" => with_param(name, params, |path| Command::Music { path }),
        "if" => Command::invalid("<<if>> must be parsed as a block"),
        _ => Command::invalid(format!("unknown macro <<{}>>", name)),
    }
}

/// Parse `NAME (= | to) EXPR` into a `Set` command.
pub fn parse_assignment(params: &str) -> Command {
    let Some(captures) = ASSIGNMENT.captures(params) else {
        return Command::invalid(format!(
            "<<set {}>>: expected `NAME = EXPR` or `NAME to EXPR`",
            params.trim()
        ));
    };
    let target = captures[1].to_string();
    match compile("set", &captures[2]) {
        Ok(expr) => Command::Set { target, expr },
        Err(invalid) => invalid,
    }
}

/// Build an `If` node around an already parsed body.
pub fn if_command(params: &str, children: Vec<Command>) -> Command {
    match compile("if", params) {
        Ok(expr) => Command::If { expr, children },
        Err(invalid) => invalid,
    }
}

fn compile(name: &str, source: &str) -> Result<CompiledExpression, Command> {
    compile_expression(source)
        .map_err(|err| Command::invalid(format!("<<{} {}>>: {}", name, source.trim(), err)))
}

fn no_params(name: &str, params: &str, command: Command) -> Command {
    if params.trim().is_empty() {
        command
    } else {
        Command::invalid(format!("<<{}>> takes no parameters", name))
    }
}

fn with_param(name: &str, params: &str, build: impl FnOnce(String) -> Command) -> Command {
    let value = unquote(params);
    if value.is_empty() {
        Command::invalid(format!("<<{}>> needs a parameter", name))
    } else {
        build(value.to_string())
    }
}

/// Trim and strip one pair of matching surrounding quotes.
pub fn unquote(params: &str) -> &str {
    let trimmed = params.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_with_equals_and_to() {
        for params in ["$gold = $gold + 10", "gold to gold + 10"] {
            let command = parse_assignment(params);
            let Command::Set { target, expr } = command else {
                panic!("expected set, got {:?}", command);
            };
            assert_eq!(target, "gold");
            assert_eq!(expr.render(|_| "C".to_string()), "C:10 +");
        }
    }

    #[test]
    fn test_set_without_operator_is_invalid() {
        let command = parse_macro("set", "$gold 10");
        assert!(
            matches!(command, Command::Invalid { ref message } if message.contains("NAME = EXPR"))
        );
    }

    #[test]
    fn test_set_with_bad_expression_is_invalid() {
        let command = parse_macro("set", "$a = frobnicate(1)");
        let Command::Invalid { message } = command else {
            panic!("expected invalid");
        };
        assert!(message.contains("unknown function"), "{}", message);
    }

    #[test]
    fn test_targets_are_unquoted() {
        assert_eq!(
            parse_macro("display", "\"Side Room\""),
            Command::Display {
                target: "Side Room".to_string()
            }
        );
        assert_eq!(
            parse_macro("call", " Shop "),
            Command::Call {
                target: "Shop".to_string()
            }
        );
        assert_eq!(
            parse_macro("music", "'theme.epsgmod'"),
            Command::Music {
                path: "theme.epsgmod".to_string()
            }
        );
    }

    #[test]
    fn test_parameter_checks() {
        assert_eq!(parse_macro("pause", ""), Command::Pause);
        assert_eq!(parse_macro("return", "  "), Command::Return);
        assert!(matches!(parse_macro("pause", "3"), Command::Invalid { .. }));
        assert!(matches!(parse_macro("call", ""), Command::Invalid { .. }));
    }

    #[test]
    fn test_unknown_macro() {
        assert_eq!(
            parse_macro("goto", "Room"),
            Command::invalid("unknown macro <<goto>>")
        );
    }
}
