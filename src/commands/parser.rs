//! Parser for the function-call command syntax.
//!
//! Commands look like `name(arg1, arg2, ...)`. All whitespace is removed before
//! scanning, so it is never significant, not even inside an argument.

use thiserror::Error;

/// A command split into its operation name and raw argument strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Operation name (everything before the first `(`).
    pub name: String,
    /// Raw arguments in call order.
    pub args: Vec<String>,
}

/// Malformed command text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("syntax error: '(' not found")]
    MissingOpenParen,

    #[error("syntax error: ')' not found")]
    MissingCloseParen,

    #[error("syntax error: extra characters after ')'")]
    TrailingCharacters,

    /// A structured call object that could not be decoded.
    #[error("syntax error: invalid command object: {0}")]
    InvalidCall(String),
}

/// Parses `name(arg, ...)` into a [`ParsedCommand`].
///
/// A comma always closes the current argument, even an empty one, but an empty
/// segment right before `)` is dropped: `f(1,,3)` yields `["1", "", "3"]`
/// while `f(1,2,)` yields `["1", "2"]` and `f()` yields no arguments.
pub fn parse(input: &str) -> Result<ParsedCommand, SyntaxError> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let mut chars = compact.chars();

    let mut name = String::new();
    loop {
        match chars.next() {
            Some('(') => break,
            Some(c) => name.push(c),
            None => return Err(SyntaxError::MissingOpenParen),
        }
    }

    let mut args = Vec::new();
    let mut current = String::new();
    loop {
        match chars.next() {
            Some(')') => {
                if !current.is_empty() {
                    args.push(current);
                }
                break;
            }
            Some(',') => args.push(std::mem::take(&mut current)),
            Some(c) => current.push(c),
            None => return Err(SyntaxError::MissingCloseParen),
        }
    }

    if chars.next().is_some() {
        return Err(SyntaxError::TrailingCharacters);
    }

    Ok(ParsedCommand { name, args })
}
