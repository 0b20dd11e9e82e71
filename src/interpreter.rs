//! Turns one line of client input into one line of output.
//!
//! Shared by the console and the network processor: recognizes the `help`
//! trigger, decodes structured call objects, otherwise parses function-call
//! syntax, then dispatches through the registry.

use std::fmt;
use std::sync::Arc;

use crate::commands::{parse, DispatchError, MachineCall, Registry, SyntaxError};

/// Input that returns the operation listing instead of being parsed.
pub const HELP_TRIGGER: &str = "help";

/// Result of interpreting one command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Rendered operation result (or the help listing).
    Success(String),
    /// The command text was malformed.
    ParseFailed(SyntaxError),
    /// The command parsed but could not be dispatched.
    CallFailed(DispatchError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Text sent back to the client. Failures carry a prefix naming the stage
/// that rejected the command.
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(text) => f.write_str(text),
            Self::ParseFailed(err) => write!(f, "Parser: {err}"),
            Self::CallFailed(err) => write!(f, "Caller: {err}"),
        }
    }
}

/// Cheap, cloneable front end over a shared registry.
#[derive(Debug, Clone)]
pub struct Interpreter {
    registry: Arc<Registry>,
}

impl Interpreter {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Interprets a single command.
    pub fn execute(&self, input: &str) -> Outcome {
        if input.trim() == HELP_TRIGGER {
            return Outcome::Success(self.registry.help().to_string());
        }

        if MachineCall::looks_like_json(input) {
            return match MachineCall::from_json(input) {
                Ok(call) => Self::finish(self.registry.call(&call)),
                Err(err) => Outcome::ParseFailed(err),
            };
        }

        match parse(input) {
            Ok(command) => Self::finish(self.registry.dispatch(&command.name, &command.args)),
            Err(err) => Outcome::ParseFailed(err),
        }
    }

    fn finish(result: Result<String, DispatchError>) -> Outcome {
        match result {
            Ok(text) => Outcome::Success(text),
            Err(err) => Outcome::CallFailed(err),
        }
    }
}
