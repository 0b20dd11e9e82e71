//! Command parsing and dispatch.
//!
//! Keeps parsing (text to name and raw arguments) separate from dispatch
//! (type checking and invocation), so each can be tested on its own.

pub mod builtin;
pub mod call;
pub mod parser;
pub mod registry;
pub mod value;

pub use builtin::{builtin_registry, register_builtins, DEFAULT_GRID_SIZE};
pub use call::MachineCall;
pub use parser::{parse, ParsedCommand, SyntaxError};
pub use registry::{DispatchError, Handler, Operation, Registry, RegistryBuilder};
pub use value::{FromArg, IntoValue, Kind, Value};
