//! Operation registry and type-checked dispatch.
//!
//! Operations are registered once at startup from plain Rust functions or
//! closures. The parameter and result kinds are taken from the function
//! signature at registration time, and every operation is stored behind the
//! same uniform signature `Vec<Value> -> Value`. After [`RegistryBuilder::build`]
//! the registry is immutable and can be shared freely.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::call::MachineCall;
use super::value::{FromArg, IntoValue, Kind, Value};

/// Failure to invoke an operation from textual arguments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("wrong number of arguments: expected {expected}, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("argument {index} must be {expected}, got '{raw}'")]
    TypeMismatch {
        /// Zero-based parameter position.
        index: usize,
        expected: Kind,
        raw: String,
    },
}

type Invoke = Arc<dyn Fn(Vec<Value>) -> Result<Value, DispatchError> + Send + Sync>;

/// A function that can be registered as an operation.
///
/// Implemented for closures and `fn` items of up to four parameters whose
/// parameter types implement [`FromArg`] and whose result implements
/// [`IntoValue`]. `Args` is a marker tuple of the parameter types.
pub trait Handler<Args>: Send + Sync + 'static {
    /// Declared parameter kinds, in order.
    fn params() -> Vec<Kind>;

    /// Declared result kind.
    fn returns() -> Option<Kind>;

    /// Invokes the handler with values already converted to the declared kinds.
    fn invoke(&self, args: Vec<Value>) -> Result<Value, DispatchError>;
}

macro_rules! impl_handler {
    ($($ty:ident),*) => {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<F, R, $($ty,)*> Handler<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> R + Send + Sync + 'static,
            R: IntoValue,
            $($ty: FromArg,)*
        {
            fn params() -> Vec<Kind> {
                vec![$(<$ty as FromArg>::KIND),*]
            }

            fn returns() -> Option<Kind> {
                R::KIND
            }

            fn invoke(&self, args: Vec<Value>) -> Result<Value, DispatchError> {
                let got = args.len();
                let expected = <Self as Handler<($($ty,)*)>>::params().len();
                if got != expected {
                    return Err(DispatchError::ArityMismatch { expected, got });
                }
                let mut args = args.into_iter().enumerate();
                $(
                    let $ty = match args.next() {
                        Some((index, value)) => {
                            let raw = value.to_string();
                            <$ty as FromArg>::from_value(value).ok_or(
                                DispatchError::TypeMismatch {
                                    index,
                                    expected: <$ty as FromArg>::KIND,
                                    raw,
                                },
                            )?
                        }
                        None => return Err(DispatchError::ArityMismatch { expected, got }),
                    };
                )*
                Ok((self)($($ty),*).into_value())
            }
        }
    };
}

impl_handler!();
impl_handler!(A);
impl_handler!(A, B);
impl_handler!(A, B, C);
impl_handler!(A, B, C, D);

/// A registered operation: name, signature, and invocation procedure.
#[derive(Clone)]
pub struct Operation {
    name: String,
    params: Vec<Kind>,
    returns: Option<Kind>,
    invoke: Invoke,
}

impl Operation {
    /// Creates an operation from explicitly declared kinds.
    ///
    /// The invocation closure receives values whose kinds match `params`.
    pub fn new<F>(
        name: impl Into<String>,
        params: Vec<Kind>,
        returns: Option<Kind>,
        invoke: F,
    ) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, DispatchError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            returns,
            invoke: Arc::new(invoke),
        }
    }

    /// Creates an operation from a typed handler, reading its kinds from the
    /// handler's signature.
    pub fn from_handler<H, Args>(name: impl Into<String>, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        let handler = Arc::new(handler);
        Self {
            name: name.into(),
            params: <H as Handler<Args>>::params(),
            returns: <H as Handler<Args>>::returns(),
            invoke: Arc::new(move |args| <H as Handler<Args>>::invoke(&handler, args)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Kind] {
        &self.params
    }

    pub fn returns(&self) -> Option<Kind> {
        self.returns
    }

    /// Returns the help line `name(kind, ...) -> kind`.
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(Kind::name).collect();
        let returns = self.returns.map_or("none", |kind| kind.name());
        format!("{}({}) -> {}", self.name, params.join(", "), returns)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

/// Collects operations before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    operations: HashMap<String, Operation>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a typed handler under `name`.
    ///
    /// # Panics
    ///
    /// Panics if an operation with the same name is already registered.
    pub fn register<H, Args>(&mut self, name: &str, handler: H) -> &mut Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.register_operation(Operation::from_handler(name, handler))
    }

    /// Registers a fully described operation.
    ///
    /// # Panics
    ///
    /// Panics if an operation with the same name is already registered.
    pub fn register_operation(&mut self, operation: Operation) -> &mut Self {
        let name = operation.name.clone();
        if self.operations.insert(name.clone(), operation).is_some() {
            panic!("operation '{name}' registered twice");
        }
        self
    }

    /// Freezes the registry and renders the help listing.
    pub fn build(self) -> Registry {
        let mut signatures: Vec<String> =
            self.operations.values().map(Operation::signature).collect();
        signatures.sort();

        let mut help = String::from("Available operations:");
        for signature in &signatures {
            help.push_str("\n  ");
            help.push_str(signature);
        }

        Registry {
            operations: self.operations,
            help,
        }
    }
}

/// Read-only table of operations.
#[derive(Debug)]
pub struct Registry {
    operations: HashMap<String, Operation>,
    help: String,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Looks up an operation by name.
    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    /// Returns all operation names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns the cached help listing.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Converts `args` to the operation's declared kinds and invokes it.
    pub fn evaluate(&self, name: &str, args: &[String]) -> Result<Value, DispatchError> {
        let operation = self
            .operations
            .get(name)
            .ok_or_else(|| DispatchError::UnknownOperation(name.to_string()))?;

        if args.len() != operation.params.len() {
            return Err(DispatchError::ArityMismatch {
                expected: operation.params.len(),
                got: args.len(),
            });
        }

        let values = operation
            .params
            .iter()
            .zip(args)
            .enumerate()
            .map(|(index, (kind, raw))| {
                kind.convert(raw).ok_or_else(|| DispatchError::TypeMismatch {
                    index,
                    expected: *kind,
                    raw: raw.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        (operation.invoke)(values)
    }

    /// Dispatches a parsed command and renders the result as text.
    pub fn dispatch(&self, name: &str, args: &[String]) -> Result<String, DispatchError> {
        self.evaluate(name, args).map(|value| value.to_string())
    }

    /// Dispatches a structured call object.
    pub fn call(&self, call: &MachineCall) -> Result<String, DispatchError> {
        self.dispatch(&call.name, &call.args())
    }
}
