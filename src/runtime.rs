//! Contracts between the driver and the pieces it runs but does not own:
//! the parser, the program it builds, the evaluator and the builtin catalog.
//!
//! The catalog is split in two. [`SignatureProvider`] hands the parser the
//! names and signatures it needs to check calls statically. [`Runtime`]
//! additionally builds evaluators wired to the side-effecting builtins, so
//! parsing never needs the ability to perform effects.

use crate::error::{EvalError, ParseErrors};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FuncSignature {
    pub params: Vec<String>,
    pub variadic: bool,
    pub result: Option<String>,
}

/// What the parser is allowed to know about builtins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParserBuiltins {
    pub funcs: BTreeMap<String, FuncSignature>,
    pub event_handlers: BTreeMap<String, FuncSignature>,
}

impl ParserBuiltins {
    pub fn is_func(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    pub fn is_event_handler(&self, name: &str) -> bool {
        self.event_handlers.contains_key(name)
    }
}

/// An external occurrence the host forwards to the program's handlers,
/// e.g. `{"name": "down", "params": [12.5, 40]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl Event {
    pub fn new(name: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

pub trait SignatureProvider {
    fn parser_builtins(&self) -> ParserBuiltins;
}

pub trait Program {
    /// Canonical source text of the program.
    fn format(&self) -> String;
    /// Builtin functions the program calls, in first-call order.
    fn called_builtins(&self) -> Vec<String>;
    /// Event handlers the program declares, in declaration order.
    fn event_handler_names(&self) -> Vec<String>;
}

pub trait Parser {
    type Program: Program;

    fn parse(&self, source: &str, builtins: &ParserBuiltins) -> Result<Self::Program, ParseErrors>;
}

pub trait Evaluator {
    type Program;

    fn run(&mut self, program: &Self::Program) -> Result<(), EvalError>;
    /// Handlers registered by the last `run`, in registration order.
    fn event_handler_names(&self) -> Vec<String>;
    fn handle_event(&mut self, event: Event) -> Result<(), EvalError>;
    fn stopped(&self) -> bool;
}

pub trait Runtime<P>: SignatureProvider {
    type Evaluator: Evaluator<Program = P>;

    /// A fresh evaluator bound to the full, effectful builtin catalog.
    fn evaluator(&self) -> Self::Evaluator;
}
