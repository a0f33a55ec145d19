//! Front end and host execution driver for the evy language.
//!
//! [`lexer`] turns source text into [`token::Token`]s for the parser.
//! [`driver`] runs one host invocation: parse, format, prepare the UI,
//! evaluate and dispatch host events to the program's handlers. The parser,
//! evaluator and host are supplied by the embedder through the traits in
//! [`runtime`] and [`host`].

pub mod config;
pub mod driver;
pub mod error;
pub mod host;
pub mod lexer;
pub mod runtime;
pub mod token;
pub mod yielder;

mod unquote;

#[cfg(test)]
mod test_helpers;

pub use config::Config;
pub use driver::Driver;
pub use error::{ConfigError, Diagnostic, DriverError, EvalError, ParseErrors};
pub use host::{Action, ActionSet, EventSender, Host, StopHandle};
pub use lexer::Lexer;
pub use runtime::{Evaluator, Event, Parser, ParserBuiltins, Program, Runtime, SignatureProvider};
pub use token::{Kind, Token};
