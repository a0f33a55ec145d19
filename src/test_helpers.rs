//! Stand-ins for the parser, evaluator and host used by the driver tests.
//!
//! The fake language is line based and built on the real lexer: an illegal
//! token is a parse error, `on <name>` declares an event handler and any
//! identifier naming a builtin counts as a call.

use crate::error::{Diagnostic, EvalError, ParseErrors};
use crate::host::{EventSender, Host, StopHandle};
use crate::lexer::Lexer;
use crate::runtime::{
    Evaluator, Event, FuncSignature, Parser, ParserBuiltins, Program, Runtime, SignatureProvider,
};
use crate::token::Kind;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const FUNCS: &[&str] = &["print", "move", "exit", "panic"];
const EVENT_HANDLERS: &[&str] = &["key", "down", "up"];

#[derive(Debug, Clone)]
pub struct FakeProgram {
    source: String,
    format_suffix: String,
    calls: Vec<String>,
    handlers: Vec<String>,
}

impl Program for FakeProgram {
    fn format(&self) -> String {
        let lines: Vec<String> = self
            .source
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect();
        lines.join("\n") + &self.format_suffix
    }

    fn called_builtins(&self) -> Vec<String> {
        self.calls.clone()
    }

    fn event_handler_names(&self) -> Vec<String> {
        self.handlers.clone()
    }
}

#[derive(Debug, Default)]
pub struct FakeParser {
    /// Appended by `format`, to simulate a formatter that breaks programs.
    pub format_suffix: String,
    pub parses: Rc<RefCell<Vec<String>>>,
}

impl FakeParser {
    pub fn parses(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.parses)
    }
}

impl Parser for FakeParser {
    type Program = FakeProgram;

    fn parse(&self, source: &str, builtins: &ParserBuiltins) -> Result<FakeProgram, ParseErrors> {
        self.parses.borrow_mut().push(source.to_string());

        let tokens: Vec<_> = Lexer::new(source)
            .filter(|t| !matches!(t.kind, Kind::Ws | Kind::Comment))
            .collect();
        let mut errors = Vec::new();
        let mut calls: Vec<String> = Vec::new();
        let mut handlers = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let text = token.text.clone().unwrap_or_default();
            match token.kind {
                Kind::Illegal => {
                    errors.push(Diagnostic::from_token(token, format!("unexpected {}", text)));
                }
                Kind::On => match tokens.get(i + 1) {
                    Some(next) if next.kind == Kind::Ident => {
                        let name = next.text.clone().unwrap_or_default();
                        if !builtins.is_event_handler(&name) {
                            errors.push(Diagnostic::from_token(
                                next,
                                format!("unknown event handler {}", name),
                            ));
                        }
                        handlers.push(name);
                    }
                    _ => errors.push(Diagnostic::from_token(token, "expected event handler name")),
                },
                Kind::Ident if builtins.is_func(&text) && !calls.contains(&text) => {
                    calls.push(text);
                }
                _ => {}
            }
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }
        Ok(FakeProgram {
            source: source.to_string(),
            format_suffix: self.format_suffix.clone(),
            calls,
            handlers,
        })
    }
}

/// Shares one log between the runtime and every evaluator it builds.
#[derive(Debug, Clone, Default)]
pub struct FakeRuntime {
    log: Rc<RefCell<Vec<String>>>,
}

impl FakeRuntime {
    pub fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

impl SignatureProvider for FakeRuntime {
    fn parser_builtins(&self) -> ParserBuiltins {
        let signature = |name: &&str| (name.to_string(), FuncSignature::default());
        ParserBuiltins {
            funcs: FUNCS.iter().map(signature).collect(),
            event_handlers: EVENT_HANDLERS.iter().map(signature).collect(),
        }
    }
}

impl Runtime<FakeProgram> for FakeRuntime {
    type Evaluator = FakeEvaluator;

    fn evaluator(&self) -> FakeEvaluator {
        FakeEvaluator {
            log: Rc::clone(&self.log),
            handlers: Vec::new(),
            stopped: false,
        }
    }
}

/// `exit` stops evaluation, `panic` fails it. Events are logged by name;
/// `halt` stops the program, `quit` returns the stop sentinel without
/// flagging it and `fail` errors.
#[derive(Debug)]
pub struct FakeEvaluator {
    log: Rc<RefCell<Vec<String>>>,
    handlers: Vec<String>,
    stopped: bool,
}

impl Evaluator for FakeEvaluator {
    type Program = FakeProgram;

    fn run(&mut self, program: &FakeProgram) -> Result<(), EvalError> {
        if program.calls.iter().any(|c| c == "panic") {
            return Err(EvalError::Runtime(String::from("panic called")));
        }
        if program.calls.iter().any(|c| c == "exit") {
            self.stopped = true;
            return Err(EvalError::Stopped);
        }
        self.log.borrow_mut().push(String::from("run"));
        self.handlers = program.handlers.clone();
        Ok(())
    }

    fn event_handler_names(&self) -> Vec<String> {
        self.handlers.clone()
    }

    fn handle_event(&mut self, event: Event) -> Result<(), EvalError> {
        self.log.borrow_mut().push(event.name.clone());
        match event.name.as_str() {
            "halt" => self.stopped = true,
            "quit" => return Err(EvalError::Stopped),
            "fail" => return Err(EvalError::Runtime(format!("event {} failed", event.name))),
            _ => {}
        }
        Ok(())
    }

    fn stopped(&self) -> bool {
        self.stopped
    }
}

/// Records every call the driver makes. On each yield it delivers the next
/// pending event, if any, otherwise it may stop the program.
#[derive(Debug, Default)]
pub struct FakeHost {
    actions: String,
    source: String,
    pub errors: Vec<String>,
    pub sources: Vec<String>,
    pub prepared: Vec<Vec<String>>,
    pub registered: Vec<String>,
    pub pauses: Vec<Duration>,
    pub after_stop_calls: usize,
    feed: Option<(EventSender, Vec<Event>)>,
    stop: Option<(StopHandle, usize)>,
}

impl FakeHost {
    pub fn new(actions: &str, source: &str) -> Self {
        Self {
            actions: actions.to_string(),
            source: source.to_string(),
            ..Self::default()
        }
    }

    pub fn feeding(mut self, sender: EventSender, events: Vec<Event>) -> Self {
        self.feed = Some((sender, events));
        self
    }

    /// Stops the program on the `after`-th yield.
    pub fn stopping(mut self, stop: StopHandle, after: usize) -> Self {
        self.stop = Some((stop, after));
        self
    }
}

impl Host for FakeHost {
    fn actions(&self) -> String {
        self.actions.clone()
    }

    fn source(&self) -> String {
        self.source.clone()
    }

    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn set_source(&mut self, source: &str) {
        self.sources.push(source.to_string());
        self.source = source.to_string();
    }

    fn prepare_ui(&mut self, names: &[String]) {
        self.prepared.push(names.to_vec());
    }

    fn register_event_handler(&mut self, name: &str) {
        self.registered.push(name.to_string());
    }

    fn yield_now(&mut self, pause: Duration) {
        self.pauses.push(pause);
        assert!(self.pauses.len() < 1000, "event loop never stopped");

        if let Some((sender, events)) = &mut self.feed {
            if !events.is_empty() {
                sender.push(events.remove(0)).unwrap();
                return;
            }
        }
        if let Some((stop, after)) = &self.stop {
            if self.pauses.len() >= *after {
                stop.stop();
            }
        }
    }

    fn after_stop(&mut self) {
        self.after_stop_calls += 1;
    }
}
