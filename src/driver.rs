//! Per-invocation pipeline run on behalf of the host.
//!
//! One call to [`Driver::run`] reads the requested actions and the source
//! from the host, parses, optionally reformats, optionally tells the host
//! which UI pieces the program needs, optionally evaluates and, if the
//! program registered event handlers, keeps dispatching host events until
//! it is stopped. Every fatal error is reported to the host exactly once
//! and ends the invocation.

use crate::config::Config;
use crate::error::{DriverError, EvalError, ParseErrors};
use crate::host::{event_queue, Action, ActionSet, EventQueue, EventSender, Host, StopHandle};
use crate::runtime::{Evaluator, Parser, Program, Runtime};
use crate::yielder::SleepingYielder;
use std::collections::HashSet;
use tracing::{debug, info};

pub struct Driver<P, R> {
    parser: P,
    runtime: R,
    config: Config,
    sender: EventSender,
    queue: EventQueue,
    stop: StopHandle,
}

impl<P, R> Driver<P, R>
where
    P: Parser,
    R: Runtime<P::Program>,
{
    pub fn new(parser: P, runtime: R, config: Config) -> Self {
        let (sender, queue) = event_queue();
        Self {
            parser,
            runtime,
            config,
            sender,
            queue,
            stop: StopHandle::default(),
        }
    }

    /// Handle the host uses to feed events to a running program.
    pub fn event_sender(&self) -> EventSender {
        self.sender.clone()
    }

    /// Handle the host uses to stop a running program between events.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Runs one invocation to completion. Errors have already been reported
    /// to the host when this returns; they are handed back for the caller's
    /// own bookkeeping.
    pub fn run<H: Host>(self, host: &mut H) -> Result<(), DriverError> {
        let result = self.execute(host);
        if let Err(err) = &result {
            debug!(step = err.step(), error = %err, "invocation failed");
            host.report_error(&err.to_string());
        }
        host.after_stop();
        result
    }

    fn execute<H: Host>(self, host: &mut H) -> Result<(), DriverError> {
        let actions = ActionSet::parse(&host.actions());
        let source = host.source();

        let mut program = self.parse(&source).map_err(DriverError::Parse)?;

        if actions.contains(Action::Format) {
            debug!("formatting source");
            let formatted = program.format();
            if formatted != source {
                info!("formatting changed the source");
                host.set_source(&formatted);
                program = self.parse(&formatted).map_err(DriverError::FormatRoundTrip)?;
            }
        }

        if actions.contains(Action::PrepareUi) {
            let names = ui_names(&program);
            debug!(?names, "preparing ui");
            host.prepare_ui(&names);
        }

        if actions.contains(Action::Evaluate) {
            debug!("evaluating program");
            let mut evaluator = self.runtime.evaluator();
            match evaluator.run(&program) {
                Ok(()) => {}
                Err(EvalError::Stopped) => return Ok(()),
                Err(err) => return Err(DriverError::Eval(err)),
            }
            let session = Session {
                evaluator,
                queue: self.queue,
                stop: self.stop,
                yielder: SleepingYielder::new(self.config.yield_pause()),
            };
            session.handle_events(host)?;
        }

        Ok(())
    }

    fn parse(&self, source: &str) -> Result<P::Program, ParseErrors> {
        let builtins = self.runtime.parser_builtins();
        self.parser
            .parse(source, &builtins)
            .map_err(|errors| errors.truncate(self.config.max_errors))
    }
}

/// Called builtins followed by declared event handlers, without repeats.
fn ui_names<T: Program>(program: &T) -> Vec<String> {
    let mut seen = HashSet::new();
    program
        .called_builtins()
        .into_iter()
        .chain(program.event_handler_names())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Live state of one evaluated program. Dropped when the event loop ends.
struct Session<E> {
    evaluator: E,
    queue: EventQueue,
    stop: StopHandle,
    yielder: SleepingYielder,
}

impl<E: Evaluator> Session<E> {
    fn stopped(&self) -> bool {
        self.stop.is_stopped() || self.evaluator.stopped()
    }

    fn handle_events<H: Host>(mut self, host: &mut H) -> Result<(), DriverError> {
        let names = self.evaluator.event_handler_names();
        if names.is_empty() {
            return Ok(());
        }
        for name in &names {
            host.register_event_handler(name);
        }
        info!(handlers = ?names, "entering event loop");

        loop {
            if self.stopped() {
                info!("event loop stopped");
                return Ok(());
            }
            match self.queue.pop() {
                Some(event) => {
                    let event_name = event.name.clone();
                    debug!(
                        event = %event_name,
                        since_yield = ?self.yielder.elapsed(),
                        "dispatching event"
                    );
                    self.yielder.reset();
                    match self.evaluator.handle_event(event) {
                        Ok(()) => {}
                        Err(EvalError::Stopped) => {
                            info!(event = %event_name, "handler stopped the program");
                            return Ok(());
                        }
                        Err(err) => return Err(DriverError::Event(err)),
                    }
                }
                None => self.yielder.force_yield(host),
            }
        }
    }
}
