use crate::runtime::Event;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Calls the driver makes into its embedding page or application.
pub trait Host {
    /// Requested actions, comma separated, e.g. `fmt,ui,eval`.
    fn actions(&self) -> String;
    fn source(&self) -> String;
    fn report_error(&mut self, message: &str);
    /// Replaces the host's copy of the source after formatting changed it.
    fn set_source(&mut self, source: &str);
    fn prepare_ui(&mut self, names: &[String]);
    fn register_event_handler(&mut self, name: &str);
    /// Gives control back to the host scheduler for one tick.
    fn yield_now(&mut self, pause: Duration);
    /// Called once when the invocation is over, however it ended.
    fn after_stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Format,
    PrepareUi,
    Evaluate,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fmt" | "format" => Ok(Action::Format),
            "ui" | "prepare-ui" => Ok(Action::PrepareUi),
            "eval" | "evaluate" => Ok(Action::Evaluate),
            _ => Err(format!("unknown action {:?}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSet(HashSet<Action>);

impl ActionSet {
    pub fn parse(encoded: &str) -> Self {
        let mut actions = HashSet::new();
        for name in encoded.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match name.parse() {
                Ok(action) => {
                    actions.insert(action);
                }
                Err(err) => warn!("ignoring {}", err),
            }
        }
        Self(actions)
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0.contains(&action)
    }
}

#[derive(Debug, Error)]
#[error("event queue closed")]
pub struct QueueClosed(pub Event);

/// Producer half of the inbound event queue, held by the host.
#[derive(Debug, Clone)]
pub struct EventSender(Sender<Event>);

impl EventSender {
    pub fn push(&self, event: Event) -> Result<(), QueueClosed> {
        self.0.send(event).map_err(|err| QueueClosed(err.0))
    }
}

/// Consumer half of the inbound event queue, owned by the running session.
#[derive(Debug)]
pub struct EventQueue(Receiver<Event>);

impl EventQueue {
    /// Oldest pending event, if any. Never blocks.
    pub fn pop(&self) -> Option<Event> {
        match self.0.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

pub fn event_queue() -> (EventSender, EventQueue) {
    let (tx, rx) = mpsc::channel();
    (EventSender(tx), EventQueue(rx))
}

/// Cooperative cancellation flag. Checked between events, never mid-event.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
