use log::Level;
use std::sync::{Arc, Mutex};
use tank_adapter_core::{EventListener, EventManager, EventPayload, Events, Logger};

/// What a listener saw for one notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub event: Events,
    pub sentence: String,
    /// The payload serialized to JSON.
    pub json: serde_json::Value,
    pub rows: Option<usize>,
    pub affected: Option<u64>,
    pub error_code: Option<i64>,
}

/// Listener keeping every notification it receives.
#[derive(Default, Debug)]
pub struct Recorder {
    events: Mutex<Vec<Recorded>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Default::default()
    }

    /// An event manager forwarding every event to `recorder`.
    pub fn manager(recorder: &Arc<Self>) -> EventManager {
        let mut manager = EventManager::new();
        manager.add_listener(Events::ALL, recorder.clone());
        manager
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.events.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn names(&self) -> Vec<Events> {
        self.recorded().into_iter().map(|v| v.event).collect()
    }
}

impl EventListener for Recorder {
    fn on_event(&self, event: Events, payload: &EventPayload<'_>) {
        let recorded = Recorded {
            event,
            sentence: payload.sentence().into(),
            json: serde_json::to_value(payload).unwrap_or_default(),
            rows: payload.result().and_then(|v| v.rows()).map(<[_]>::len),
            affected: payload.result().and_then(|v| v.rows_affected()),
            error_code: payload.error_value().and_then(|v| v.code()),
        };
        if let Ok(mut events) = self.events.lock() {
            events.push(recorded);
        }
    }
}

/// Logger keeping every line it receives.
#[derive(Default, Debug)]
pub struct MemoryLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Arc<Self> {
        Default::default()
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: Level, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.to_owned()));
        }
    }
}
