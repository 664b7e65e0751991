use crate::{Error, EventPayload};
use serde::Serialize;
use std::{
    collections::HashMap,
    fmt::{self, Display},
    str::FromStr,
    sync::Arc,
};

/// Names of the notifications emitted around each operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Events {
    #[serde(rename = "before-query")]
    BeforeQuery,
    #[serde(rename = "after-query")]
    AfterQuery,
    #[serde(rename = "before-non-query")]
    BeforeNonQuery,
    #[serde(rename = "after-non-query")]
    AfterNonQuery,
    #[serde(rename = "on-error")]
    OnError,
}

impl Events {
    pub const ALL: [Events; 5] = [
        Events::BeforeQuery,
        Events::AfterQuery,
        Events::BeforeNonQuery,
        Events::AfterNonQuery,
        Events::OnError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Events::BeforeQuery => "before-query",
            Events::AfterQuery => "after-query",
            Events::BeforeNonQuery => "before-non-query",
            Events::AfterNonQuery => "after-non-query",
            Events::OnError => "on-error",
        }
    }
}

impl Display for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Events {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Events::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| Error::msg(format!("Unknown event `{}`", s)))
    }
}

/// Receives the notifications of an adapter.
pub trait NotificationSink: Send + Sync {
    fn dispatch(&self, event: Events, payload: &EventPayload<'_>);
}

/// Listener registered in an [`EventManager`].
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: Events, payload: &EventPayload<'_>);
}

impl<F> EventListener for F
where
    F: Fn(Events, &EventPayload<'_>) + Send + Sync,
{
    fn on_event(&self, event: Events, payload: &EventPayload<'_>) {
        self(event, payload)
    }
}

/// Name keyed dispatcher: every listener of an event is called, in registration order.
///
/// Listeners are registered while the manager is exclusively owned, then the manager is shared
/// with the adapters (usually inside an `Arc`).
#[derive(Default, Clone)]
pub struct EventManager {
    listeners: HashMap<Events, Vec<Arc<dyn EventListener>>>,
}

impl EventManager {
    pub fn new() -> Self {
        Default::default()
    }

    /// Register `listener` for each of `events`.
    pub fn add_listener(
        &mut self,
        events: impl IntoIterator<Item = Events>,
        listener: Arc<dyn EventListener>,
    ) -> &mut Self {
        for event in events {
            self.listeners
                .entry(event)
                .or_default()
                .push(listener.clone());
        }
        self
    }

    /// Remove `listener` (compared by identity) from each of `events`.
    pub fn remove_listener(
        &mut self,
        events: impl IntoIterator<Item = Events>,
        listener: &Arc<dyn EventListener>,
    ) -> &mut Self {
        for event in events {
            if let Some(listeners) = self.listeners.get_mut(&event) {
                listeners.retain(|v| !Arc::ptr_eq(v, listener));
                if listeners.is_empty() {
                    self.listeners.remove(&event);
                }
            }
        }
        self
    }

    pub fn has_listeners(&self, event: Events) -> bool {
        self.listeners.get(&event).is_some_and(|v| !v.is_empty())
    }

    pub fn listeners(&self, event: Events) -> &[Arc<dyn EventListener>] {
        self.listeners.get(&event).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl NotificationSink for EventManager {
    fn dispatch(&self, event: Events, payload: &EventPayload<'_>) {
        let listeners = self.listeners(event);
        log::trace!("Dispatching `{}` to {} listeners", event, listeners.len());
        for listener in listeners {
            listener.on_event(event, payload);
        }
    }
}

impl fmt::Debug for EventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for event in Events::ALL {
            if let Some(listeners) = self.listeners.get(&event) {
                map.entry(&event.as_str(), &listeners.len());
            }
        }
        map.finish()
    }
}
