use std::fmt;

use serde_json::Value;

use super::TransportError;

type LifecycleCallback = Box<dyn Fn() + Send + Sync>;
type MessageCallback = Box<dyn Fn(Value) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&TransportError) + Send + Sync>;

/// Callbacks invoked from the connection task.
///
/// Every slot is optional. Callbacks run on the runtime worker driving the
/// connection and must not block.
#[derive(Default)]
pub struct SocketHandlers {
    on_open: Option<LifecycleCallback>,
    on_message: Option<MessageCallback>,
    on_close: Option<LifecycleCallback>,
    on_error: Option<ErrorCallback>,
}

impl SocketHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_open(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    pub fn on_message(mut self, f: impl Fn(Value) + Send + Sync + 'static) -> Self {
        self.on_message = Some(Box::new(f));
        self
    }

    pub fn on_close(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&TransportError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub(crate) fn open(&self) {
        if let Some(f) = &self.on_open {
            f();
        }
    }

    pub(crate) fn message(&self, payload: Value) {
        if let Some(f) = &self.on_message {
            f(payload);
        }
    }

    pub(crate) fn close(&self) {
        if let Some(f) = &self.on_close {
            f();
        }
    }

    pub(crate) fn error(&self, err: &TransportError) {
        if let Some(f) = &self.on_error {
            f(err);
        }
    }
}

impl fmt::Debug for SocketHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketHandlers")
            .field("on_open", &self.on_open.is_some())
            .field("on_message", &self.on_message.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
