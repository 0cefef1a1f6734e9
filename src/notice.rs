use std::sync::Mutex;

use event_emitter_rs::EventEmitter;

/// Event name for notices the user must see before continuing.
pub const FATAL: &str = "fatal";

/// User-facing notice channel.
///
/// The UI layer subscribes with [`Notices::on_fatal`]. Listeners run on
/// emitter threads, so delivery is asynchronous.
pub struct Notices {
    emitter: Mutex<EventEmitter>,
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}

impl Notices {
    pub fn new() -> Self {
        Self {
            emitter: Mutex::new(EventEmitter::new()),
        }
    }

    /// Register a listener for fatal notices. Returns the listener id.
    pub fn on_fatal<F>(&self, listener: F) -> Option<String>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let mut emitter = self.emitter.lock().ok()?;
        Some(emitter.on(FATAL, listener))
    }

    /// Log and broadcast a fatal notice.
    pub fn fatal(&self, message: &str) {
        tracing::error!(message, "fatal notice");
        match self.emitter.lock() {
            Ok(mut emitter) => {
                let _ = emitter.emit(FATAL, message.to_string());
            }
            Err(_) => tracing::error!("notice emitter poisoned; notice not delivered"),
        }
    }
}
