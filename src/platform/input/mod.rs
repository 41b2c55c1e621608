// Synthetic keyboard input - injects key presses into the focused application

use crate::models::input::{InputResult, KeyEvent, VirtualKey};
use std::sync::{Arc, Mutex};
use tracing::info;

#[cfg(target_os = "macos")]
pub mod keyboard_macos;
#[cfg(target_os = "macos")]
pub use keyboard_macos::MacOSKeyboardSink;

#[cfg(target_os = "windows")]
pub mod keyboard_windows;
#[cfg(target_os = "windows")]
pub use keyboard_windows::WindowsKeyboardSink;

#[cfg(target_os = "linux")]
pub mod keyboard_linux;
#[cfg(target_os = "linux")]
pub use keyboard_linux::LinuxKeyboardSink;

/// OS facility that delivers synthetic key events.
///
/// Calls are fire-and-forget: implementations log delivery failures and never
/// report them back to the caller.
pub trait InputSink {
    fn press(&mut self, key: VirtualKey);

    fn release(&mut self, key: VirtualKey);

    /// Human readable backend name
    fn name(&self) -> &str;
}

impl<S: InputSink + ?Sized> InputSink for Box<S> {
    fn press(&mut self, key: VirtualKey) {
        (**self).press(key)
    }

    fn release(&mut self, key: VirtualKey) {
        (**self).release(key)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Get the keyboard injector for the current platform
pub fn get_input_sink() -> InputResult<Box<dyn InputSink>> {
    #[cfg(target_os = "macos")]
    {
        Ok(Box::new(MacOSKeyboardSink::new()?))
    }

    #[cfg(target_os = "windows")]
    {
        Ok(Box::new(WindowsKeyboardSink::new()?))
    }

    #[cfg(target_os = "linux")]
    {
        Ok(Box::new(LinuxKeyboardSink::new()?))
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        Err(crate::models::input::InputError::NotSupported)
    }
}

// ==============================================================================
// Dry-run and recording sinks
// ==============================================================================

/// Logs every call instead of touching the OS
#[derive(Debug, Default)]
pub struct LoggingSink;

impl InputSink for LoggingSink {
    fn press(&mut self, key: VirtualKey) {
        info!(key = key.to_string(), "dry-run key down");
    }

    fn release(&mut self, key: VirtualKey) {
        info!(key = key.to_string(), "dry-run key up");
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}

/// Records every call into a shared buffer that outlives the sink
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<KeyEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the calls received so far
    pub fn events(&self) -> Vec<KeyEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn push(&self, event: KeyEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

impl InputSink for RecordingSink {
    fn press(&mut self, key: VirtualKey) {
        self.push(KeyEvent::down(key));
    }

    fn release(&mut self, key: VirtualKey) {
        self.push(KeyEvent::up(key));
    }

    fn name(&self) -> &str {
        "recording"
    }
}
