#![cfg(target_os = "macos")]

// macOS keyboard injection using CGEvent posted to the HID event tap

use crate::models::input::{InputError, InputResult, KeyEventType, VirtualKey};
use crate::platform::input::InputSink;
use core_graphics::event::{CGEvent, CGEventTapLocation};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use tracing::warn;

/// macOS arrow-key injector
pub struct MacOSKeyboardSink {
    source: CGEventSource,
}

impl MacOSKeyboardSink {
    pub fn new() -> InputResult<Self> {
        let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState).map_err(|_| {
            InputError::PermissionDenied(
                "Could not create event source. Enable Accessibility access in System Settings > Privacy & Security > Accessibility"
                    .to_string(),
            )
        })?;

        Ok(Self { source })
    }

    fn send(&self, key: VirtualKey, event_type: KeyEventType) {
        let keydown = matches!(event_type, KeyEventType::KeyDown);

        match CGEvent::new_keyboard_event(self.source.clone(), key.macos_keycode(), keydown) {
            Ok(event) => event.post(CGEventTapLocation::HID),
            Err(_) => warn!(
                key = key.to_string(),
                event = event_type.to_string(),
                "Failed to create keyboard CGEvent"
            ),
        }
    }
}

impl InputSink for MacOSKeyboardSink {
    fn press(&mut self, key: VirtualKey) {
        self.send(key, KeyEventType::KeyDown);
    }

    fn release(&mut self, key: VirtualKey) {
        self.send(key, KeyEventType::KeyUp);
    }

    fn name(&self) -> &str {
        "macos-cgevent"
    }
}
