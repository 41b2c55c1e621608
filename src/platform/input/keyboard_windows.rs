#![cfg(target_os = "windows")]

use crate::models::input::{InputResult, KeyEventType, VirtualKey};
use crate::platform::input::InputSink;
use tracing::warn;

use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP,
    VIRTUAL_KEY,
};

/// Injects arrow keys through `SendInput`
pub struct WindowsKeyboardSink;

impl WindowsKeyboardSink {
    pub fn new() -> InputResult<Self> {
        Ok(Self)
    }

    fn build_input(key: VirtualKey, event_type: KeyEventType) -> INPUT {
        let flags = match event_type {
            KeyEventType::KeyDown => KEYBD_EVENT_FLAGS(0),
            KeyEventType::KeyUp => KEYEVENTF_KEYUP,
        };

        INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(key.windows_vk()),
                    wScan: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        }
    }

    fn send(&self, key: VirtualKey, event_type: KeyEventType) {
        let inputs = [Self::build_input(key, event_type)];

        // SendInput returns how many events made it into the input stream
        let sent = unsafe { SendInput(&inputs, std::mem::size_of::<INPUT>() as i32) };

        if sent != inputs.len() as u32 {
            warn!(
                key = key.to_string(),
                event = event_type.to_string(),
                error = %windows::core::Error::from_win32(),
                "SendInput rejected synthetic key event"
            );
        }
    }
}

impl InputSink for WindowsKeyboardSink {
    fn press(&mut self, key: VirtualKey) {
        self.send(key, KeyEventType::KeyDown);
    }

    fn release(&mut self, key: VirtualKey) {
        self.send(key, KeyEventType::KeyUp);
    }

    fn name(&self) -> &str {
        "windows-sendinput"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_input_flags() {
        let down = WindowsKeyboardSink::build_input(VirtualKey::Left, KeyEventType::KeyDown);
        let up = WindowsKeyboardSink::build_input(VirtualKey::Left, KeyEventType::KeyUp);

        unsafe {
            assert_eq!(down.Anonymous.ki.wVk, VIRTUAL_KEY(0x25));
            assert_eq!(down.Anonymous.ki.dwFlags, KEYBD_EVENT_FLAGS(0));
            assert_eq!(up.Anonymous.ki.dwFlags, KEYEVENTF_KEYUP);
        }
        assert_eq!(down.r#type, INPUT_KEYBOARD);
    }
}
