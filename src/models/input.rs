// Data models for synthetic keyboard events

use serde::{Deserialize, Serialize};

// ==============================================================================
// Virtual Keys
// ==============================================================================

/// Keys the controller can hold down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VirtualKey {
    Up,
    Down,
    Left,
    Right,
}

impl VirtualKey {
    pub const ALL: [VirtualKey; 4] = [
        VirtualKey::Up,
        VirtualKey::Down,
        VirtualKey::Left,
        VirtualKey::Right,
    ];

    pub fn to_string(&self) -> &'static str {
        match self {
            VirtualKey::Up => "up",
            VirtualKey::Down => "down",
            VirtualKey::Left => "left",
            VirtualKey::Right => "right",
        }
    }

    /// Win32 virtual-key code (VK_UP, VK_DOWN, VK_LEFT, VK_RIGHT)
    pub fn windows_vk(&self) -> u16 {
        match self {
            VirtualKey::Up => 0x26,
            VirtualKey::Down => 0x28,
            VirtualKey::Left => 0x25,
            VirtualKey::Right => 0x27,
        }
    }

    /// Linux input event code (KEY_UP, KEY_DOWN, KEY_LEFT, KEY_RIGHT)
    pub fn linux_keycode(&self) -> u16 {
        match self {
            VirtualKey::Up => 103,
            VirtualKey::Down => 108,
            VirtualKey::Left => 105,
            VirtualKey::Right => 106,
        }
    }

    /// macOS virtual keycode (kVK_UpArrow and friends)
    pub fn macos_keycode(&self) -> u16 {
        match self {
            VirtualKey::Up => 126,
            VirtualKey::Down => 125,
            VirtualKey::Left => 123,
            VirtualKey::Right => 124,
        }
    }
}

// ==============================================================================
// Keyboard Events
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyEventType {
    KeyDown,
    KeyUp,
}

impl KeyEventType {
    pub fn to_string(&self) -> &'static str {
        match self {
            KeyEventType::KeyDown => "key_down",
            KeyEventType::KeyUp => "key_up",
        }
    }
}

/// A synthetic key event handed to the input sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyEvent {
    pub timestamp: i64,
    pub event_type: KeyEventType,
    pub key: VirtualKey,
}

impl KeyEvent {
    pub fn down(key: VirtualKey) -> Self {
        Self::now(KeyEventType::KeyDown, key)
    }

    pub fn up(key: VirtualKey) -> Self {
        Self::now(KeyEventType::KeyUp, key)
    }

    fn now(event_type: KeyEventType, key: VirtualKey) -> Self {
        Self {
            timestamp: chrono::Utc::now().timestamp_millis(),
            event_type,
            key,
        }
    }

    /// Compare kind and key, ignoring when the event happened
    pub fn same_as(&self, event_type: KeyEventType, key: VirtualKey) -> bool {
        self.event_type == event_type && self.key == key
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Input device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Synthetic input not supported on this platform")]
    NotSupported,
}

pub type InputResult<T> = Result<T, InputError>;
