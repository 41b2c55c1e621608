use crate::core::config::KeyBindings;
use crate::models::gesture::Action;
use crate::models::input::{KeyEvent, VirtualKey};
use crate::platform::input::InputSink;
use tracing::debug;

/// Tracks which key the controller is holding and reconciles it with each new action.
///
/// At most one key is ever held. A key is pressed on the first frame an action
/// selects it and released on the first frame the action stops selecting it;
/// frames that repeat the current action issue no calls at all.
///
/// Dropping the controller releases the held key, so the key is never left
/// stuck down when the frame loop exits early or unwinds.
pub struct KeyStateController<S: InputSink> {
    sink: S,
    bindings: KeyBindings,
    held: Option<VirtualKey>,
    presses: u64,
    releases: u64,
}

impl<S: InputSink> KeyStateController<S> {
    pub fn new(sink: S, bindings: KeyBindings) -> Self {
        Self {
            sink,
            bindings,
            held: None,
            presses: 0,
            releases: 0,
        }
    }

    /// Apply this frame's action and return the calls issued, in order
    pub fn apply(&mut self, action: Action) -> Vec<KeyEvent> {
        match self.bindings.key_for(action) {
            Some(key) if self.held == Some(key) => Vec::new(),
            Some(key) => {
                let mut issued = self.flush();
                self.sink.press(key);
                self.held = Some(key);
                self.presses += 1;
                debug!(action = action.label(), key = key.to_string(), "key down");
                issued.push(KeyEvent::down(key));
                issued
            }
            None => self.flush(),
        }
    }

    /// Release every held key
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        match self.held.take() {
            Some(key) => {
                self.sink.release(key);
                self.releases += 1;
                debug!(key = key.to_string(), "key up");
                vec![KeyEvent::up(key)]
            }
            None => Vec::new(),
        }
    }

    pub fn held_key(&self) -> Option<VirtualKey> {
        self.held
    }

    /// Held keys as a set; never more than one element
    pub fn held_keys(&self) -> impl Iterator<Item = VirtualKey> + '_ {
        self.held.iter().copied()
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn press_count(&self) -> u64 {
        self.presses
    }

    pub fn release_count(&self) -> u64 {
        self.releases
    }
}

impl<S: InputSink> Drop for KeyStateController<S> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
