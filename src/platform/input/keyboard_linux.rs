#![cfg(target_os = "linux")]

use crate::models::input::{InputError, InputResult, KeyEventType, VirtualKey};
use crate::platform::input::InputSink;
use tracing::{info, warn};

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key};

const DEVICE_NAME: &str = "gesture-drive virtual keyboard";

/// Injects arrow keys through a uinput virtual keyboard
pub struct LinuxKeyboardSink {
    device: VirtualDevice,
}

impl LinuxKeyboardSink {
    pub fn new() -> InputResult<Self> {
        Self::check_uinput_permissions()?;

        let mut keys = AttributeSet::<Key>::new();
        for key in VirtualKey::ALL {
            keys.insert(Key::new(key.linux_keycode()));
        }

        let device = VirtualDeviceBuilder::new()
            .map_err(|e| InputError::DeviceUnavailable(format!("Failed to open uinput: {}", e)))?
            .name(DEVICE_NAME)
            .with_keys(&keys)
            .map_err(|e| InputError::DeviceUnavailable(format!("Failed to register keys: {}", e)))?
            .build()
            .map_err(|e| InputError::DeviceUnavailable(format!("Failed to create device: {}", e)))?;

        info!("Created uinput device \"{}\"", DEVICE_NAME);

        Ok(Self { device })
    }

    fn check_uinput_permissions() -> InputResult<()> {
        let path = std::path::Path::new("/dev/uinput");
        if !path.exists() {
            return Err(InputError::DeviceUnavailable(
                "/dev/uinput not found. Load the uinput kernel module (modprobe uinput)".to_string(),
            ));
        }

        // Opening for write is what VirtualDeviceBuilder needs
        std::fs::OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|_| {
                InputError::PermissionDenied(
                    "Cannot write to /dev/uinput. Add your user to the 'input' group or adjust udev rules"
                        .to_string(),
                )
            })?;

        Ok(())
    }

    fn key_event(key: VirtualKey, event_type: KeyEventType) -> InputEvent {
        let value = match event_type {
            KeyEventType::KeyDown => 1,
            KeyEventType::KeyUp => 0,
        };
        InputEvent::new(EventType::KEY, key.linux_keycode(), value)
    }

    fn send(&mut self, key: VirtualKey, event_type: KeyEventType) {
        // emit() terminates the batch with SYN_REPORT
        if let Err(e) = self.device.emit(&[Self::key_event(key, event_type)]) {
            warn!(
                key = key.to_string(),
                event = event_type.to_string(),
                error = %e,
                "uinput rejected synthetic key event"
            );
        }
    }
}

impl InputSink for LinuxKeyboardSink {
    fn press(&mut self, key: VirtualKey) {
        self.send(key, KeyEventType::KeyDown);
    }

    fn release(&mut self, key: VirtualKey) {
        self.send(key, KeyEventType::KeyUp);
    }

    fn name(&self) -> &str {
        "linux-uinput"
    }
}
