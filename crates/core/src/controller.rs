//! Controller contract shared by all protocol generations.

use crate::classify::ProtocolVersion;
use crate::error::Result;

/// An RGB color as the hardware receives it: three raw channel bytes,
/// no alpha, no gamma correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Readiness handshake state of one controller.
///
/// A controller must be `Ready` before a color write is guaranteed to
/// apply; committing batched colors drops back to `NotReady` so the
/// next write re-establishes the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    NotReady,
    Ready,
}

/// Immutable identity of a discovered controller.
#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    /// Opaque OS interface path; primary key of the device.
    pub device_path: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub protocol_version: ProtocolVersion,
    /// Leading byte of every command buffer (0 means unused).
    pub report_id: u8,
    /// Declared size for OS report I/O calls, as reported by the device.
    pub buffer_length: usize,
}

impl std::fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} device VID#{:04X} PID#{:04X} path {}",
            self.protocol_version, self.vendor_id, self.product_id, self.device_path
        )
    }
}

/// One discovered lighting controller.
///
/// Implementations exclusively own their transport handle and must be
/// driven from a single thread; the readiness handshake is not safe
/// under concurrent access. Operations block until the driver answers.
pub trait LightingController: Send {
    /// Identity fields captured at discovery time.
    fn identity(&self) -> &DeviceIdentity;

    /// Current handshake state.
    fn readiness(&self) -> Readiness;

    /// Set one zone's color. Re-establishes readiness first if needed.
    fn set_color(&mut self, index: u32, color: Rgb) -> Result<()>;

    /// Apply a global brightness level (0 = off, 255 = full).
    fn set_brightness(&mut self, level: u8) -> Result<()>;

    /// Force the device into a known state and mark it ready.
    fn reset(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_display_names_protocol_and_ids() {
        let id = DeviceIdentity {
            device_path: r"\\?\hid#test".to_string(),
            vendor_id: 0x187C,
            product_id: 0x0551,
            protocol_version: ProtocolVersion::V4,
            report_id: 0,
            buffer_length: 34,
        };
        let text = id.to_string();
        assert!(text.contains("APIv4"));
        assert!(text.contains("187C"));
        assert!(text.contains("0551"));
    }
}
