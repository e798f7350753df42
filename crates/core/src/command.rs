//! AlienFX command-buffer encoding.
//!
//! Every command the firmware understands travels in a fixed 1024-byte
//! buffer: byte 0 carries the report ID, the opcode template starts at
//! byte 1, and field-level overrides ("modifiers") are applied last so
//! they always win over the template. The device's reported report size
//! only matters for the OS I/O call, never for this layout.

/// Size of every command buffer handed to the transport.
pub const BUFFER_LEN: usize = 1024;

/// A single field override applied after the opcode template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifier {
    /// Absolute byte offset into the command buffer.
    pub offset: usize,
    /// Byte written at that offset.
    pub value: u8,
}

impl Modifier {
    pub const fn new(offset: usize, value: u8) -> Self {
        Self { offset, value }
    }
}

/// Build a command buffer from an opcode template and modifiers.
///
/// Layout: `fill` everywhere, report ID at offset 0, `opcode` copied
/// starting at offset 1, then each modifier written in order. Both
/// shipped firmware generations use a zero fill; the parameter exists
/// because the buffer fill is the one knob that varies across
/// generations.
pub fn build(report_id: u8, fill: u8, opcode: &[u8], modifiers: &[Modifier]) -> Vec<u8> {
    let mut buffer = vec![fill; BUFFER_LEN];
    buffer[0] = report_id;
    buffer[1..=opcode.len()].copy_from_slice(opcode);

    for m in modifiers {
        buffer[m.offset] = m.value;
    }

    buffer
}

/// Opcode templates for API v4 hardware (report ID 0, 34-byte reports).
pub mod v4 {
    /// Control command: doubles as reset (with a mode modifier at
    /// offset 4) and as the batched-color commit (unmodified).
    pub const CONTROL: &[u8] = &[0x03, 0x21, 0x00, 0x03, 0x00, 0xFF];
    /// Set one zone's color; RGB at offsets 3..=5, zone index at 8.
    pub const SET_ONE_COLOR: &[u8] = &[0x03, 0x27];
    /// Announces a brightness change before `TURN_ON`.
    pub const PREPARE_TURN: &[u8] = &[0x03, 0x20, 0x02];
    /// Applies brightness; inverted 0-100 level at offset 3, zone list
    /// at offsets 6..=10.
    pub const TURN_ON: &[u8] = &[0x03, 0x26];

    /// Reset mode value selecting the "all lights on" state.
    pub const RESET_ALL_LIGHTS_ON: u8 = 4;
    /// Reset mode value re-arming the device for color updates.
    pub const RESET_SLEEP_LIGHTS_ON: u8 = 1;
}

/// Opcode templates for API v5 hardware (report ID 0xCC, feature reports).
pub mod v5 {
    /// Status query; the device echoes state into the feature read.
    pub const STATUS: &[u8] = &[0x93];
    /// Set one zone's color; 1-based zone index at offset 4, RGB at 5..=7.
    pub const COLOR_SET: &[u8] = &[0x8C, 0x02];
    /// Commit pulse making the preceding color write visible.
    pub const LOOP: &[u8] = &[0x8C, 0x13];
    /// Device reset.
    pub const RESET: &[u8] = &[0x94];
    /// Batched-color commit.
    pub const UPDATE: &[u8] = &[0x8B, 0x01, 0xFF];

    /// First turn-on initialization pulse. The firmware expects this
    /// exact 55-byte sequence; its interior is opaque and must not be
    /// decomposed.
    pub const TURN_ON_INIT: &[u8] = &[
        0x79, 0x7B, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x77,
    ];
    /// Second turn-on initialization pulse.
    pub const TURN_ON_INIT2: &[u8] = &[0x79, 0x88];
    /// Applies brightness; level at offset 4.
    pub const TURN_ON_SET: &[u8] = &[0x83, 0x38, 0x9C];
}
