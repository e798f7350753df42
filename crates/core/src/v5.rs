//! API v5 controller (monitor lighting, report ID 0xCC, feature reports).
//!
//! All commands are carried in feature reports sized to the device's
//! reported feature-report length. Zone indices are 1-based on the
//! wire, and every single-zone color write is followed by a loop pulse
//! that applies it immediately; there is no batching on this path.

use crate::command::{self, v5, Modifier};
use crate::controller::{DeviceIdentity, LightingController, Readiness, Rgb};
use crate::error::Result;
use crate::transport::DeviceTransport;
use tracing::trace;

/// Byte the device echoes its state behind in a feature read.
const STATUS_ECHO: u8 = 0x93;

pub struct V5Controller {
    transport: Box<dyn DeviceTransport>,
    identity: DeviceIdentity,
    readiness: Readiness,
}

impl V5Controller {
    pub fn new(transport: Box<dyn DeviceTransport>, identity: DeviceIdentity) -> Self {
        Self {
            transport,
            identity,
            readiness: Readiness::NotReady,
        }
    }

    fn send(&mut self, opcode: &[u8], modifiers: &[Modifier]) -> Result<()> {
        let buffer = command::build(self.identity.report_id, 0, opcode, modifiers);
        let n = self.identity.buffer_length.min(buffer.len());

        trace!(
            opcode = format_args!("{:02X?}", &opcode[..opcode.len().min(4)]),
            report_hex = format_args!("{:02X?}", &buffer[..n.min(12)]),
            "v5 TX"
        );

        self.transport.set_feature_report(&buffer[..n])
    }

    /// Read the device status byte; 0 if the read fails.
    ///
    /// The status opcode goes out first, then the feature read is
    /// issued with the echo byte pre-seeded at offset 1.
    pub fn status(&mut self) -> u8 {
        let _ = self.send(v5::STATUS, &[]);

        let mut buffer = vec![0u8; command::BUFFER_LEN];
        buffer[0] = self.identity.report_id;
        buffer[1] = STATUS_ECHO;
        let n = self.identity.buffer_length.min(buffer.len());

        match self.transport.get_feature_report(&mut buffer[..n]) {
            Ok(()) => buffer[2],
            Err(_) => 0,
        }
    }

    /// Fire-and-forget commit pulse; firmware behavior does not depend
    /// on this report's round trip.
    fn loop_signal(&mut self) {
        let _ = self.send(v5::LOOP, &[]);
    }

    /// Make batched color writes visible and drop back to not-ready.
    fn commit(&mut self) -> Result<()> {
        self.send(v5::UPDATE, &[])?;
        self.readiness = Readiness::NotReady;
        Ok(())
    }
}

impl LightingController for V5Controller {
    fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    fn readiness(&self) -> Readiness {
        self.readiness
    }

    fn set_color(&mut self, index: u32, color: Rgb) -> Result<()> {
        if self.readiness == Readiness::NotReady {
            self.reset()?;
        }

        let result = self.send(
            v5::COLOR_SET,
            &[
                // Zone 0 is never addressed as 0 on the wire; the
                // 1-based index wraps into the byte-sized field.
                Modifier::new(4, index.wrapping_add(1) as u8),
                Modifier::new(5, color.red),
                Modifier::new(6, color.green),
                Modifier::new(7, color.blue),
            ],
        );

        // This generation applies per call rather than batching.
        self.loop_signal();

        result
    }

    fn set_brightness(&mut self, level: u8) -> Result<()> {
        if self.readiness == Readiness::Ready {
            self.commit()?;
        }

        self.reset()?;

        // Initialization pulses; their individual success is not checked.
        let _ = self.send(v5::TURN_ON_INIT, &[]);
        let _ = self.send(v5::TURN_ON_INIT2, &[]);

        self.send(v5::TURN_ON_SET, &[Modifier::new(4, level)])
    }

    fn reset(&mut self) -> Result<()> {
        let result = self.send(v5::RESET, &[]);
        // Status poll flushes device state; the byte itself is unused.
        let _ = self.status();

        self.readiness = Readiness::Ready;

        result
    }
}
