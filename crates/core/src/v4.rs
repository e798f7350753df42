//! API v4 controller (notebook lighting, report ID 0, 34-byte reports).
//!
//! Commands go out as an output report immediately followed by an
//! input-report read into the same buffer; the firmware treats the pair
//! as one exchange and both I/O controls must succeed. Brightness is
//! inverted on the wire (0 = full bright, 100 = off) over a fixed
//! five-zone layout.

use crate::command::{self, v4, Modifier};
use crate::controller::{DeviceIdentity, LightingController, Readiness, Rgb};
use crate::error::Result;
use crate::transport::DeviceTransport;
use tracing::trace;

pub struct V4Controller {
    transport: Box<dyn DeviceTransport>,
    identity: DeviceIdentity,
    readiness: Readiness,
}

impl V4Controller {
    pub fn new(transport: Box<dyn DeviceTransport>, identity: DeviceIdentity) -> Self {
        Self {
            transport,
            identity,
            readiness: Readiness::NotReady,
        }
    }

    /// Lay down a command buffer and run the output/input report pair.
    fn send(&mut self, opcode: &[u8], modifiers: &[Modifier]) -> Result<()> {
        let mut buffer = command::build(self.identity.report_id, 0, opcode, modifiers);
        let n = self.identity.buffer_length.min(buffer.len());

        trace!(
            opcode = format_args!("{:02X?}", opcode),
            report_hex = format_args!("{:02X?}", &buffer[..n.min(12)]),
            "v4 TX"
        );

        self.transport.set_output_report(&buffer[..n])?;
        self.transport.get_input_report(&mut buffer[..n])?;
        Ok(())
    }

    /// Read the device status byte; 0 if the read fails.
    ///
    /// The status read is a bare input-report poll carrying only the
    /// report ID.
    pub fn status(&mut self) -> u8 {
        let mut buffer = vec![0u8; command::BUFFER_LEN];
        buffer[0] = self.identity.report_id;
        let n = self.identity.buffer_length.min(buffer.len());

        match self.transport.get_input_report(&mut buffer[..n]) {
            Ok(()) => buffer[2],
            Err(_) => 0,
        }
    }

    /// Make batched color writes visible; drops back to the
    /// not-ready state so the next write re-runs the handshake.
    fn commit(&mut self) -> Result<()> {
        self.send(v4::CONTROL, &[])?;
        self.readiness = Readiness::NotReady;
        Ok(())
    }
}

impl LightingController for V4Controller {
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

        self.send(
            v4::SET_ONE_COLOR,
            &[
                Modifier::new(3, color.red),
                Modifier::new(4, color.green),
                Modifier::new(5, color.blue),
                Modifier::new(7, 1),
                Modifier::new(8, index as u8),
            ],
        )
    }

    fn set_brightness(&mut self, level: u8) -> Result<()> {
        // Device-internal brightness range is 0-100, inverted.
        let scaled = ((u32::from(level) * 100) / 255) as u8;

        if self.readiness == Readiness::Ready {
            self.commit()?;
        }

        self.send(v4::PREPARE_TURN, &[])?;
        self.send(
            v4::TURN_ON,
            &[
                Modifier::new(3, 100 - scaled),
                // Fixed five-zone layout: count at 5, zone ids 0-4.
                Modifier::new(5, 5),
                Modifier::new(6, 0),
                Modifier::new(7, 1),
                Modifier::new(8, 2),
                Modifier::new(9, 3),
                Modifier::new(10, 4),
            ],
        )
    }

    fn reset(&mut self) -> Result<()> {
        // Both control writes are attempted regardless of the first
        // result, and the device is treated as ready even when one
        // fails; the firmware tolerates a partial handshake.
        let first = self.send(v4::CONTROL, &[Modifier::new(4, v4::RESET_ALL_LIGHTS_ON)]);
        let second = self.send(v4::CONTROL, &[Modifier::new(4, v4::RESET_SLEEP_LIGHTS_ON)]);

        self.readiness = Readiness::Ready;

        first.and(second)
    }
}
