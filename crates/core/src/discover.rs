//! Device discovery: walk the HID bus, classify, build controllers.
//!
//! Discovery is deliberately tolerant: a bus carries arbitrary
//! unrelated HID devices, so every per-interface failure (open,
//! capability query, unknown fingerprint) just drops that interface
//! and the scan continues. Only a bus that cannot be enumerated at
//! all is an error.

use crate::classify::{self, ProtocolVersion};
use crate::controller::{DeviceIdentity, LightingController};
use crate::error::Result;
use crate::transport::DeviceTransport;
use crate::v4::V4Controller;
use crate::v5::V5Controller;
use tracing::{debug, info};

/// One opened HID interface, ready for classification.
pub struct ProbedInterface {
    pub capabilities: classify::Capabilities,
    pub transport: Box<dyn DeviceTransport>,
}

/// Seam over the OS HID bus, so discovery is testable without hardware.
pub trait HidBus {
    /// List candidate HID interface paths.
    fn interfaces(&self) -> Result<Vec<String>>;

    /// Open one path and query its capability descriptor.
    fn open(&self, path: &str) -> Result<ProbedInterface>;
}

/// Discover all lighting controllers reachable through `bus`.
pub fn discover_on(bus: &dyn HidBus) -> Result<Vec<Box<dyn LightingController>>> {
    debug!("Starting HID interface scan");
    let paths = bus.interfaces()?;

    let mut controllers: Vec<Box<dyn LightingController>> = Vec::new();
    for path in paths {
        let probed = match bus.open(&path) {
            Ok(p) => p,
            Err(e) => {
                debug!(path = %path, error = %e, "Skipping unusable interface");
                continue;
            }
        };

        let caps = probed.capabilities;
        let Some(matched) = classify::classify(&caps) else {
            // Not a lighting controller. Dropping the transport here
            // releases the OS handle right away.
            continue;
        };

        let identity = DeviceIdentity {
            device_path: path,
            vendor_id: caps.vendor_id,
            product_id: caps.product_id,
            protocol_version: matched.version,
            report_id: matched.report_id,
            buffer_length: matched.buffer_length,
        };

        info!(
            version = %identity.protocol_version,
            vid = format_args!("0x{:04X}", identity.vendor_id),
            pid = format_args!("0x{:04X}", identity.product_id),
            path = %identity.device_path,
            "Found lighting controller"
        );

        let controller: Box<dyn LightingController> = match matched.version {
            ProtocolVersion::V4 => Box::new(V4Controller::new(probed.transport, identity)),
            ProtocolVersion::V5 => Box::new(V5Controller::new(probed.transport, identity)),
        };
        controllers.push(controller);
    }

    debug!(count = controllers.len(), "HID interface scan complete");
    Ok(controllers)
}

/// Discover all lighting controllers on this machine.
pub fn discover() -> Result<Vec<Box<dyn LightingController>>> {
    #[cfg(target_os = "windows")]
    {
        let bus = crate::windows::SystemBus::new()?;
        discover_on(&bus)
    }
    #[cfg(not(target_os = "windows"))]
    {
        Err(crate::error::Error::Enumeration(
            "HID report I/O is only implemented for Windows hosts".into(),
        ))
    }
}

/// An in-memory HID bus for testing discovery end to end.
#[cfg(test)]
pub mod fake {
    use super::*;
    use crate::classify::Capabilities;
    use crate::error::Error;
    use crate::transport::mock::{CallLog, MockTransport};
    use std::sync::Mutex;

    struct FakeEntry {
        path: String,
        capabilities: Capabilities,
        transport: Option<MockTransport>,
        fail_open: bool,
    }

    /// Bus double holding scripted interfaces.
    #[derive(Default)]
    pub struct FakeBus {
        entries: Mutex<Vec<FakeEntry>>,
        fail_enumeration: bool,
    }

    impl FakeBus {
        pub fn new() -> Self {
            Self::default()
        }

        /// A bus whose device-class enumeration cannot start.
        pub fn unavailable() -> Self {
            Self {
                entries: Mutex::new(Vec::new()),
                fail_enumeration: true,
            }
        }

        /// Attach a healthy device; returns its transport call log.
        pub fn add(&self, path: &str, capabilities: Capabilities) -> CallLog {
            let transport = MockTransport::healthy();
            let log = transport.log();
            self.entries.lock().unwrap().push(FakeEntry {
                path: path.to_string(),
                capabilities,
                transport: Some(transport),
                fail_open: false,
            });
            log
        }

        /// Attach an interface whose open always fails.
        pub fn add_unopenable(&self, path: &str) {
            self.entries.lock().unwrap().push(FakeEntry {
                path: path.to_string(),
                capabilities: Capabilities {
                    usage: 0,
                    output_report_len: 0,
                    feature_report_len: 0,
                    vendor_id: 0,
                    product_id: 0,
                },
                transport: None,
                fail_open: true,
            });
        }
    }

    impl HidBus for FakeBus {
        fn interfaces(&self) -> Result<Vec<String>> {
            if self.fail_enumeration {
                return Err(Error::Enumeration("fake: no device class".into()));
            }
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.path.clone())
                .collect())
        }

        fn open(&self, path: &str) -> Result<ProbedInterface> {
            let mut entries = self.entries.lock().unwrap();
            let entry = entries
                .iter_mut()
                .find(|e| e.path == path)
                .ok_or_else(|| Error::Interface {
                    path: path.to_string(),
                    reason: "fake: unknown path".into(),
                })?;

            if entry.fail_open {
                return Err(Error::Interface {
                    path: path.to_string(),
                    reason: "fake: open failed".into(),
                });
            }

            let transport = entry.transport.take().ok_or_else(|| Error::Interface {
                path: path.to_string(),
                reason: "fake: already opened".into(),
            })?;

            Ok(ProbedInterface {
                capabilities: entry.capabilities,
                transport: Box::new(transport),
            })
        }
    }
}
