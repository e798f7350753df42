//! Protocol classification from HID capability descriptors.
//!
//! AlienFX hardware exposes no explicit protocol-version field. The
//! firmware generation is inferred from report-size, usage, and vendor
//! fingerprints known to correlate with it. Anything that does not
//! match is ignored so a scan stays tolerant of unrelated HID devices.

use crate::vids;

/// Supported AlienFX protocol generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    V4,
    V5,
}

impl ProtocolVersion {
    /// Numeric generation as reported by the firmware line.
    pub fn number(&self) -> u8 {
        match self {
            Self::V4 => 4,
            Self::V5 => 5,
        }
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "APIv{}", self.number())
    }
}

/// Capability descriptor of one HID interface, as reported by the OS.
///
/// Transient classifier input; not retained after classification.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub usage: u16,
    pub output_report_len: u16,
    pub feature_report_len: u16,
    pub vendor_id: u16,
    pub product_id: u16,
}

/// Outcome of a successful classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolMatch {
    pub version: ProtocolVersion,
    /// Leading report-ID byte of every command buffer.
    pub report_id: u8,
    /// Declared size for the OS report I/O calls.
    pub buffer_length: usize,
}

/// Decide which protocol generation an interface speaks, if any.
///
/// First match wins; unrecognized fingerprints yield `None` and the
/// interface is simply not a lighting controller.
pub fn classify(caps: &Capabilities) -> Option<ProtocolMatch> {
    match caps.output_report_len {
        0 => {
            if caps.usage == 0xCC && caps.vendor_id == vids::DARFON {
                return Some(ProtocolMatch {
                    version: ProtocolVersion::V5,
                    report_id: 0xCC,
                    buffer_length: caps.feature_report_len as usize,
                });
            }
        }
        34 => {
            if caps.vendor_id == vids::ALIENWARE {
                return Some(ProtocolMatch {
                    version: ProtocolVersion::V4,
                    report_id: 0,
                    buffer_length: 34,
                });
            }
        }
        _ => {}
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(usage: u16, out_len: u16, feat_len: u16, vid: u16) -> Capabilities {
        Capabilities {
            usage,
            output_report_len: out_len,
            feature_report_len: feat_len,
            vendor_id: vid,
            product_id: 0x0551,
        }
    }

    #[test]
    fn v4_fingerprint_matches() {
        let m = classify(&caps(0x01, 34, 0, 0x187C)).unwrap();
        assert_eq!(m.version, ProtocolVersion::V4);
        assert_eq!(m.report_id, 0);
        assert_eq!(m.buffer_length, 34);
    }

    #[test]
    fn v4_usage_is_irrelevant() {
        // The v4 rule keys on output length and vendor only.
        assert!(classify(&caps(0xCC, 34, 0, 0x187C)).is_some());
    }

    #[test]
    fn v4_wrong_vendor_rejected() {
        assert!(classify(&caps(0x01, 34, 0, 0x046D)).is_none());
    }

    #[test]
    fn v5_fingerprint_matches() {
        let m = classify(&caps(0xCC, 0, 65, 0x0D62)).unwrap();
        assert_eq!(m.version, ProtocolVersion::V5);
        assert_eq!(m.report_id, 0xCC);
        assert_eq!(m.buffer_length, 65);
    }

    #[test]
    fn v5_buffer_length_comes_from_feature_report() {
        let m = classify(&caps(0xCC, 0, 193, 0x0D62)).unwrap();
        assert_eq!(m.buffer_length, 193);
    }

    #[test]
    fn v5_wrong_usage_rejected() {
        assert!(classify(&caps(0x01, 0, 65, 0x0D62)).is_none());
    }

    #[test]
    fn v5_wrong_vendor_rejected() {
        assert!(classify(&caps(0xCC, 0, 65, 0x187C)).is_none());
    }

    #[test]
    fn keyboard_length_rejected() {
        // A plain keyboard interface (8-byte output reports) is ignored.
        assert!(classify(&caps(0x06, 8, 0, 0x187C)).is_none());
    }
}
