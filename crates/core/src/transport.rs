//! HID transport abstraction for device communication.
//!
//! Provides a trait-based transport layer so that real HID handles and
//! mock devices share the same interface. The four operations mirror
//! the OS report I/O controls the hardware is driven with; each takes
//! the caller's buffer already truncated to the declared report size.
//!
//! No timeouts or retries live here: every call blocks until the
//! driver answers, and a failure is returned as-is.

use crate::error::Result;

/// Abstraction over the four OS HID report primitives.
pub trait DeviceTransport: Send {
    /// Issue a set-output-report I/O control.
    fn set_output_report(&mut self, buffer: &[u8]) -> Result<()>;

    /// Issue a get-input-report I/O control into `buffer`.
    fn get_input_report(&mut self, buffer: &mut [u8]) -> Result<()>;

    /// Issue a set-feature-report I/O control.
    fn set_feature_report(&mut self, buffer: &[u8]) -> Result<()>;

    /// Issue a get-feature-report I/O control into `buffer`.
    fn get_feature_report(&mut self, buffer: &mut [u8]) -> Result<()>;
}


#[cfg(test)]
mod tests {
    use super::mock::{Call, MockTransport};
    use super::*;

    #[test]
    fn mock_records_calls_in_order() {
        let mut mock = MockTransport::healthy();
        let log = mock.log();

        mock.set_output_report(&[0, 1, 2]).unwrap();
        let mut buf = [0u8; 4];
        mock.get_input_report(&mut buf).unwrap();

        let calls = log.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], Call::SetOutput(vec![0, 1, 2]));
        assert!(matches!(calls[1], Call::GetInput(_)));
    }

    #[test]
    fn mock_plays_back_feature_report() {
        let mut mock = MockTransport::healthy().with_feature_report(&[0xCC, 0x93, 0x10]);
        let mut buf = [0u8; 8];
        mock.get_feature_report(&mut buf).unwrap();
        assert_eq!(&buf[..3], &[0xCC, 0x93, 0x10]);
    }

    #[test]
    fn mock_scripts_failures() {
        let mut mock = MockTransport::healthy().failing_set_feature();
        assert!(mock.set_feature_report(&[0xCC]).is_err());
    }
}
