#![cfg(target_os = "windows")]

//! Windows HID bus backend.
//!
//! Interfaces are enumerated through `hidapi`; each candidate path is
//! then opened as a raw file handle so the HID parser capability query
//! (`HidD_GetPreparsedData`/`HidP_GetCaps`) and the four report I/O
//! controls can run against it. `hidapi` itself cannot surface the
//! output/feature report byte lengths the classifier keys on, which is
//! why the raw handle is required.
//!
//! The handle is opened for read+write with full sharing (lighting
//! interfaces are not exclusive) and closed when the transport drops.

use crate::classify::Capabilities;
use crate::discover::{HidBus, ProbedInterface};
use crate::error::{Error, Result};
use crate::transport::DeviceTransport;

use core::mem::MaybeUninit;
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;

use windows_sys::Win32::Devices::HumanInterfaceDevice::{
    HidD_FreePreparsedData, HidD_GetAttributes, HidD_GetFeature, HidD_GetInputReport,
    HidD_GetPreparsedData, HidD_SetFeature, HidD_SetOutputReport, HidP_GetCaps, HIDD_ATTRIBUTES,
    HIDP_CAPS, HIDP_STATUS_SUCCESS, PHIDP_PREPARSED_DATA,
};
use windows_sys::Win32::Foundation::{
    CloseHandle, GetLastError, GENERIC_READ, GENERIC_WRITE, HANDLE, INVALID_HANDLE_VALUE,
};
use windows_sys::Win32::Storage::FileSystem::{
    CreateFileW, FILE_ATTRIBUTE_NORMAL, FILE_SHARE_READ, FILE_SHARE_WRITE, OPEN_EXISTING,
};

/// The system HID bus, enumerated via `hidapi`.
pub struct SystemBus {
    api: hidapi::HidApi,
}

impl SystemBus {
    pub fn new() -> Result<Self> {
        let api = hidapi::HidApi::new().map_err(|e| Error::Enumeration(e.to_string()))?;
        Ok(Self { api })
    }
}

impl HidBus for SystemBus {
    fn interfaces(&self) -> Result<Vec<String>> {
        // hidapi lists one entry per top-level collection; the same
        // interface path must only be probed once.
        let mut paths: Vec<String> = Vec::new();
        for info in self.api.device_list() {
            let path = info.path().to_string_lossy().into_owned();
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        Ok(paths)
    }

    fn open(&self, path: &str) -> Result<ProbedInterface> {
        let handle = WinHidHandle::open(path)?;
        let capabilities = handle.query_capabilities(path)?;
        Ok(ProbedInterface {
            capabilities,
            transport: Box::new(handle),
        })
    }
}

/// Raw HID device handle implementing the four report primitives.
pub struct WinHidHandle {
    handle: HANDLE,
}

// The handle is exclusively owned by this wrapper and every call on it
// goes through &mut self.
unsafe impl Send for WinHidHandle {}

impl WinHidHandle {
    /// Open a HID interface path for read+write, non-exclusive sharing.
    pub fn open(path: &str) -> Result<Self> {
        use std::ptr::{null, null_mut};

        // UTF-16 + NUL
        let wide: Vec<u16> = OsStr::new(path)
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        let try_open = |access: u32| unsafe {
            CreateFileW(
                wide.as_ptr(),
                access,
                FILE_SHARE_READ | FILE_SHARE_WRITE,
                null(),
                OPEN_EXISTING,
                FILE_ATTRIBUTE_NORMAL,
                null_mut(),
            )
        };

        let mut handle = try_open(GENERIC_READ | GENERIC_WRITE);
        if handle == INVALID_HANDLE_VALUE {
            handle = try_open(GENERIC_READ);
        }

        if handle == INVALID_HANDLE_VALUE {
            let code = unsafe { GetLastError() };
            return Err(Error::Interface {
                path: path.to_string(),
                reason: format!("CreateFileW failed: error {code}"),
            });
        }

        Ok(Self { handle })
    }

    /// Query vendor/product ids and report byte lengths for this handle.
    fn query_capabilities(&self, path: &str) -> Result<Capabilities> {
        let unusable = |reason: String| Error::Interface {
            path: path.to_string(),
            reason,
        };

        let mut attributes = HIDD_ATTRIBUTES {
            Size: std::mem::size_of::<HIDD_ATTRIBUTES>() as u32,
            VendorID: 0,
            ProductID: 0,
            VersionNumber: 0,
        };
        if unsafe { HidD_GetAttributes(self.handle, &mut attributes) } == 0 {
            return Err(unusable("HidD_GetAttributes failed".into()));
        }

        let mut ppd: PHIDP_PREPARSED_DATA = 0;
        let ok = unsafe { HidD_GetPreparsedData(self.handle, &mut ppd) };
        if ok == 0 || ppd == 0 {
            return Err(unusable("HidD_GetPreparsedData failed".into()));
        }

        let mut caps = MaybeUninit::<HIDP_CAPS>::uninit();
        let status = unsafe { HidP_GetCaps(ppd, caps.as_mut_ptr()) };
        unsafe { HidD_FreePreparsedData(ppd) };
        if status != HIDP_STATUS_SUCCESS {
            return Err(unusable(format!("HidP_GetCaps failed: status {status}")));
        }
        let caps = unsafe { caps.assume_init() };

        Ok(Capabilities {
            usage: caps.Usage,
            output_report_len: caps.OutputReportByteLength,
            feature_report_len: caps.FeatureReportByteLength,
            vendor_id: attributes.VendorID,
            product_id: attributes.ProductID,
        })
    }

    fn send_error(call: &'static str) -> Error {
        let code = unsafe { GetLastError() };
        Error::CommandSend(format!("{call} failed: error {code}"))
    }
}

impl DeviceTransport for WinHidHandle {
    fn set_output_report(&mut self, buffer: &[u8]) -> Result<()> {
        let ok = unsafe {
            HidD_SetOutputReport(self.handle, buffer.as_ptr().cast(), buffer.len() as u32)
        };
        if ok == 0 {
            return Err(Self::send_error("HidD_SetOutputReport"));
        }
        Ok(())
    }

    fn get_input_report(&mut self, buffer: &mut [u8]) -> Result<()> {
        let ok = unsafe {
            HidD_GetInputReport(self.handle, buffer.as_mut_ptr().cast(), buffer.len() as u32)
        };
        if ok == 0 {
            return Err(Self::send_error("HidD_GetInputReport"));
        }
        Ok(())
    }

    fn set_feature_report(&mut self, buffer: &[u8]) -> Result<()> {
        let ok =
            unsafe { HidD_SetFeature(self.handle, buffer.as_ptr().cast(), buffer.len() as u32) };
        if ok == 0 {
            return Err(Self::send_error("HidD_SetFeature"));
        }
        Ok(())
    }

    fn get_feature_report(&mut self, buffer: &mut [u8]) -> Result<()> {
        let ok =
            unsafe { HidD_GetFeature(self.handle, buffer.as_mut_ptr().cast(), buffer.len() as u32) };
        if ok == 0 {
            return Err(Self::send_error("HidD_GetFeature"));
        }
        Ok(())
    }
}

impl Drop for WinHidHandle {
    fn drop(&mut self) {
        unsafe {
            if self.handle != INVALID_HANDLE_VALUE && !self.handle.is_null() {
                CloseHandle(self.handle);
                self.handle = std::ptr::null_mut();
            }
        }
    }
}
