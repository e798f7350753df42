//! open-afx-core: AlienFX lighting protocol, device discovery, and HID transport.
//!
//! This crate provides the core logic for discovering AlienFX-capable
//! lighting controllers on the HID bus, classifying them into one of
//! the two known firmware generations, and driving per-zone color and
//! brightness through each generation's vendor report protocol.

pub mod classify;
pub mod command;
pub mod controller;
pub mod discover;
pub mod error;
pub mod transport;
pub mod v4;
pub mod v5;
pub mod windows;

/// Vendor IDs of known AlienFX hardware lines.
pub mod vids {
    /// Alienware notebooks and desktops (API v4 controllers).
    pub const ALIENWARE: u16 = 0x187C;
    /// Darfon-built Alienware monitors (API v5 controllers).
    pub const DARFON: u16 = 0x0D62;
}
