//! Addressed-block SysEx engine for Roland JV/XV-family synthesizers.
//!
//! Roland's "Type IV" SysEx protocol exposes a synth as a hierarchical,
//! checksum-protected memory map: every transfer reads or writes a block of
//! bytes at a 7-bit-per-digit address, and one patch is a fixed set of such
//! blocks. This crate models that protocol for patch librarians: device
//! detection, edit-buffer and program-dump requests, recognition of
//! multi-block transfers, re-addressing a patch between the edit buffer and
//! stored slots, name and category access, and content fingerprints for
//! duplicate detection.
//!
//! The crate never performs MIDI I/O. Every entry point consumes and
//! produces plain byte vectors; the host owns the transport, the scan loop
//! and all sequencing.

#![warn(missing_docs)]

pub mod adapter;
pub mod address;
pub mod detect;
pub mod schema;
pub mod synths;
pub mod sysex;

pub use adapter::{BankDescriptor, DumpProgress, RolandSynth, SynthDefinition};
pub use detect::{DetectMethod, DetectState, DeviceSession, DEFAULT_DEVICE_ID};
pub use schema::{DataBlock, DumpSchema, NameZone};
pub use sysex::ProtocolError;
