//! Wire-level SysEx envelope handling.
//!
//! Roland's addressed message format ("Type IV" in the service manuals)
//! wraps every transfer as
//! `F0 41 <device> <model..> <command> <address..> <data..> <checksum> F7`.
//! This module owns envelope construction, parsing and checksum integrity;
//! it knows nothing about what the addresses mean.

use thiserror::Error;

/// SysEx message start byte.
pub const SYSEX_START: u8 = 0xF0;
/// SysEx message end byte.
pub const SYSEX_END: u8 = 0xF7;
/// Roland's manufacturer ID.
pub const ROLAND_ID: u8 = 0x41;
/// "Request data 1" (RQ1) command byte.
pub const CMD_RQ1: u8 = 0x11;
/// "Data set 1" (DT1) command byte.
pub const CMD_DT1: u8 = 0x12;

/// Errors raised once a message has been accepted as ours and is being
/// decoded. "Not a message for me" is never an error on a shared bus; it is
/// reported as a non-match by the recognition functions instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The transmitted checksum does not match the address + data bytes.
    /// Never silently corrected: accepting a corrupted checksum risks
    /// writing garbage into synth memory.
    #[error("checksum mismatch: computed {computed:#04x}, transmitted {transmitted:#04x}")]
    ChecksumMismatch {
        /// Checksum recomputed over the received address and data bytes.
        computed: u8,
        /// Checksum byte as transmitted by the device.
        transmitted: u8,
    },
    /// The message is too short to hold an envelope of this wire format.
    #[error("message too short: {0} bytes")]
    TooShort(usize),
    /// The accumulated data is not a complete dump for this synth.
    #[error("not a recognized dump for this synth")]
    UnrecognizedDump,
}

/// Roland 7-bit checksum over the address and data bytes.
///
/// Equivalent to summing the negated bytes modulo 128; headers and the
/// checksum/terminator themselves are never included.
pub fn checksum(payload: &[u8]) -> u8 {
    let sum: u32 = payload.iter().map(|&b| u32::from(b)).sum();
    ((0x80 - (sum & 0x7F)) & 0x7F) as u8
}

/// Splits a byte stream into individual `F0 .. F7` messages.
///
/// Bytes outside any message are skipped; an unterminated trailing message
/// is dropped.
pub fn split_messages(data: &[u8]) -> Vec<&[u8]> {
    let mut messages = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        while pos < data.len() && data[pos] != SYSEX_START {
            pos += 1;
        }
        if pos >= data.len() {
            break;
        }

        let start = pos;
        pos += 1;
        while pos < data.len() && data[pos] != SYSEX_END {
            pos += 1;
        }
        if pos >= data.len() {
            break;
        }
        pos += 1;

        messages.push(&data[start..pos]);
    }

    messages
}

/// Decoded fields of one addressed message.
#[derive(Debug, PartialEq, Eq)]
pub struct ParsedMessage<'a> {
    /// Command byte (RQ1 or DT1 on the synths covered here).
    pub command: u8,
    /// Address digits.
    pub address: &'a [u8],
    /// Payload bytes between address and checksum.
    pub data: &'a [u8],
}

/// Fixed wire parameters of one synth model.
#[derive(Debug, Clone)]
pub struct WireFormat {
    model_id: Vec<u8>,
    address_width: usize,
}

impl WireFormat {
    /// A wire format for the given model ID and address width (3 or 4).
    pub fn new(model_id: Vec<u8>, address_width: usize) -> Self {
        Self {
            model_id,
            address_width,
        }
    }

    /// The model ID bytes following the device ID in every message.
    pub fn model_id(&self) -> &[u8] {
        &self.model_id
    }

    /// Number of address digits in this model's messages.
    pub fn address_width(&self) -> usize {
        self.address_width
    }

    fn header_len(&self) -> usize {
        // F0, manufacturer, device, model bytes, command
        4 + self.model_id.len()
    }

    /// Structural check: does this message carry our manufacturer and model
    /// ID? The checksum is deliberately not verified here; it is checked
    /// only when the payload is actually decoded.
    pub fn is_own_sysex(&self, message: &[u8]) -> bool {
        message.len() > self.header_len()
            && message[0] == SYSEX_START
            && message[1] == ROLAND_ID
            && message[3..3 + self.model_id.len()] == self.model_id[..]
    }

    /// Device ID field of a message already known to be ours.
    pub fn device_id_of(&self, message: &[u8]) -> u8 {
        message[2] & 0x1F
    }

    /// Assembles one addressed message, computing the checksum over the
    /// address and data bytes. The device ID is capped to Roland's 5-bit
    /// field.
    pub fn build_message(&self, device_id: u8, command: u8, address: &[u8], data: &[u8]) -> Vec<u8> {
        let mut message = Vec::with_capacity(self.header_len() + address.len() + data.len() + 2);
        message.push(SYSEX_START);
        message.push(ROLAND_ID);
        message.push(device_id & 0x1F);
        message.extend_from_slice(&self.model_id);
        message.push(command);
        message.extend_from_slice(address);
        message.extend_from_slice(data);
        let body_start = self.header_len();
        message.push(checksum(&message[body_start..]));
        message.push(SYSEX_END);
        message
    }

    /// Decodes command, address and data of one message, verifying the
    /// checksum over address + data.
    pub fn parse_message<'a>(&self, message: &'a [u8]) -> Result<ParsedMessage<'a>, ProtocolError> {
        let header = self.header_len();
        if message.len() < header + self.address_width + 2 || message.last() != Some(&SYSEX_END) {
            return Err(ProtocolError::TooShort(message.len()));
        }

        let body = &message[header..message.len() - 2];
        let computed = checksum(body);
        let transmitted = message[message.len() - 2];
        if computed != transmitted {
            return Err(ProtocolError::ChecksumMismatch {
                computed,
                transmitted,
            });
        }

        Ok(ParsedMessage {
            command: message[header - 1],
            address: &body[..self.address_width],
            data: &body[self.address_width..],
        })
    }
}
