//! Device discovery and per-session state.
//!
//! Roland device IDs are a 5-bit field distinct from the MIDI channel and
//! cannot be deduced from it, so the ID announced by the responding device
//! has to be remembered for every subsequent outgoing message. That single
//! piece of mutable state lives in an explicit [`DeviceSession`] value, one
//! per connected instrument, instead of hiding in a global.

use serde::{Deserialize, Serialize};

use crate::sysex::{ROLAND_ID, SYSEX_END, SYSEX_START};

/// Device ID assumed before anything has been detected. Roland ships most
/// units with 17 (0x10) preset.
pub const DEFAULT_DEVICE_ID: u8 = 0x10;

const UNIVERSAL_NON_REALTIME: u8 = 0x7E;
const GENERAL_INFORMATION: u8 = 0x06;
const IDENTITY_REQUEST: u8 = 0x01;
const IDENTITY_REPLY: u8 = 0x02;

/// How a synth family answers discovery.
#[derive(Debug, Clone)]
pub enum DetectMethod {
    /// The synth answers a Universal Identity Request. The reply is matched
    /// on manufacturer and the two family-code bytes; the model ID is
    /// absent from identity replies.
    Identity {
        /// Family code bytes announced in the identity reply.
        family_code: [u8; 2],
    },
    /// Older devices that ignore identity requests are probed by reading
    /// one edit-buffer block; a checksum-valid reply at the expected
    /// address counts as detection.
    ProbeRead {
        /// Which edit-buffer block to request as the probe.
        block_index: usize,
    },
}

/// Detection progress of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectState {
    /// No probe sent yet.
    Undetected,
    /// A detect message went out; replies are being evaluated.
    Detecting,
    /// A device answered; its ID is now fixed for the session lifetime.
    Detected,
}

/// Per-instrument mutable state.
///
/// Created when the adapter loads, written exactly once per detection cycle
/// and read by every request-building call afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSession {
    device_id: u8,
    state: DetectState,
}

impl DeviceSession {
    /// A fresh session using the factory-default device ID.
    pub fn new() -> Self {
        Self {
            device_id: DEFAULT_DEVICE_ID,
            state: DetectState::Undetected,
        }
    }

    /// The device ID used for all outgoing addressed messages.
    pub fn device_id(&self) -> u8 {
        self.device_id
    }

    /// Current detection progress.
    pub fn state(&self) -> DetectState {
        self.state
    }

    pub(crate) fn begin_detection(&mut self) {
        if self.state == DetectState::Undetected {
            self.state = DetectState::Detecting;
        }
    }

    pub(crate) fn record_detection(&mut self, device_id: u8) {
        self.device_id = device_id & 0x1F;
        self.state = DetectState::Detected;
    }
}

impl Default for DeviceSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Universal Identity Request addressed to `channel`.
pub fn identity_request(channel: u8) -> Vec<u8> {
    vec![
        SYSEX_START,
        UNIVERSAL_NON_REALTIME,
        channel & 0x1F,
        GENERAL_INFORMATION,
        IDENTITY_REQUEST,
        SYSEX_END,
    ]
}

/// Extracts the announced device ID from an Identity Reply matching
/// `family_code`, or `None` when the message is something else.
pub fn identity_reply_device(message: &[u8], family_code: [u8; 2]) -> Option<u8> {
    // F0 7E <device> 06 02 41 <family lo> <family hi> <member..> <version..> F7
    if message.len() >= 12
        && message[0] == SYSEX_START
        && message[1] == UNIVERSAL_NON_REALTIME
        && message[3] == GENERAL_INFORMATION
        && message[4] == IDENTITY_REPLY
        && message[5] == ROLAND_ID
        && message[6..8] == family_code
    {
        Some(message[2] & 0x1F)
    } else {
        None
    }
}
