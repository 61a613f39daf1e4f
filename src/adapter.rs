//! Host-facing capability surface.
//!
//! A [`RolandSynth`] bundles the wire format, the edit-buffer and
//! program-bank schemas and the per-model policy tables (detection method,
//! name/category locations, bank list) into the fixed set of entry points a
//! librarian host calls: detect a device, request and recognize dumps,
//! re-address them between representations, fingerprint them, read and
//! write patch names.

use anyhow::{anyhow, bail, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::detect::{self, DetectMethod, DeviceSession, DEFAULT_DEVICE_ID};
use crate::schema::{DumpSchema, NameZone};
use crate::sysex::{split_messages, ProtocolError, WireFormat, CMD_DT1, CMD_RQ1};

const CONTROL_CHANGE: u8 = 0xB0;
const PROGRAM_CHANGE: u8 = 0xC0;
const CC_BANK_SELECT_MSB: u8 = 0x00;
const CC_BANK_SELECT_LSB: u8 = 0x20;

/// Result of feeding one incoming message to a dump classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpProgress {
    /// Whether the message belongs to the dump being assembled.
    pub recognized: bool,
    /// Request the host must forward to the device before the transfer can
    /// progress, for synths that answer one block per request. Hosts that
    /// already sent the full request set may ignore it.
    pub next_request: Option<Vec<u8>>,
}

impl DumpProgress {
    fn rejected() -> Self {
        Self {
            recognized: false,
            next_request: None,
        }
    }
}

/// One entry of the host-visible bank table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankDescriptor {
    /// Bank number, counted from 0.
    pub bank: u32,
    /// Display name, e.g. "User" or "Preset A".
    pub name: String,
    /// Number of program slots in the bank.
    pub size: u32,
    /// Kind of object stored, e.g. "Patch".
    #[serde(rename = "type")]
    pub kind: String,
    /// Read-only banks cannot be addressed directly and are fetched via
    /// Bank Select + Program Change into the edit buffer instead.
    pub is_rom: bool,
    /// Bank Select (MSB, LSB) pair that makes this bank current.
    pub bank_select: Option<(u8, u8)>,
}

/// Everything a synth model contributes: wire constants, schemas and
/// policy. Purely configuration; behavior differences between models are
/// expressed here, never by subtyping the engine.
pub struct SynthDefinition {
    /// Display name of the synth.
    pub name: &'static str,
    /// Model ID bytes after the device ID.
    pub model_id: Vec<u8>,
    /// Number of 7-bit digits per address (3 or 4).
    pub address_width: usize,
    /// Schema of the temporary (edit buffer) patch.
    pub edit_buffer: DumpSchema,
    /// Schema of the stored program bank.
    pub program_dump: DumpSchema,
    /// How this family answers discovery.
    pub detect: DetectMethod,
    /// Where the patch name lives.
    pub name_zone: NameZone,
    /// Offset of the category byte within block 0, if the model stores one.
    pub category_index: Option<usize>,
    /// Category lookup table indexed by the category byte.
    pub categories: &'static [&'static str],
    /// Host-visible banks, writable ones first.
    pub banks: Vec<BankDescriptor>,
}

/// A fully resolved synth adapter.
pub struct RolandSynth {
    name: &'static str,
    wire: WireFormat,
    edit_buffer: DumpSchema,
    program_dump: DumpSchema,
    detect: DetectMethod,
    name_zone: NameZone,
    category_index: Option<usize>,
    categories: &'static [&'static str],
    banks: Vec<BankDescriptor>,
    edit_buffer_zones: Vec<(usize, usize)>,
    program_dump_zones: Vec<(usize, usize)>,
}

impl RolandSynth {
    /// Resolves a definition into an adapter, precomputing the fingerprint
    /// blank-out zones.
    pub fn new(definition: SynthDefinition) -> Self {
        let wire = WireFormat::new(definition.model_id, definition.address_width);
        // The item-number digit is always the second address digit, which
        // sits right after F0, manufacturer, device, model and command.
        let program_position = 5 + wire.model_id().len();
        let edit_buffer_zones = definition.edit_buffer.blank_out_zones(
            wire.model_id().len(),
            Some(program_position),
            Some(definition.name_zone),
        );
        let program_dump_zones = definition.program_dump.blank_out_zones(
            wire.model_id().len(),
            Some(program_position),
            Some(definition.name_zone),
        );
        Self {
            name: definition.name,
            wire,
            edit_buffer: definition.edit_buffer,
            program_dump: definition.program_dump,
            detect: definition.detect,
            name_zone: definition.name_zone,
            category_index: definition.category_index,
            categories: definition.categories,
            banks: definition.banks,
            edit_buffer_zones,
            program_dump_zones,
        }
    }

    /// Display name of the synth.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Wire format (model ID and address width) of this synth.
    pub fn wire_format(&self) -> &WireFormat {
        &self.wire
    }

    /// Schema of the temporary patch.
    pub fn edit_buffer_schema(&self) -> &DumpSchema {
        &self.edit_buffer
    }

    /// Schema of the stored program bank.
    pub fn program_dump_schema(&self) -> &DumpSchema {
        &self.program_dump
    }

    /// Blank-out zones of the program-dump schema (program slot digit in
    /// every message, patch name in block 0).
    pub fn program_dump_zones(&self) -> &[(usize, usize)] {
        &self.program_dump_zones
    }

    // ------------------------------------------------------------------
    // Device detection
    // ------------------------------------------------------------------

    /// Message probing for this synth on `channel`.
    pub fn create_device_detect_message(&self, channel: u8, session: &mut DeviceSession) -> Vec<u8> {
        session.begin_detection();
        match self.detect {
            DetectMethod::Identity { .. } => detect::identity_request(channel),
            DetectMethod::ProbeRead { block_index } => {
                let (address, size) = self.edit_buffer.block_request(block_index, 0);
                self.wire.build_message(channel, CMD_RQ1, &address, &size)
            }
        }
    }

    /// Evaluates one incoming message as a detect response. On a match the
    /// session captures the announced device ID and the host gets back the
    /// pseudo "MIDI channel" it displays (the low nibble of the device ID).
    pub fn channel_for_device_response(
        &self,
        message: &[u8],
        session: &mut DeviceSession,
    ) -> Option<u8> {
        let device_id = match self.detect {
            DetectMethod::Identity { family_code } => {
                detect::identity_reply_device(message, family_code)?
            }
            DetectMethod::ProbeRead { block_index } => {
                if !self.wire.is_own_sysex(message) {
                    return None;
                }
                let parsed = self.wire.parse_message(message).ok()?;
                let (expected, _) = self.edit_buffer.block_request(block_index, 0);
                if parsed.command != CMD_DT1 || parsed.address != expected.as_slice() {
                    return None;
                }
                self.wire.device_id_of(message)
            }
        };
        debug!("{}: detected device ID {:#04x}", self.name, device_id);
        session.record_detection(device_id);
        Some(device_id & 0x0F)
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    /// One RQ1 per edit-buffer block, concatenated.
    pub fn create_edit_buffer_request(&self, session: &DeviceSession) -> Vec<u8> {
        let mut out = Vec::new();
        for index in 0..self.edit_buffer.blocks().len() {
            let (address, size) = self.edit_buffer.block_request(index, 0);
            out.extend(
                self.wire
                    .build_message(session.device_id(), CMD_RQ1, &address, &size),
            );
        }
        out
    }

    /// Request for stored program `program` (globally numbered across all
    /// banks). Programs in ROM banks cannot be read by address; those are
    /// fetched by making the program current (Bank Select + Program Change
    /// on `channel`) and reading the edit buffer.
    pub fn create_program_dump_request(
        &self,
        session: &DeviceSession,
        channel: u8,
        program: u32,
    ) -> Result<Vec<u8>> {
        let (descriptor, index) = self
            .bank_of(program)
            .ok_or_else(|| anyhow!("program {} is beyond the last bank", program))?;

        if descriptor.is_rom {
            let (msb, lsb) = descriptor.bank_select.ok_or_else(|| {
                anyhow!("bank {} is read-only and has no bank select entry", descriptor.name)
            })?;
            let status = CONTROL_CHANGE | (channel & 0x0F);
            let mut out = vec![
                status,
                CC_BANK_SELECT_MSB,
                msb,
                status,
                CC_BANK_SELECT_LSB,
                lsb + (index / 128) as u8,
                PROGRAM_CHANGE | (channel & 0x0F),
                (index % 128) as u8,
            ];
            out.extend(self.create_edit_buffer_request(session));
            return Ok(out);
        }

        let mut out = Vec::new();
        for block in 0..self.program_dump.blocks().len() {
            let (address, size) = self.program_dump.block_request(block, program);
            out.extend(
                self.wire
                    .build_message(session.device_id(), CMD_RQ1, &address, &size),
            );
        }
        Ok(out)
    }

    /// Single oversized read covering a whole bank.
    ///
    /// The size field is the total item size times 8 -- an empirically
    /// tolerated read window, not documented arithmetic. The device answers
    /// with every block of every program in wire order.
    pub fn create_bank_dump_request(&self, session: &DeviceSession) -> Vec<u8> {
        let address = self.program_dump.base_address();
        let size = self.program_dump.total_size_oversized();
        self.wire
            .build_message(session.device_id(), CMD_RQ1, &address, &size)
    }

    // ------------------------------------------------------------------
    // Dump recognition
    // ------------------------------------------------------------------

    /// Classifies one message against the edit-buffer schema.
    ///
    /// Checksum failures on a message that carries our model ID are hard
    /// errors; messages for other devices come back unrecognized.
    pub fn is_part_of_edit_buffer_dump(&self, message: &[u8]) -> Result<DumpProgress, ProtocolError> {
        self.classify(&self.edit_buffer, message)
    }

    /// Classifies one message against the program-bank schema.
    pub fn is_part_of_single_program_dump(
        &self,
        message: &[u8],
    ) -> Result<DumpProgress, ProtocolError> {
        self.classify(&self.program_dump, message)
    }

    fn classify(
        &self,
        schema: &DumpSchema,
        message: &[u8],
    ) -> Result<DumpProgress, ProtocolError> {
        if !self.wire.is_own_sysex(message) {
            return Ok(DumpProgress::rejected());
        }
        let parsed = self.wire.parse_message(message)?;
        if parsed.command != CMD_DT1 {
            return Ok(DumpProgress::rejected());
        }
        let Some(block) = schema.block_index_of(parsed.address) else {
            return Ok(DumpProgress::rejected());
        };

        let next_request = if block + 1 < schema.blocks().len() {
            let sub = schema.subaddress_of(parsed.address);
            let (address, size) = schema.block_request(block + 1, sub);
            Some(
                self.wire
                    .build_message(self.wire.device_id_of(message), CMD_RQ1, &address, &size),
            )
        } else {
            None
        };
        Ok(DumpProgress {
            recognized: true,
            next_request,
        })
    }

    /// Whether the accumulated messages form one complete edit buffer.
    pub fn is_edit_buffer_dump(&self, data: &[u8]) -> bool {
        self.covers_schema(&self.edit_buffer, data, false)
    }

    /// Whether the accumulated messages form one complete stored program.
    /// All messages must reference the same program slot; a dump straddling
    /// two slots is invalid.
    pub fn is_single_program_dump(&self, data: &[u8]) -> bool {
        self.covers_schema(&self.program_dump, data, true)
    }

    fn covers_schema(&self, schema: &DumpSchema, data: &[u8], same_slot: bool) -> bool {
        let messages = split_messages(data);
        if messages.is_empty() {
            return false;
        }

        let mut seen = vec![false; schema.blocks().len()];
        let mut slot = None;
        for message in messages {
            if !self.wire.is_own_sysex(message) {
                return false;
            }
            let Ok(parsed) = self.wire.parse_message(message) else {
                return false;
            };
            if parsed.command != CMD_DT1 {
                return false;
            }
            let Some(block) = schema.block_index_of(parsed.address) else {
                return false;
            };
            if same_slot {
                let sub = schema.subaddress_of(parsed.address);
                match slot {
                    None => slot = Some(sub),
                    Some(s) if s != sub => return false,
                    _ => {}
                }
            }
            seen[block] = true;
        }
        seen.iter().all(|&b| b)
    }

    fn source_schema(&self, data: &[u8]) -> Option<&DumpSchema> {
        if self.is_edit_buffer_dump(data) {
            Some(&self.edit_buffer)
        } else if self.is_single_program_dump(data) {
            Some(&self.program_dump)
        } else {
            None
        }
    }

    // ------------------------------------------------------------------
    // Conversion
    // ------------------------------------------------------------------

    /// Re-addresses a recognized dump to the edit buffer, preserving every
    /// payload byte.
    pub fn convert_to_edit_buffer(&self, session: &DeviceSession, data: &[u8]) -> Result<Vec<u8>> {
        self.re_address(data, true, 0, session.device_id())
    }

    /// Re-addresses a recognized dump to stored program slot `program`.
    pub fn convert_to_program_dump(
        &self,
        session: &DeviceSession,
        data: &[u8],
        program: u32,
    ) -> Result<Vec<u8>> {
        let (descriptor, _) = self
            .bank_of(program)
            .ok_or_else(|| anyhow!("program {} is beyond the last bank", program))?;
        if descriptor.is_rom {
            bail!("bank {} is read-only", descriptor.name);
        }
        self.re_address(data, false, program, session.device_id())
    }

    fn re_address(
        &self,
        data: &[u8],
        to_edit_buffer: bool,
        sub_address: u32,
        device_id: u8,
    ) -> Result<Vec<u8>> {
        let source = self
            .source_schema(data)
            .ok_or(ProtocolError::UnrecognizedDump)?;
        let target = if to_edit_buffer {
            &self.edit_buffer
        } else {
            &self.program_dump
        };
        debug!(
            "{}: re-addressing {} as {} (item {})",
            self.name,
            source.name(),
            target.name(),
            sub_address
        );

        let mut out = Vec::new();
        for message in split_messages(data) {
            let parsed = self.wire.parse_message(message)?;
            let block = source
                .block_index_of(parsed.address)
                .ok_or(ProtocolError::UnrecognizedDump)?;
            let (address, _) = target.block_request(block, sub_address);
            out.extend(
                self.wire
                    .build_message(device_id, CMD_DT1, &address, parsed.data),
            );
        }
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Content access
    // ------------------------------------------------------------------

    /// Program slot a recognized program dump was stored at.
    pub fn number_from_dump(&self, data: &[u8]) -> Result<u32> {
        if !self.is_single_program_dump(data) {
            bail!("not a single program dump");
        }
        let first = split_messages(data)
            .into_iter()
            .next()
            .ok_or(ProtocolError::UnrecognizedDump)?;
        let parsed = self.wire.parse_message(first)?;
        Ok(self.program_dump.subaddress_of(parsed.address))
    }

    fn block_payload<'a>(&self, data: &'a [u8], block_index: usize) -> Result<&'a [u8]> {
        let schema = self
            .source_schema(data)
            .ok_or(ProtocolError::UnrecognizedDump)?;
        for message in split_messages(data) {
            let parsed = self.wire.parse_message(message)?;
            if schema.block_index_of(parsed.address) == Some(block_index) {
                return Ok(parsed.data);
            }
        }
        Err(ProtocolError::UnrecognizedDump.into())
    }

    /// Patch name, trailing whitespace trimmed.
    pub fn name_from_dump(&self, data: &[u8]) -> Result<String> {
        let payload = self.block_payload(data, self.name_zone.block)?;
        let end = self.name_zone.offset + self.name_zone.length;
        if payload.len() < end {
            bail!("block {} too short to hold a name", self.name_zone.block);
        }
        let raw = &payload[self.name_zone.offset..end];
        Ok(String::from_utf8_lossy(raw).trim_end().to_string())
    }

    /// Writes a new patch name into the dump, space-padded to the name
    /// field length, and recomputes the affected checksum. Bytes outside
    /// printable ASCII become spaces.
    pub fn rename_patch(&self, data: &[u8], name: &str) -> Result<Vec<u8>> {
        let schema = self
            .source_schema(data)
            .ok_or(ProtocolError::UnrecognizedDump)?;

        let mut field = vec![b' '; self.name_zone.length];
        for (slot, c) in field.iter_mut().zip(name.chars()) {
            *slot = if c.is_ascii_graphic() || c == ' ' {
                c as u8
            } else {
                b' '
            };
        }

        let mut out = Vec::new();
        for message in split_messages(data) {
            let parsed = self.wire.parse_message(message)?;
            if schema.block_index_of(parsed.address) == Some(self.name_zone.block) {
                let end = self.name_zone.offset + self.name_zone.length;
                if parsed.data.len() < end {
                    bail!("block {} too short to hold a name", self.name_zone.block);
                }
                let mut payload = parsed.data.to_vec();
                payload[self.name_zone.offset..end].copy_from_slice(&field);
                out.extend(self.wire.build_message(
                    self.wire.device_id_of(message),
                    CMD_DT1,
                    parsed.address,
                    &payload,
                ));
            } else {
                out.extend_from_slice(message);
            }
        }
        Ok(out)
    }

    /// Stable content digest of a recognized dump, independent of device
    /// ID, program slot and patch name.
    ///
    /// The dump is first canonicalized to edit-buffer form so that a patch
    /// hashes the same whether it arrived from the edit buffer or from any
    /// stored slot; the precomputed blank-out zones then erase the slot
    /// digit and the name before hashing.
    pub fn calculate_fingerprint(&self, data: &[u8]) -> Result<String> {
        let mut canonical = self.re_address(data, true, 0, DEFAULT_DEVICE_ID)?;
        for &(start, length) in &self.edit_buffer_zones {
            let end = (start + length).min(canonical.len());
            for byte in &mut canonical[start.min(end)..end] {
                *byte = 0;
            }
        }
        Ok(format!("{:x}", md5::compute(&canonical)))
    }

    /// Category tags stored in the patch, mapped through the model's
    /// category table. Unknown category bytes are reported and ignored.
    pub fn stored_tags(&self, data: &[u8]) -> Result<Vec<&'static str>> {
        let Some(index) = self.category_index else {
            return Ok(Vec::new());
        };
        let payload = self.block_payload(data, self.name_zone.block)?;
        let Some(&byte) = payload.get(index) else {
            bail!("block {} too short to hold a category", self.name_zone.block);
        };
        match self.categories.get(byte as usize).copied() {
            Some(category) => Ok(vec![category]),
            None => {
                warn!(
                    "{}: unknown category byte {:#04x}, ignoring",
                    self.name, byte
                );
                Ok(Vec::new())
            }
        }
    }

    // ------------------------------------------------------------------
    // Banks
    // ------------------------------------------------------------------

    /// The host-visible bank table.
    pub fn bank_descriptors(&self) -> &[BankDescriptor] {
        &self.banks
    }

    /// Slots per bank, as the host's download loop counts them.
    pub fn number_of_patches_per_bank(&self) -> u32 {
        self.banks
            .first()
            .map(|b| b.size)
            .unwrap_or_else(|| self.program_dump.item_count())
    }

    /// Descriptor and in-bank index for a global program number.
    pub fn bank_of(&self, program: u32) -> Option<(&BankDescriptor, u32)> {
        let mut first = 0;
        for descriptor in &self.banks {
            if program < first + descriptor.size {
                return Some((descriptor, program - first));
            }
            first += descriptor.size;
        }
        None
    }

    /// Human-readable bank/slot rendering of a global program number.
    pub fn friendly_program_name(&self, program: u32) -> String {
        match self.bank_of(program) {
            Some((descriptor, index)) => format!("{} {:03}", descriptor.name, index + 1),
            None => format!("Program {}", program),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::synths::jv_1080;

    #[test]
    fn blank_out_zones_cover_slot_digit_and_name() {
        let synth = jv_1080();
        let zones = synth.program_dump_zones();
        let blocks = synth.program_dump_schema().blocks();

        // One slot-digit zone per block, plus the name in block 0.
        assert_eq!(zones.len(), blocks.len() + 1);
        // Slot digit: F0, mfr, device, model, command, then the second
        // address digit.
        assert_eq!(zones[0], (6, 1));
        // Name: twelve bytes at the start of block 0's data section.
        assert_eq!(zones[1], (9, 12));
        // Next message starts after 11 bytes of envelope plus the common
        // block's 0x48 data bytes.
        assert_eq!(zones[2], (11 + 0x48 + 6, 1));
    }
}
