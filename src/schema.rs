//! Addressed-block schemas.
//!
//! A [`DumpSchema`] describes one logical object in the synth's memory map
//! (the edit buffer, or a bank of stored programs) as an ordered list of
//! named fixed-size blocks anchored at a base address. All request and
//! recognition arithmetic for that object lives here.

use std::collections::HashSet;

use crate::address::{number_from_7bit, to_7bit_list};

/// A named, fixed-size region within a logical object.
///
/// Immutable once constructed; each synth model defines its blocks once at
/// adapter load time ("Patch common", "Patch tone 1" and so on).
#[derive(Debug, Clone)]
pub struct DataBlock {
    offset: u32,
    size: u32,
    name: &'static str,
}

impl DataBlock {
    /// Creates a block at `offset` (a 7-bit address relative to the schema
    /// base) spanning `size` bytes.
    pub fn new(offset: &[u8], size: u32, name: &'static str) -> Self {
        Self {
            offset: number_from_7bit(offset),
            size,
            name,
        }
    }

    /// Offset relative to the schema base, as an integer.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Block size in bytes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Human-readable block name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Location of the patch name within a dump, in block-relative terms.
#[derive(Debug, Clone, Copy)]
pub struct NameZone {
    /// Index of the block carrying the name (always block 0 on JV/XV synths).
    pub block: usize,
    /// Byte offset of the name within that block's data section.
    pub offset: usize,
    /// Name length in bytes.
    pub length: usize,
}

/// Schema of one logical object type: edit buffer or program bank.
#[derive(Debug, Clone)]
pub struct DumpSchema {
    name: &'static str,
    item_count: u32,
    address_width: usize,
    size_width: usize,
    base_address: u32,
    blocks: Vec<DataBlock>,
    total_size: u32,
    allowed_addresses: HashSet<u32>,
}

impl DumpSchema {
    /// Builds a schema from its static table.
    ///
    /// `item_count` is the number of addressable items (1 for an edit
    /// buffer), `address_width`/`size_width` the number of 7-bit digits in
    /// wire addresses and sizes, `base_address` the absolute anchor.
    pub fn new(
        name: &'static str,
        item_count: u32,
        address_width: usize,
        size_width: usize,
        base_address: &[u8],
        blocks: Vec<DataBlock>,
    ) -> Self {
        let base = number_from_7bit(base_address);
        let total_size = blocks.iter().map(|b| b.size).sum();
        let allowed_addresses = blocks.iter().map(|b| base + b.offset).collect();
        Self {
            name,
            item_count,
            address_width,
            size_width,
            base_address: base,
            blocks,
            total_size,
            allowed_addresses,
        }
    }

    /// Schema name, e.g. "JV-1080 Temporary Patch".
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of addressable items (bank size; 1 for an edit buffer).
    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    /// Number of 7-bit digits in a wire address.
    pub fn address_width(&self) -> usize {
        self.address_width
    }

    /// Number of 7-bit digits in a wire size field.
    pub fn size_width(&self) -> usize {
        self.size_width
    }

    /// The blocks making up one item, in wire order.
    pub fn blocks(&self) -> &[DataBlock] {
        &self.blocks
    }

    /// Sum of all block sizes.
    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    /// The schema base address rendered as wire digits.
    pub fn base_address(&self) -> Vec<u8> {
        to_7bit_list(self.base_address, self.address_width)
    }

    /// Bit position of the item-number digit within an address.
    ///
    /// The item number occupies the second-from-most-significant digit: bit
    /// 14 for 4-digit addresses, bit 7 for 3-digit ones. This is how Roland
    /// carves its address space on the JV/XV families and must not change
    /// per synth.
    fn item_shift(&self) -> u32 {
        7 * (self.address_width as u32 - 2)
    }

    /// Absolute wire address of a location given relative to the base.
    pub fn absolute_address(&self, relative: &[u8]) -> Vec<u8> {
        to_7bit_list(
            number_from_7bit(relative) + self.base_address,
            self.address_width,
        )
    }

    /// Address and size fields for requesting one block of item
    /// `sub_address`.
    pub fn block_request(&self, block_index: usize, sub_address: u32) -> (Vec<u8>, Vec<u8>) {
        let block = &self.blocks[block_index];
        let address = to_7bit_list(
            self.base_address + (sub_address << self.item_shift()) + block.offset,
            self.address_width,
        );
        let size = to_7bit_list(block.size, self.size_width);
        (address, size)
    }

    /// Recovers the item number encoded in an absolute address.
    ///
    /// Only meaningful for addresses that [`Self::contains_address`]
    /// accepts; anything below the base address yields 0.
    pub fn subaddress_of(&self, address: &[u8]) -> u32 {
        let value = number_from_7bit(address);
        value.saturating_sub(self.base_address) >> self.item_shift()
    }

    /// Strips the item-number contribution out of an absolute address,
    /// returning the address as if the sub-address were 0.
    pub fn strip_subaddress(&self, address: &[u8]) -> u32 {
        let value = number_from_7bit(address);
        let sub = value.saturating_sub(self.base_address) >> self.item_shift();
        value - (sub << self.item_shift())
    }

    /// Whether `address` points at one of this schema's blocks, for any
    /// valid item number. Addresses whose recovered item number falls
    /// outside the bank are foreign (they belong to some other region of
    /// the memory map that merely lies above our base).
    pub fn contains_address(&self, address: &[u8]) -> bool {
        if number_from_7bit(address) < self.base_address
            || self.subaddress_of(address) >= self.item_count
        {
            return false;
        }
        self.allowed_addresses.contains(&self.strip_subaddress(address))
    }

    /// Index of the block an absolute address points at, if any.
    pub fn block_index_of(&self, address: &[u8]) -> Option<usize> {
        if !self.contains_address(address) {
            return None;
        }
        let normalized = self.strip_subaddress(address);
        self.blocks
            .iter()
            .position(|b| self.base_address + b.offset == normalized)
    }

    /// Size field covering all blocks of one item in a single request.
    ///
    /// The factor 8 is an empirically tolerated oversize read window, not
    /// documented Roland arithmetic; the JV/XV units answer such a request
    /// with every block in sequence. Do not carry this to new synth
    /// families without checking against hardware.
    pub fn total_size_oversized(&self) -> Vec<u8> {
        to_7bit_list(self.total_size * 8, self.size_width)
    }

    /// Byte ranges, as offsets into the concatenation of this schema's
    /// messages, that must be zeroed before fingerprinting.
    ///
    /// `program_position` is the offset within each message of the address
    /// digit carrying the item number; `name` locates the patch name.
    pub fn blank_out_zones(
        &self,
        model_id_len: usize,
        program_position: Option<usize>,
        name: Option<NameZone>,
    ) -> Vec<(usize, usize)> {
        // Per message: F0, mfr, device, model, command, address, data,
        // checksum, F7.
        let overhead = 6 + model_id_len + self.address_width;
        let data_offset = 4 + model_id_len + self.address_width;
        let mut zones = Vec::new();
        let mut start = 0usize;
        for (index, block) in self.blocks.iter().enumerate() {
            if let Some(position) = program_position {
                zones.push((start + position, 1));
            }
            if let Some(name) = name {
                if name.block == index {
                    zones.push((start + data_offset + name.offset, name.length));
                }
            }
            start += overhead + block.size as usize;
        }
        zones
    }
}
