//! Roland JV-80 / JV-880.
//!
//! The oldest family covered: 64 user patches, smaller blocks, no category
//! byte, and no answer to identity requests.

use crate::adapter::{BankDescriptor, RolandSynth, SynthDefinition};
use crate::detect::DetectMethod;
use crate::schema::{DataBlock, DumpSchema, NameZone};

fn patch_blocks() -> Vec<DataBlock> {
    vec![
        DataBlock::new(&[0x00, 0x00, 0x00, 0x00], 0x22, "Patch common"),
        DataBlock::new(&[0x00, 0x00, 0x08, 0x00], 0x73, "Patch tone 1"),
        DataBlock::new(&[0x00, 0x00, 0x09, 0x00], 0x73, "Patch tone 2"),
        DataBlock::new(&[0x00, 0x00, 0x0A, 0x00], 0x73, "Patch tone 3"),
        DataBlock::new(&[0x00, 0x00, 0x0B, 0x00], 0x73, "Patch tone 4"),
    ]
}

/// Roland JV-80 (and the JV-880 rack version, which is wire-identical).
pub fn jv_80() -> RolandSynth {
    RolandSynth::new(SynthDefinition {
        name: "Roland JV-80",
        model_id: vec![0x46],
        address_width: 4,
        edit_buffer: DumpSchema::new(
            "Temporary Patch",
            1,
            4,
            4,
            &[0x00, 0x08, 0x20, 0x00],
            patch_blocks(),
        ),
        program_dump: DumpSchema::new(
            "Internal Patch",
            64,
            4,
            4,
            &[0x01, 0x40, 0x00, 0x00],
            patch_blocks(),
        ),
        detect: DetectMethod::ProbeRead { block_index: 0 },
        name_zone: NameZone {
            block: 0,
            offset: 0,
            length: 12,
        },
        category_index: None,
        categories: &[],
        banks: vec![
            BankDescriptor {
                bank: 0,
                name: "Internal".into(),
                size: 64,
                kind: "Patch".into(),
                is_rom: false,
                bank_select: None,
            },
            BankDescriptor {
                bank: 1,
                name: "Preset A".into(),
                size: 64,
                kind: "Patch".into(),
                is_rom: true,
                bank_select: Some((80, 0)),
            },
            BankDescriptor {
                bank: 2,
                name: "Preset B".into(),
                size: 64,
                kind: "Patch".into(),
                is_rom: true,
                bank_select: Some((80, 1)),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_patch_addressing_stays_in_seven_bits() {
        let synth = jv_80();
        // The last internal patch lands on digit value 0x7F, the top of the
        // 7-bit range.
        let (address, _) = synth.program_dump_schema().block_request(0, 63);
        assert_eq!(address, vec![0x01, 0x7F, 0x00, 0x00]);
        assert_eq!(synth.program_dump_schema().subaddress_of(&address), 63);
    }
}
