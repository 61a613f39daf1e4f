//! Roland Juno-DS.
//!
//! XV-derived engine with a three-byte model ID, 256 directly addressable
//! user patches and large preset banks that can only be reached by making a
//! program current via Bank Select / Program Change and reading the edit
//! buffer back.

use crate::adapter::{BankDescriptor, RolandSynth, SynthDefinition};
use crate::detect::DetectMethod;
use crate::schema::{DataBlock, DumpSchema, NameZone};

use super::PATCH_CATEGORIES;

fn patch_blocks() -> Vec<DataBlock> {
    vec![
        DataBlock::new(&[0x00, 0x00, 0x00, 0x00], 0x4F, "Patch common"),
        DataBlock::new(&[0x00, 0x00, 0x02, 0x00], 0x11, "Patch common MFX"),
        DataBlock::new(&[0x00, 0x00, 0x04, 0x00], 0x08, "Patch common chorus"),
        DataBlock::new(&[0x00, 0x00, 0x06, 0x00], 0x0B, "Patch common reverb"),
        DataBlock::new(&[0x00, 0x00, 0x10, 0x00], 0x29, "Patch TMT"),
        DataBlock::new(&[0x00, 0x00, 0x20, 0x00], 0x89, "Patch tone 1"),
        DataBlock::new(&[0x00, 0x00, 0x22, 0x00], 0x89, "Patch tone 2"),
        DataBlock::new(&[0x00, 0x00, 0x24, 0x00], 0x89, "Patch tone 3"),
        DataBlock::new(&[0x00, 0x00, 0x26, 0x00], 0x89, "Patch tone 4"),
    ]
}

/// Roland Juno-DS (DS61/DS76/DS88 are wire-identical).
pub fn juno_ds() -> RolandSynth {
    let preset = |bank: u32, name: &str, lsb: u8| BankDescriptor {
        bank,
        name: name.into(),
        size: 128,
        kind: "Patch".into(),
        is_rom: true,
        bank_select: Some((87, lsb)),
    };
    RolandSynth::new(SynthDefinition {
        name: "Roland Juno-DS",
        model_id: vec![0x00, 0x00, 0x3A],
        address_width: 4,
        edit_buffer: DumpSchema::new(
            "Temporary Patch",
            1,
            4,
            4,
            &[0x1F, 0x00, 0x00, 0x00],
            patch_blocks(),
        ),
        program_dump: DumpSchema::new(
            "User Patch",
            256,
            4,
            4,
            &[0x30, 0x00, 0x00, 0x00],
            patch_blocks(),
        ),
        detect: DetectMethod::Identity {
            family_code: [0x3A, 0x02],
        },
        name_zone: NameZone {
            block: 0,
            offset: 0,
            length: 12,
        },
        category_index: Some(0x0C),
        categories: PATCH_CATEGORIES,
        banks: vec![
            BankDescriptor {
                bank: 0,
                name: "User".into(),
                size: 256,
                kind: "Patch".into(),
                is_rom: false,
                bank_select: Some((87, 0)),
            },
            preset(1, "Preset A", 64),
            preset(2, "Preset B", 65),
            preset(3, "DS", 71),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_patches_above_127_carry_into_the_top_digit() {
        let synth = juno_ds();
        let schema = synth.program_dump_schema();
        let (address, _) = schema.block_request(0, 200);
        // 200 << 14 overflows the second digit and carries one into the
        // first: 0x30 + 1, remainder 72.
        assert_eq!(address, vec![0x31, 0x48, 0x00, 0x00]);
        assert_eq!(schema.subaddress_of(&address), 200);
    }
}
