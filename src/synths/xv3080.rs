//! Roland XV-3080.
//!
//! XV-generation patches split the common block into common / MFX / chorus
//! / reverb sections and add a tone-mix table, all still plain addressed
//! blocks. First family here that answers the Universal Identity Request.

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

/// Roland XV-3080.
pub fn xv_3080() -> RolandSynth {
    let preset = |bank: u32, name: &str, lsb: u8| BankDescriptor {
        bank,
        name: name.into(),
        size: 128,
        kind: "Patch".into(),
        is_rom: true,
        bank_select: Some((87, lsb)),
    };
    RolandSynth::new(SynthDefinition {
        name: "Roland XV-3080",
        model_id: vec![0x00, 0x10],
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
            128,
            4,
            4,
            &[0x30, 0x00, 0x00, 0x00],
            patch_blocks(),
        ),
        detect: DetectMethod::Identity {
            family_code: [0x10, 0x01],
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
                size: 128,
                kind: "Patch".into(),
                is_rom: false,
                bank_select: Some((87, 0)),
            },
            preset(1, "Preset A", 64),
            preset(2, "Preset B", 65),
            preset(3, "Preset C", 66),
            preset(4, "Preset D", 67),
            preset(5, "Preset E", 68),
        ],
    })
}
