//! Roland JV-1080 and JV-2080.
//!
//! Both revisions answer to model ID 0x6A; the JV-2080 grew the patch
//! common block by two bytes and two more preset banks. The differences are
//! resolved here, once, into concrete schemas.

use crate::adapter::{BankDescriptor, RolandSynth, SynthDefinition};
use crate::detect::DetectMethod;
use crate::schema::{DataBlock, DumpSchema, NameZone};

use super::PATCH_CATEGORIES;

struct FamilyVariant {
    name: &'static str,
    common_size: u32,
    preset_banks: &'static [&'static str],
}

fn patch_blocks(common_size: u32) -> Vec<DataBlock> {
    vec![
        DataBlock::new(&[0x00, 0x00, 0x00, 0x00], common_size, "Patch common"),
        DataBlock::new(&[0x00, 0x00, 0x10, 0x00], 0x81, "Patch tone 1"),
        DataBlock::new(&[0x00, 0x00, 0x12, 0x00], 0x81, "Patch tone 2"),
        DataBlock::new(&[0x00, 0x00, 0x14, 0x00], 0x81, "Patch tone 3"),
        DataBlock::new(&[0x00, 0x00, 0x16, 0x00], 0x81, "Patch tone 4"),
    ]
}

fn family(variant: FamilyVariant) -> RolandSynth {
    let mut banks = vec![BankDescriptor {
        bank: 0,
        name: "User".into(),
        size: 128,
        kind: "Patch".into(),
        is_rom: false,
        bank_select: Some((80, 0)),
    }];
    for (index, name) in variant.preset_banks.iter().enumerate() {
        banks.push(BankDescriptor {
            bank: index as u32 + 1,
            name: (*name).into(),
            size: 128,
            kind: "Patch".into(),
            is_rom: true,
            bank_select: Some((81, index as u8)),
        });
    }

    RolandSynth::new(SynthDefinition {
        name: variant.name,
        model_id: vec![0x6A],
        address_width: 4,
        edit_buffer: DumpSchema::new(
            "Temporary Patch",
            1,
            4,
            4,
            &[0x03, 0x00, 0x00, 0x00],
            patch_blocks(variant.common_size),
        ),
        program_dump: DumpSchema::new(
            "User Patch",
            128,
            4,
            4,
            &[0x11, 0x00, 0x00, 0x00],
            patch_blocks(variant.common_size),
        ),
        // Predates the Universal Identity Reply; reading the patch common
        // block of the edit buffer doubles as the probe.
        detect: DetectMethod::ProbeRead { block_index: 0 },
        name_zone: NameZone {
            block: 0,
            offset: 0,
            length: 12,
        },
        category_index: Some(0x0C),
        categories: PATCH_CATEGORIES,
        banks,
    })
}

/// Roland JV-1080.
pub fn jv_1080() -> RolandSynth {
    family(FamilyVariant {
        name: "Roland JV-1080",
        common_size: 0x48,
        preset_banks: &["Preset A", "Preset B", "Preset C", "Preset D"],
    })
}

/// Roland JV-2080.
pub fn jv_2080() -> RolandSynth {
    family(FamilyVariant {
        name: "Roland JV-2080",
        common_size: 0x4A,
        preset_banks: &[
            "Preset A", "Preset B", "Preset C", "Preset D", "Preset E", "Session",
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revisions_share_model_but_not_block_sizes() {
        let jv1080 = jv_1080();
        let jv2080 = jv_2080();
        assert_eq!(jv1080.wire_format().model_id(), jv2080.wire_format().model_id());
        assert_eq!(jv1080.edit_buffer_schema().blocks()[0].size(), 0x48);
        assert_eq!(jv2080.edit_buffer_schema().blocks()[0].size(), 0x4A);
        assert_eq!(jv1080.edit_buffer_schema().total_size(), 0x48 + 4 * 0x81);
    }

    #[test]
    fn user_patch_addressing() {
        let synth = jv_1080();
        let (address, size) = synth.program_dump_schema().block_request(0, 33);
        assert_eq!(address, vec![0x11, 0x21, 0x00, 0x00]);
        assert_eq!(size, vec![0x00, 0x00, 0x00, 0x48]);
        let (tone, _) = synth.program_dump_schema().block_request(1, 33);
        assert_eq!(tone, vec![0x11, 0x21, 0x10, 0x00]);
    }
}
