//! Per-synth instantiations of the engine.
//!
//! Everything in here is configuration: model IDs, block tables, detection
//! method, bank lists. Behavior differences between synths never get their
//! own code paths; they are data resolved into a [`RolandSynth`] at load
//! time.

use crate::adapter::RolandSynth;

mod jv1080;
mod jv80;
mod junods;
mod xv3080;

pub use jv1080::{jv_1080, jv_2080};
pub use jv80::jv_80;
pub use junods::juno_ds;
pub use xv3080::xv_3080;

/// Patch category table shared by the JV-1080 generation onwards, indexed
/// by the category byte in the patch common block.
pub(crate) const PATCH_CATEGORIES: &[&str] = &[
    "NO ASSIGN",
    "AC.PIANO",
    "EL.PIANO",
    "KEYBOARDS",
    "BELL",
    "MALLET",
    "ORGAN",
    "ACCORDION",
    "HARMONICA",
    "AC.GUITAR",
    "EL.GUITAR",
    "DIST.GUITAR",
    "BASS",
    "SYNTH BASS",
    "STRINGS",
    "ORCHESTRA",
    "HIT&STAB",
    "WIND",
    "FLUTE",
    "AC.BRASS",
    "SYNTH BRASS",
    "SAX",
    "HARD LEAD",
    "SOFT LEAD",
    "TECHNO SYNTH",
    "PULSATING",
    "SYNTH FX",
    "OTHER SYNTH",
    "BRIGHT PAD",
    "SOFT PAD",
    "VOX",
    "PLUCKED",
    "ETHNIC",
    "FRETTED",
    "PERCUSSION",
    "SOUND FX",
    "BEAT&GROOVE",
    "DRUMS",
    "COMBINATION",
];

/// Every synth this crate ships an adapter for.
pub fn all() -> Vec<RolandSynth> {
    vec![jv_80(), jv_1080(), jv_2080(), xv_3080(), juno_ds()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_adapter_resolves() {
        for synth in all() {
            assert!(!synth.name().is_empty());
            assert!(!synth.edit_buffer_schema().blocks().is_empty());
            assert_eq!(
                synth.edit_buffer_schema().blocks().len(),
                synth.program_dump_schema().blocks().len(),
                "{}: edit buffer and program dump must share their block list",
                synth.name()
            );
            assert!(!synth.bank_descriptors().is_empty());
        }
    }

    #[test]
    fn writable_banks_come_first() {
        for synth in all() {
            let descriptors = synth.bank_descriptors();
            let first_rom = descriptors.iter().position(|b| b.is_rom);
            if let Some(first_rom) = first_rom {
                assert!(
                    descriptors[first_rom..].iter().all(|b| b.is_rom),
                    "{}: ROM banks must follow all writable banks",
                    synth.name()
                );
            }
        }
    }
}
