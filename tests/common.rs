//! Shared helpers for building synthetic dumps.

use rolandsx::sysex::CMD_DT1;
use rolandsx::{DeviceSession, RolandSynth};

/// Initialise test logging once; repeat calls are fine.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A complete synthetic edit-buffer dump with patterned payloads and the
/// given patch name written into block 0.
pub fn edit_buffer_dump(synth: &RolandSynth, session: &DeviceSession, name: &str) -> Vec<u8> {
    edit_buffer_dump_seeded(synth, session, name, 0)
}

/// Like [`edit_buffer_dump`], with `seed` mixed into every payload byte so
/// two dumps with different seeds carry different patch data.
pub fn edit_buffer_dump_seeded(
    synth: &RolandSynth,
    session: &DeviceSession,
    name: &str,
    seed: u8,
) -> Vec<u8> {
    let schema = synth.edit_buffer_schema();
    let mut out = Vec::new();
    for (index, block) in schema.blocks().iter().enumerate() {
        let mut payload: Vec<u8> = (0..block.size())
            .map(|i| ((index as u32 * 37 + i + u32::from(seed)) % 0x80) as u8)
            .collect();
        if index == 0 {
            let padded = format!("{:<12}", name);
            payload[..12].copy_from_slice(&padded.as_bytes()[..12]);
        }
        let (address, _) = schema.block_request(index, 0);
        out.extend(
            synth
                .wire_format()
                .build_message(session.device_id(), CMD_DT1, &address, &payload),
        );
    }
    out
}
