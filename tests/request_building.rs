use rolandsx::address::to_7bit_list;
use rolandsx::sysex::{split_messages, CMD_RQ1};
use rolandsx::synths::{jv_1080, juno_ds};
use rolandsx::DeviceSession;

mod common;
use common::init_logging;

#[test]
fn edit_buffer_request_covers_every_block() {
    init_logging();
    let synth = jv_1080();
    let session = DeviceSession::new();
    let request = synth.create_edit_buffer_request(&session);

    let schema = synth.edit_buffer_schema();
    let messages = split_messages(&request);
    assert_eq!(messages.len(), schema.blocks().len());

    for (index, message) in messages.iter().enumerate() {
        let parsed = synth.wire_format().parse_message(message).unwrap();
        let (address, size) = schema.block_request(index, 0);
        assert_eq!(parsed.command, CMD_RQ1);
        assert_eq!(parsed.address, address.as_slice());
        assert_eq!(parsed.data, size.as_slice());
    }
}

#[test]
fn program_dump_request_at_the_bank_boundary() {
    let synth = jv_1080();
    let session = DeviceSession::new();

    // Program 127 is the last slot of the writable User bank and is read
    // directly by address.
    let direct = synth
        .create_program_dump_request(&session, 0, 127)
        .unwrap();
    let messages = split_messages(&direct);
    assert_eq!(messages.len(), synth.program_dump_schema().blocks().len());
    let parsed = synth.wire_format().parse_message(messages[0]).unwrap();
    assert_eq!(parsed.address, &[0x11, 0x7F, 0x00, 0x00]);

    // Program 128 crosses into Preset A, which is ROM: the request makes
    // the program current and reads the edit buffer back instead.
    let indirect = synth
        .create_program_dump_request(&session, 0, 128)
        .unwrap();
    assert_eq!(
        &indirect[..8],
        &[0xB0, 0x00, 81, 0xB0, 0x20, 0, 0xC0, 0]
    );
    assert_eq!(
        &indirect[8..],
        synth.create_edit_buffer_request(&session).as_slice()
    );
}

#[test]
fn bank_dump_request_uses_the_oversized_size_field() {
    let synth = jv_1080();
    let session = DeviceSession::new();
    let request = synth.create_bank_dump_request(&session);
    let parsed = synth.wire_format().parse_message(&request).unwrap();

    assert_eq!(parsed.command, CMD_RQ1);
    assert_eq!(parsed.address, &[0x11, 0x00, 0x00, 0x00]);
    let total = synth.program_dump_schema().total_size();
    assert_eq!(parsed.data, to_7bit_list(total * 8, 4).as_slice());
}

#[test]
fn bank_bookkeeping() {
    let synth = jv_1080();
    assert_eq!(synth.number_of_patches_per_bank(), 128);
    assert_eq!(synth.friendly_program_name(0), "User 001");
    assert_eq!(synth.friendly_program_name(130), "Preset A 003");

    let (last, index) = synth.bank_of(639).unwrap();
    assert_eq!(last.name, "Preset D");
    assert_eq!(index, 127);
    assert!(synth.bank_of(640).is_none());

    let juno = juno_ds();
    assert_eq!(juno.number_of_patches_per_bank(), 256);
    assert_eq!(juno.friendly_program_name(255), "User 256");
    assert_eq!(juno.friendly_program_name(256), "Preset A 001");
}
