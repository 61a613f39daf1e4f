use rolandsx::sysex::CMD_RQ1;
use rolandsx::synths::{jv_1080, xv_3080};
use rolandsx::{DetectState, DeviceSession};

mod common;
use common::init_logging;

#[test]
fn identity_detection_captures_the_device_id() {
    init_logging();
    let synth = xv_3080();
    let mut session = DeviceSession::new();

    let probe = synth.create_device_detect_message(0x00, &mut session);
    assert_eq!(probe, vec![0xF0, 0x7E, 0x00, 0x06, 0x01, 0xF7]);
    assert_eq!(session.state(), DetectState::Detecting);

    // Identity reply from device 0x13, family code 10 01.
    let reply = vec![
        0xF0, 0x7E, 0x13, 0x06, 0x02, 0x41, 0x10, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00,
        0xF7,
    ];
    let channel = synth.channel_for_device_response(&reply, &mut session);
    assert_eq!(channel, Some(0x03));
    assert_eq!(session.device_id(), 0x13);
    assert_eq!(session.state(), DetectState::Detected);

    // Every request built afterwards addresses the detected device.
    let request = synth.create_edit_buffer_request(&session);
    assert_eq!(request[2], 0x13);
}

#[test]
fn identity_reply_for_another_family_is_ignored() {
    let synth = xv_3080();
    let mut session = DeviceSession::new();
    let reply = vec![
        0xF0, 0x7E, 0x13, 0x06, 0x02, 0x41, 0x3A, 0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00,
        0xF7,
    ];
    assert_eq!(synth.channel_for_device_response(&reply, &mut session), None);
    assert_eq!(session.state(), DetectState::Undetected);
}

#[test]
fn probe_read_detection_for_pre_identity_devices() {
    init_logging();
    let synth = jv_1080();
    let mut session = DeviceSession::new();

    let probe = synth.create_device_detect_message(0x02, &mut session);
    let parsed = synth.wire_format().parse_message(&probe).unwrap();
    assert_eq!(probe[2], 0x02);
    assert_eq!(parsed.command, CMD_RQ1);
    assert_eq!(parsed.address, &[0x03, 0x00, 0x00, 0x00]);

    // The device answers the probe with the requested block.
    let payload = vec![0x00; 0x48];
    let reply = synth.wire_format().build_message(
        0x02,
        rolandsx::sysex::CMD_DT1,
        &[0x03, 0x00, 0x00, 0x00],
        &payload,
    );
    let channel = synth.channel_for_device_response(&reply, &mut session);
    assert_eq!(channel, Some(0x02));
    assert_eq!(session.device_id(), 0x02);

    let request = synth.create_edit_buffer_request(&session);
    assert_eq!(request[2], 0x02);
}

#[test]
fn probe_reply_at_the_wrong_address_is_ignored() {
    let synth = jv_1080();
    let mut session = DeviceSession::new();
    synth.create_device_detect_message(0x02, &mut session);

    let reply = synth.wire_format().build_message(
        0x02,
        rolandsx::sysex::CMD_DT1,
        &[0x11, 0x00, 0x00, 0x00],
        &[0x00; 0x48],
    );
    assert_eq!(synth.channel_for_device_response(&reply, &mut session), None);

    // A different manufacturer entirely never matches.
    let yamaha = vec![0xF0, 0x43, 0x00, 0x09, 0x20, 0x00, 0xF7];
    assert_eq!(synth.channel_for_device_response(&yamaha, &mut session), None);
}
