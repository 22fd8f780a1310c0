use bytes::Bytes;

use super::convert;
use crate::error::ConvertError;
use crate::fake::{
    audio_stream, packet, subtitle_stream, video_stream, FakeEngine, FakeInput, FakeOutput,
    Ledger, OutputEvent,
};

#[test]
fn test_converts_video_and_audio_input() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    let mut input = FakeInput::new(
        vec![video_stream(0), audio_stream(1)],
        vec![
            packet(0, 0),
            packet(1, 0),
            packet(0, 15360),
            packet(1, 48000),
        ],
    );
    let mut output = FakeOutput::default();

    convert(&mut engine, &mut input, &mut output).unwrap();

    assert_eq!(
        output.events,
        vec![
            OutputEvent::StreamAdded(0),
            OutputEvent::StreamAdded(1),
            OutputEvent::IoOpened,
            OutputEvent::Header,
            // video re-encoded: one second is 30 ticks of the 1/30 base
            OutputEvent::Packet {
                stream_index: 0,
                pts: Some(0),
                dts: Some(0),
                data: Bytes::from_static(b"encoded"),
            },
            // audio copied byte for byte, timestamps rescaled to 1/90000
            OutputEvent::Packet {
                stream_index: 1,
                pts: Some(0),
                dts: Some(0),
                data: Bytes::from("pkt-1-0"),
            },
            OutputEvent::Packet {
                stream_index: 0,
                pts: Some(30),
                dts: Some(30),
                data: Bytes::from_static(b"encoded"),
            },
            OutputEvent::Packet {
                stream_index: 1,
                pts: Some(90000),
                dts: Some(90000),
                data: Bytes::from("pkt-1-48000"),
            },
            OutputEvent::Trailer,
            OutputEvent::IoClosed,
        ]
    );
    assert_eq!(ledger.live(), 0);
}

#[test]
fn test_subtitle_only_input_yields_empty_output() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    let mut input = FakeInput::new(vec![subtitle_stream(0)], vec![packet(0, 0), packet(0, 500)]);
    let mut output = FakeOutput::default();

    convert(&mut engine, &mut input, &mut output).unwrap();

    assert!(output.streams.is_empty());
    assert_eq!(
        output.events,
        vec![
            OutputEvent::IoOpened,
            OutputEvent::Header,
            OutputEvent::Trailer,
            OutputEvent::IoClosed,
        ]
    );
    assert_eq!(ledger.opened(), 0);
}

#[test]
fn test_dropped_packets_are_skipped_between_kept_streams() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    let mut input = FakeInput::new(
        vec![audio_stream(0), subtitle_stream(1)],
        vec![packet(1, 0), packet(0, 0), packet(1, 100)],
    );
    let mut output = FakeOutput::default();

    convert(&mut engine, &mut input, &mut output).unwrap();

    assert_eq!(output.written().len(), 1);
}

#[test]
fn test_open_io_failure_rolls_back_contexts() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    let mut input = FakeInput::new(vec![video_stream(0)], vec![packet(0, 0)]);
    let mut output = FakeOutput::default();
    output.fail_open_io = true;

    let err = convert(&mut engine, &mut input, &mut output).unwrap_err();

    assert!(matches!(err, ConvertError::Setup(_)));
    assert!(err.to_string().contains("failed to open output"));
    assert!(!output.events.contains(&OutputEvent::Header));
    assert_eq!(ledger.live(), 0);
}

#[test]
fn test_header_failure_still_tears_down() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    let mut input = FakeInput::new(vec![video_stream(0)], vec![packet(0, 0)]);
    let mut output = FakeOutput::default();
    output.fail_header = true;

    let err = convert(&mut engine, &mut input, &mut output).unwrap_err();

    assert!(matches!(err, ConvertError::Header(_)));
    assert_eq!(
        err.to_string(),
        "failed to write header to output: invalid argument"
    );
    assert!(output.written().is_empty());
    assert!(!output.events.contains(&OutputEvent::Trailer));
    assert!(output.events.contains(&OutputEvent::IoClosed));
    assert_eq!(ledger.live(), 0);
}

#[test]
fn test_write_failure_aborts_the_body() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    let mut input = FakeInput::new(
        vec![audio_stream(0)],
        vec![packet(0, 0), packet(0, 1000), packet(0, 2000)],
    );
    let mut output = FakeOutput::default();
    output.fail_write_at = Some(1);

    let err = convert(&mut engine, &mut input, &mut output).unwrap_err();

    assert!(matches!(err, ConvertError::Write(_)));
    assert_eq!(output.written().len(), 1);
    assert!(!output.events.contains(&OutputEvent::Trailer));
    assert!(output.events.contains(&OutputEvent::IoClosed));
}

#[test]
fn test_trailer_failure_is_reported() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    let mut input = FakeInput::new(vec![audio_stream(0)], vec![packet(0, 0)]);
    let mut output = FakeOutput::default();
    output.fail_trailer = true;

    let err = convert(&mut engine, &mut input, &mut output).unwrap_err();

    assert!(matches!(err, ConvertError::Trailer(_)));
    assert!(output.events.contains(&OutputEvent::IoClosed));
}

#[test]
fn test_decode_submit_failure_aborts_the_session() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    engine.fail_decode_send = true;
    let mut input = FakeInput::new(
        vec![video_stream(0)],
        vec![packet(0, 0), packet(0, 512)],
    );
    let mut output = FakeOutput::default();

    let err = convert(&mut engine, &mut input, &mut output).unwrap_err();

    assert!(matches!(err, ConvertError::SendDecode(_)));
    assert!(output.written().is_empty());
    assert!(!output.events.contains(&OutputEvent::Trailer));
    assert!(output.events.contains(&OutputEvent::IoClosed));
    assert_eq!(ledger.live(), 0);
}

#[test]
fn test_encode_receive_failure_aborts_the_session() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    engine.fail_encode_receive = true;
    let mut input = FakeInput::new(vec![video_stream(0)], vec![packet(0, 0)]);
    let mut output = FakeOutput::default();

    let err = convert(&mut engine, &mut input, &mut output).unwrap_err();

    assert!(matches!(err, ConvertError::ReceiveEncode(_)));
    assert!(output.events.contains(&OutputEvent::IoClosed));
    assert_eq!(ledger.live(), 0);
}

#[test]
fn test_encode_submit_failure_aborts_the_session() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    engine.fail_encode_send = true;
    let mut input = FakeInput::new(vec![video_stream(0)], vec![packet(0, 0)]);
    let mut output = FakeOutput::default();

    let err = convert(&mut engine, &mut input, &mut output).unwrap_err();

    assert!(matches!(err, ConvertError::SendEncode(_)));
    assert_eq!(ledger.live(), 0);
}
