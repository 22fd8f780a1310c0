use recast_av::rational::Rational;

use super::{open_transcode_pair, release_all};
use crate::fake::{video_stream, FakeEngine, FakeOutput, Ledger};
use crate::route::map_streams;

#[test]
fn test_encoder_derived_from_decoder() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    let stream = video_stream(0);

    let pair = open_transcode_pair(&mut engine, &stream).unwrap();

    assert_eq!(pair.encoder.spec.codec, crate::TARGET_VIDEO_ENCODER);
    assert_eq!(pair.encoder.spec.width, stream.parameters.width);
    assert_eq!(pair.encoder.spec.height, stream.parameters.height);
    assert_eq!(
        pair.encoder.spec.pixel_format,
        stream.parameters.pixel_format
    );
    assert_eq!(pair.encoder.spec.bit_rate, stream.parameters.bit_rate);
    assert_eq!(pair.encoder.spec.time_base, Rational::new(1, 30));
}

#[test]
fn test_unknown_frame_rate_falls_back() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    let mut stream = video_stream(0);
    stream.frame_rate = Rational::zero();

    let pair = open_transcode_pair(&mut engine, &stream).unwrap();

    assert_eq!(pair.encoder.spec.time_base, Rational::new(1, 25));
}

#[test]
fn test_decode_open_failure_names_the_operation() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    engine.fail_decoder_open_at = Some(0);

    let err = open_transcode_pair(&mut engine, &video_stream(0)).unwrap_err();

    assert_eq!(
        err.to_string(),
        "failed to open decode context: no decoder for stream"
    );
    assert_eq!(ledger.opened(), 0);
}

#[test]
fn test_release_all_releases_each_context_once() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    let mut output = FakeOutput::default();
    let streams = vec![video_stream(0), video_stream(1)];

    let routes = map_streams(&mut engine, &streams, &mut output).unwrap();
    assert_eq!(ledger.live(), 4);

    release_all(routes);

    assert_eq!(ledger.released(), 4);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn test_release_all_accepts_empty_table() {
    release_all::<crate::fake::FakeDecode, crate::fake::FakeEncode>(Vec::new());
}
