use recast_av::rational::Rational;

use super::{map_streams, StreamRoute};
use crate::error::ConvertError;
use crate::fake::{
    audio_stream, subtitle_stream, video_stream, FakeEngine, FakeOutput, Ledger,
    CONTAINER_TIME_BASE,
};

#[test]
fn test_keeps_audio_and_video_drops_the_rest() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    let mut output = FakeOutput::default();
    let streams = vec![
        video_stream(0),
        subtitle_stream(1),
        audio_stream(2),
        video_stream(3),
    ];

    let routes = map_streams(&mut engine, &streams, &mut output).unwrap();

    assert_eq!(routes.len(), 4);
    assert!(matches!(&routes[0], StreamRoute::Transcode(b, _) if b.output_index == 0));
    assert!(matches!(&routes[1], StreamRoute::Dropped));
    assert!(matches!(&routes[2], StreamRoute::Passthrough(b) if b.output_index == 1));
    assert!(matches!(&routes[3], StreamRoute::Transcode(b, _) if b.output_index == 2));
    assert_eq!(output.streams.len(), 3);
}

#[test]
fn test_video_output_stream_describes_the_encoder() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    let mut output = FakeOutput::default();
    let streams = vec![video_stream(0)];

    map_streams(&mut engine, &streams, &mut output).unwrap();

    let (parameters, time_base) = &output.streams[0];
    assert_eq!(parameters.codec, crate::TARGET_VIDEO_ENCODER);
    assert_eq!(parameters.width, 1280);
    assert_eq!(parameters.height, 720);
    assert_eq!(parameters.pixel_format.as_deref(), Some("yuv420p"));
    assert_eq!(parameters.sample_aspect_ratio, Rational::new(1, 1));
    assert_eq!(parameters.bit_rate, 2_000_000);
    // inverse of the 30/1 frame rate estimate
    assert_eq!(*time_base, Rational::new(1, 30));
}

#[test]
fn test_audio_parameters_copied_verbatim() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    let mut output = FakeOutput::default();
    let streams = vec![audio_stream(0)];

    map_streams(&mut engine, &streams, &mut output).unwrap();

    let (parameters, time_base) = &output.streams[0];
    assert_eq!(*parameters, streams[0].parameters);
    assert_eq!(*time_base, CONTAINER_TIME_BASE);
}

#[test]
fn test_encoder_open_failure_rolls_back_every_pair() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    engine.fail_encoder_open_at = Some(2);
    let mut output = FakeOutput::default();
    let streams = vec![
        video_stream(0),
        video_stream(1),
        video_stream(2),
        video_stream(3),
        video_stream(4),
    ];

    let err = map_streams(&mut engine, &streams, &mut output).unwrap_err();

    assert!(matches!(err, ConvertError::Setup(_)));
    assert!(err.to_string().contains("failed to open encode context"));
    // two complete pairs plus the third stream's decoder
    assert_eq!(ledger.opened(), 5);
    assert_eq!(ledger.released(), 5);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn test_decoder_open_failure_rolls_back_every_pair() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    engine.fail_decoder_open_at = Some(1);
    let mut output = FakeOutput::default();
    let streams = vec![video_stream(0), video_stream(1)];

    let err = map_streams(&mut engine, &streams, &mut output).unwrap_err();

    assert!(err.to_string().contains("failed to open decode context"));
    assert_eq!(ledger.opened(), 2);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn test_output_stream_failure_rolls_back_every_pair() {
    let ledger = Ledger::new();
    let mut engine = FakeEngine::new(&ledger);
    let mut output = FakeOutput::default();
    output.fail_add_stream_at = Some(1);
    let streams = vec![video_stream(0), audio_stream(1)];

    let err = map_streams(&mut engine, &streams, &mut output).unwrap_err();

    assert!(err.to_string().contains("failed to create output stream"));
    assert_eq!(ledger.opened(), 2);
    assert_eq!(ledger.live(), 0);
}
