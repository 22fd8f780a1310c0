use bytes::Bytes;

use crate::engine::{Drain, EncodeContext, EncoderSpec};
use crate::error::EngineError;
use crate::frame::Frame;
use crate::packet::Packet;
use crate::rational::Rational;
use crate::stream::{CodecParameters, MediaKind};

use super::convert;

/// An opened FFmpeg video encoder.
pub struct FfmpegEncode {
    inner: ffmpeg_next::codec::encoder::Video,
    time_base: Rational,
}

impl FfmpegEncode {
    pub(super) fn open(spec: &EncoderSpec) -> Result<Self, EngineError> {
        let codec = ffmpeg_next::encoder::find_by_name(&spec.codec)
            .ok_or_else(|| EngineError::new(format!("codec not found: {}", spec.codec)))?;
        let context = ffmpeg_next::codec::Context::new_with_codec(codec);
        let mut encoder = context.encoder().video().map_err(convert::engine_err)?;

        encoder.set_width(spec.width);
        encoder.set_height(spec.height);
        encoder.set_aspect_ratio(convert::rational_to_native(spec.sample_aspect_ratio));
        if let Some(ref name) = spec.pixel_format {
            encoder.set_format(convert::pixel_format_from_name(name)?);
        }
        encoder.set_bit_rate(spec.bit_rate.max(0) as usize);
        encoder.set_time_base(convert::rational_to_native(spec.time_base));

        let opened = encoder
            .open_with(ffmpeg_next::Dictionary::new())
            .map_err(convert::engine_err)?;

        // The codec may adjust the requested time base when it opens.
        let time_base: ffmpeg_next::Rational = unsafe { (*opened.as_ptr()).time_base.into() };
        log::info!(
            "encoder opened: {} {}x{}, time base {}",
            spec.codec,
            spec.width,
            spec.height,
            time_base
        );

        Ok(Self {
            inner: opened,
            time_base: convert::rational_from_native(time_base),
        })
    }
}

impl EncodeContext for FfmpegEncode {
    fn send_frame(&mut self, frame: &Frame) -> Result<(), EngineError> {
        let native = convert::frame_to_native(frame)?;
        self.inner.send_frame(&native).map_err(convert::engine_err)
    }

    fn receive_packet(&mut self) -> Result<Drain<Packet>, EngineError> {
        let mut packet = ffmpeg_next::codec::packet::Packet::empty();
        match self.inner.receive_packet(&mut packet) {
            Ok(()) => Ok(Drain::Ready(convert::packet_from_native(
                &packet,
                packet.stream(),
            ))),
            Err(ffmpeg_next::Error::Eof) => Ok(Drain::EndOfStream),
            Err(ffmpeg_next::Error::Other { errno })
                if errno == ffmpeg_next::util::error::EAGAIN =>
            {
                Ok(Drain::NeedsInput)
            }
            Err(err) => Err(convert::engine_err(err)),
        }
    }

    fn time_base(&self) -> Rational {
        self.time_base
    }

    fn parameters(&self) -> CodecParameters {
        unsafe {
            let ptr = self.inner.as_ptr();
            let extradata = if (*ptr).extradata.is_null() {
                Bytes::new()
            } else {
                Bytes::copy_from_slice(std::slice::from_raw_parts(
                    (*ptr).extradata,
                    (*ptr).extradata_size as usize,
                ))
            };
            CodecParameters {
                codec: convert::codec_name((*ptr).codec_id),
                kind: MediaKind::Video,
                width: self.inner.width(),
                height: self.inner.height(),
                pixel_format: convert::pixel_format_name(self.inner.format()),
                sample_aspect_ratio: convert::rational_from_native(
                    (*ptr).sample_aspect_ratio.into(),
                ),
                bit_rate: (*ptr).bit_rate,
                sample_rate: 0,
                channels: 0,
                extradata,
            }
        }
    }
}
