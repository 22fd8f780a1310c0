//! Mapping between the engine-seam value types and FFmpeg's native ones.

use std::ffi::{CStr, CString};

use bytes::Bytes;

use crate::error::EngineError;
use crate::frame::{Frame, Plane};
use crate::packet::Packet;
use crate::rational::Rational;
use crate::stream::{CodecParameters, MediaKind, StreamInfo};

pub(super) fn engine_err(err: ffmpeg_next::Error) -> EngineError {
    EngineError::new(err.to_string())
}

pub(super) fn rational_from_native(value: ffmpeg_next::Rational) -> Rational {
    if value.denominator() == 0 {
        return Rational::zero();
    }
    Rational::new(value.numerator() as i64, value.denominator() as i64)
}

pub(super) fn rational_to_native(value: Rational) -> ffmpeg_next::Rational {
    ffmpeg_next::Rational::new(value.num as i32, value.den as i32)
}

pub(super) fn media_kind_from_native(medium: ffmpeg_next::media::Type) -> MediaKind {
    match medium {
        ffmpeg_next::media::Type::Audio => MediaKind::Audio,
        ffmpeg_next::media::Type::Video => MediaKind::Video,
        _ => MediaKind::Other,
    }
}

pub(super) fn media_kind_to_native(kind: MediaKind) -> ffmpeg_next::media::Type {
    match kind {
        MediaKind::Audio => ffmpeg_next::media::Type::Audio,
        MediaKind::Video => ffmpeg_next::media::Type::Video,
        MediaKind::Other => ffmpeg_next::media::Type::Data,
    }
}

pub(super) fn codec_name(id: ffmpeg_next::ffi::AVCodecID) -> String {
    unsafe {
        let name = ffmpeg_next::ffi::avcodec_get_name(id);
        CStr::from_ptr(name).to_string_lossy().into_owned()
    }
}

pub(super) fn codec_id_from_name(name: &str) -> ffmpeg_next::ffi::AVCodecID {
    let Ok(cname) = CString::new(name) else {
        return ffmpeg_next::ffi::AVCodecID::AV_CODEC_ID_NONE;
    };
    unsafe {
        let descriptor = ffmpeg_next::ffi::avcodec_descriptor_get_by_name(cname.as_ptr());
        if descriptor.is_null() {
            ffmpeg_next::ffi::AVCodecID::AV_CODEC_ID_NONE
        } else {
            (*descriptor).id
        }
    }
}

pub(super) fn pixel_format_name(pixel: ffmpeg_next::format::Pixel) -> Option<String> {
    if pixel == ffmpeg_next::format::Pixel::None {
        return None;
    }
    pixel.descriptor().map(|d| d.name().to_string())
}

pub(super) fn pixel_format_from_name(name: &str) -> Result<ffmpeg_next::format::Pixel, EngineError> {
    let cname = CString::new(name)
        .map_err(|_| EngineError::new(format!("invalid pixel format name: {:?}", name)))?;
    let native = unsafe { ffmpeg_next::ffi::av_get_pix_fmt(cname.as_ptr()) };
    if native == ffmpeg_next::ffi::AVPixelFormat::AV_PIX_FMT_NONE {
        return Err(EngineError::new(format!("unknown pixel format: {}", name)));
    }
    Ok(ffmpeg_next::format::Pixel::from(native))
}

pub(super) fn stream_info(stream: &ffmpeg_next::format::stream::Stream) -> StreamInfo {
    StreamInfo {
        index: stream.index(),
        kind: media_kind_from_native(stream.parameters().medium()),
        parameters: parameters_from_native(&stream.parameters()),
        time_base: rational_from_native(stream.time_base()),
        frame_rate: rational_from_native(stream.avg_frame_rate()),
    }
}

pub(super) fn parameters_from_native(parameters: &ffmpeg_next::codec::Parameters) -> CodecParameters {
    unsafe {
        let ptr = parameters.as_ptr() as *const ffmpeg_next::ffi::AVCodecParameters;
        let extradata = if (*ptr).extradata.is_null() {
            Bytes::new()
        } else {
            Bytes::copy_from_slice(std::slice::from_raw_parts(
                (*ptr).extradata,
                (*ptr).extradata_size as usize,
            ))
        };
        CodecParameters {
            codec: codec_name((*ptr).codec_id),
            kind: media_kind_from_native(parameters.medium()),
            width: (*ptr).width.max(0) as u32,
            height: (*ptr).height.max(0) as u32,
            pixel_format: None,
            sample_aspect_ratio: rational_from_native((*ptr).sample_aspect_ratio.into()),
            bit_rate: (*ptr).bit_rate,
            sample_rate: (*ptr).sample_rate,
            channels: (*ptr).ch_layout.nb_channels,
            extradata,
        }
    }
}

pub(super) fn parameters_to_native(parameters: &CodecParameters) -> ffmpeg_next::codec::Parameters {
    let mut native = ffmpeg_next::codec::Parameters::new();
    unsafe {
        let ptr = native.as_mut_ptr();
        (*ptr).codec_type = media_kind_to_native(parameters.kind).into();
        (*ptr).codec_id = codec_id_from_name(&parameters.codec);
        (*ptr).width = parameters.width as i32;
        (*ptr).height = parameters.height as i32;
        (*ptr).sample_aspect_ratio = rational_to_native(parameters.sample_aspect_ratio).into();
        (*ptr).bit_rate = parameters.bit_rate;
        (*ptr).sample_rate = parameters.sample_rate;
        (*ptr).ch_layout.nb_channels = parameters.channels;
        if parameters.kind == MediaKind::Video {
            if let Some(ref name) = parameters.pixel_format {
                if let Ok(pixel) = pixel_format_from_name(name) {
                    let fmt: ffmpeg_next::ffi::AVPixelFormat = pixel.into();
                    (*ptr).format = fmt as i32;
                }
            }
        }
        if !parameters.extradata.is_empty() {
            let size = parameters.extradata.len();
            let padding = ffmpeg_next::ffi::AV_INPUT_BUFFER_PADDING_SIZE as usize;
            let buf = ffmpeg_next::ffi::av_mallocz(size + padding) as *mut u8;
            if !buf.is_null() {
                std::ptr::copy_nonoverlapping(parameters.extradata.as_ptr(), buf, size);
                (*ptr).extradata = buf;
                (*ptr).extradata_size = size as i32;
            }
        }
    }
    native
}

pub(super) fn packet_from_native(
    packet: &ffmpeg_next::codec::packet::Packet,
    stream_index: usize,
) -> Packet {
    Packet {
        stream_index,
        data: packet.data().map(Bytes::copy_from_slice).unwrap_or_default(),
        pts: packet.pts(),
        dts: packet.dts(),
        duration: packet.duration(),
        key: packet.is_key(),
    }
}

pub(super) fn packet_to_native(packet: &Packet) -> ffmpeg_next::codec::packet::Packet {
    let mut native = ffmpeg_next::codec::packet::Packet::copy(&packet.data);
    native.set_stream(packet.stream_index);
    native.set_pts(packet.pts);
    native.set_dts(packet.dts);
    native.set_duration(packet.duration);
    if packet.key {
        native.set_flags(ffmpeg_next::codec::packet::Flags::KEY);
    }
    native
}

pub(super) fn frame_from_native(frame: &ffmpeg_next::frame::Video) -> Frame {
    let mut planes = Vec::with_capacity(frame.planes());
    for index in 0..frame.planes() {
        planes.push(Plane {
            data: Bytes::copy_from_slice(frame.data(index)),
            stride: frame.stride(index),
        });
    }
    Frame {
        pts: frame.pts(),
        width: frame.width(),
        height: frame.height(),
        pixel_format: pixel_format_name(frame.format()),
        planes,
    }
}

pub(super) fn frame_to_native(frame: &Frame) -> Result<ffmpeg_next::frame::Video, EngineError> {
    let name = frame
        .pixel_format
        .as_deref()
        .ok_or_else(|| EngineError::new("frame has no pixel format"))?;
    let pixel = pixel_format_from_name(name)?;
    let mut native = ffmpeg_next::frame::Video::new(pixel, frame.width, frame.height);
    for (index, plane) in frame.planes.iter().enumerate() {
        if plane.stride == 0 {
            continue;
        }
        let dst_stride = native.stride(index);
        let rows = plane.data.len() / plane.stride;
        let row_len = plane.stride.min(dst_stride);
        let dst = native.data_mut(index);
        for row in 0..rows {
            let src = &plane.data[row * plane.stride..row * plane.stride + row_len];
            dst[row * dst_stride..row * dst_stride + row_len].copy_from_slice(src);
        }
    }
    native.set_pts(frame.pts);
    Ok(native)
}
