use bytes::Bytes;

/// One plane of decoded picture data.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub data: Bytes,
    pub stride: usize,
}

/// A unit of decoded video.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub pts: Option<i64>,
    pub width: u32,
    pub height: u32,
    pub pixel_format: Option<String>,
    pub planes: Vec<Plane>,
}
