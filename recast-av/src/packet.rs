use bytes::Bytes;

use crate::rational::Rational;

/// A unit of coded data belonging to one stream.
#[derive(Debug, Clone, Default)]
pub struct Packet {
    pub stream_index: usize,
    pub data: Bytes,
    pub pts: Option<i64>,
    pub dts: Option<i64>,
    pub duration: i64,
    pub key: bool,
}

impl Packet {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_key(&self) -> bool {
        self.key
    }

    /// Rescale pts, dts and duration from one time base to another.
    pub fn rescale_ts(&mut self, from: Rational, to: Rational) {
        self.pts = self.pts.map(|v| from.rescale(v, to));
        self.dts = self.dts.map(|v| from.rescale(v, to));
        if self.duration != 0 {
            self.duration = from.rescale(self.duration, to);
        }
    }
}
