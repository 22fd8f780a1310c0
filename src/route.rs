//! Stream routing: one route per input stream, with dense output indices
//! over the kept streams.

use recast_av::engine::{EncodeContext, MediaEngine, OutputSession};
use recast_av::error::EngineError;
use recast_av::rational::Rational;
use recast_av::stream::{MediaKind, StreamInfo};

use crate::context::{self, TranscodePair};
use crate::error::ConvertError;

/// Where packets from one input stream go.
#[derive(Debug)]
pub enum StreamRoute<D, E> {
    /// Unsupported kind; packets are discarded.
    Dropped,
    /// Copied as-is, timestamps rescaled.
    Passthrough(OutputBinding),
    /// Decoded and re-encoded through the pair.
    Transcode(OutputBinding, TranscodePair<D, E>),
}

/// Routing-table entry for one kept stream.
#[derive(Debug, Clone, Copy)]
pub struct OutputBinding {
    pub output_index: usize,
    pub input_time_base: Rational,
    pub output_time_base: Rational,
}

pub type RouteTable<E> =
    Vec<StreamRoute<<E as MediaEngine>::Decode, <E as MediaEngine>::Encode>>;

/// Build the route table and create the output streams, in input order.
/// Any failure releases every transcode pair created so far, across all
/// streams.
pub fn map_streams<E: MediaEngine>(
    engine: &mut E,
    streams: &[StreamInfo],
    output: &mut impl OutputSession,
) -> Result<RouteTable<E>, ConvertError> {
    let mut routes: RouteTable<E> = Vec::with_capacity(streams.len());
    let mut kept = 0usize;

    for stream in streams {
        let route = match build_route(engine, stream, output) {
            Ok(route) => route,
            Err(err) => {
                context::release_all(routes);
                return Err(ConvertError::Setup(err));
            }
        };
        match &route {
            StreamRoute::Dropped => {
                log::debug!("stream {}: dropped ({})", stream.index, stream.parameters.codec);
            }
            StreamRoute::Passthrough(binding) => {
                log::debug!(
                    "stream {}: copied to output stream {}",
                    stream.index,
                    binding.output_index
                );
                kept += 1;
            }
            StreamRoute::Transcode(binding, _) => {
                log::debug!(
                    "stream {}: transcoded to output stream {}",
                    stream.index,
                    binding.output_index
                );
                kept += 1;
            }
        }
        routes.push(route);
    }

    log::info!("mapped {} input streams, kept {}", streams.len(), kept);
    Ok(routes)
}

fn build_route<E: MediaEngine>(
    engine: &mut E,
    stream: &StreamInfo,
    output: &mut impl OutputSession,
) -> Result<StreamRoute<E::Decode, E::Encode>, EngineError> {
    match stream.kind {
        MediaKind::Other => Ok(StreamRoute::Dropped),
        MediaKind::Video => {
            let pair = context::open_transcode_pair(engine, stream)?;
            let parameters = pair.encoder.parameters();
            let time_base = pair.encoder.time_base();
            let created = output
                .add_stream(&parameters, Some(time_base))
                .map_err(|e| e.context("failed to create output stream"))?;
            Ok(StreamRoute::Transcode(
                OutputBinding {
                    output_index: created.index,
                    input_time_base: stream.time_base,
                    output_time_base: created.time_base,
                },
                pair,
            ))
        }
        MediaKind::Audio => {
            let created = output
                .add_stream(&stream.parameters, None)
                .map_err(|e| e.context("failed to create output stream"))?;
            Ok(StreamRoute::Passthrough(OutputBinding {
                output_index: created.index,
                input_time_base: stream.time_base,
                output_time_base: created.time_base,
            }))
        }
    }
}

#[cfg(test)]
#[path = "route_test.rs"]
mod route_test;
