//! The output session: header, body, trailer, and a teardown that runs
//! exactly once on every exit path.

use recast_av::engine::{
    DecodeContext, EncodeContext, HeaderStatus, InputSession, MediaEngine, OutputSession,
};

use crate::context;
use crate::error::ConvertError;
use crate::pipeline;
use crate::route::{self, StreamRoute};
use crate::writer;

/// Convert an opened input into the output session.
///
/// On failure the returned error's Display text names the failing
/// operation and carries the engine's status text.
pub fn convert<E, I, O>(engine: &mut E, input: &mut I, output: &mut O) -> Result<(), ConvertError>
where
    E: MediaEngine,
    I: InputSession,
    O: OutputSession,
{
    let mut routes = route::map_streams(engine, input.streams(), output)?;

    if let Err(err) = output.open_io() {
        context::release_all(routes);
        return Err(ConvertError::Setup(err.context("failed to open output")));
    }

    let result = write_output(input, output, &mut routes);

    output.close_io();
    context::release_all(routes);

    if result.is_ok() {
        log::info!("conversion finished");
    }
    result
}

fn write_output<I, O, D, E>(
    input: &mut I,
    output: &mut O,
    routes: &mut [StreamRoute<D, E>],
) -> Result<(), ConvertError>
where
    I: InputSession,
    O: OutputSession,
    D: DecodeContext,
    E: EncodeContext,
{
    match output.write_header().map_err(ConvertError::Header)? {
        HeaderStatus::DeferredParameters => {
            log::debug!("stream parameters deferred to header write");
        }
        HeaderStatus::Written => {}
    }

    write_body(input, output, routes)?;

    output.write_trailer().map_err(ConvertError::Trailer)?;
    Ok(())
}

fn write_body<I, O, D, E>(
    input: &mut I,
    output: &mut O,
    routes: &mut [StreamRoute<D, E>],
) -> Result<(), ConvertError>
where
    I: InputSession,
    O: OutputSession,
    D: DecodeContext,
    E: EncodeContext,
{
    while let Some(packet) = input.read_packet() {
        let Some(route) = routes.get_mut(packet.stream_index) else {
            log::warn!("packet for unknown stream {}", packet.stream_index);
            continue;
        };
        match route {
            StreamRoute::Dropped => {}
            StreamRoute::Passthrough(binding) => {
                writer::write_rescaled(output, binding, packet)?;
            }
            StreamRoute::Transcode(binding, pair) => {
                pipeline::transcode_packet(pair, output, binding, packet)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
