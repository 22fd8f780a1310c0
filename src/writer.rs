//! Routing one coded packet into the output container.

use recast_av::engine::OutputSession;
use recast_av::packet::Packet;

use crate::error::ConvertError;
use crate::route::OutputBinding;

/// Retarget the packet at its output stream, rescale its timestamps into
/// the output time base and hand it to the interleaved writer. The packet
/// is consumed whether the write succeeds or fails.
pub fn write_rescaled(
    output: &mut impl OutputSession,
    binding: &OutputBinding,
    mut packet: Packet,
) -> Result<(), ConvertError> {
    packet.stream_index = binding.output_index;
    packet.rescale_ts(binding.input_time_base, binding.output_time_base);
    output.write_interleaved(packet).map_err(ConvertError::Write)
}
