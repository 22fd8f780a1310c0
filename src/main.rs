use anyhow::Context as _;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    recast_av::init().map_err(|e| anyhow::anyhow!("{}", e))?;

    let mut args = std::env::args().skip(1);
    let input_path = args.next().context("usage: recast <input> <output>")?;
    let output_path = args.next().context("usage: recast <input> <output>")?;

    let (mut input, mut engine) = recast_av::ffmpeg::open_input(&input_path)
        .map_err(|e| anyhow::anyhow!("failed to open input file: {}", e))?;
    let mut output = recast_av::ffmpeg::create_output(&output_path, recast::TARGET_CONTAINER)
        .map_err(|e| anyhow::anyhow!("failed to create output context: {}", e))?;

    if let Err(err) = recast::convert(&mut engine, &mut input, &mut output) {
        log::error!("{}", err);
        std::process::exit(1);
    }

    Ok(())
}
