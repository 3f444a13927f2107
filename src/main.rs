use anyhow::{Context, Result};
use bodypix_decode::{Decoder, OutputTensors};
use std::{
    io::{self, Write},
    path::PathBuf,
};
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;

#[derive(structopt::StructOpt)]
struct Opt {
    /// JSON file holding the heatmaps, short_offsets, displacement_fwd and
    /// displacement_bwd tensors.
    #[structopt(required = true)]
    input: PathBuf,

    /// Apply the logistic function to the heatmaps before decoding.
    #[structopt(long)]
    sigmoid: bool,

    /// Pretty-print the decoded poses.
    #[structopt(short, long)]
    pretty: bool,

    #[structopt(short, long, default_value = "info", env = "RUST_LOG")]
    log_level: tracing_subscriber::filter::EnvFilter,

    #[structopt(flatten)]
    decoder: Decoder,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let input = opt.input;

    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .with(opt.log_level),
    )?;

    let mut outputs = OutputTensors::read_json(&input)
        .with_context(|| format!("failed reading tensors from {:?}", input))?;
    if opt.sigmoid {
        outputs.activate_heatmaps();
    }

    let (height, width, num_keypoints) = outputs.heatmaps.dim();
    info!(
        message = "loaded output tensors",
        height, width, num_keypoints
    );

    let poses = opt
        .decoder
        .decode_multiple_poses(&outputs.view())
        .context("failed decoding poses")?;
    info!(message = "decoded poses", count = poses.len());

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    if opt.pretty {
        serde_json::to_writer_pretty(&mut stdout, &poses)
    } else {
        serde_json::to_writer(&mut stdout, &poses)
    }
    .context("failed writing poses")?;
    writeln!(stdout).context("failed writing poses")?;

    Ok(())
}
