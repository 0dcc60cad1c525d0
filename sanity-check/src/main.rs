use atrous::swt::{decompose_levels, decompose_vec};
use clap::Parser;
use sanity_check::{check_depth, read_audio, save_svg, take_frame, write_csv, Bands};
use std::error::Error;
use std::path::PathBuf;

/// Decompose one frame of a WAV file and dump its wavelet detail bands.
#[derive(Parser)]
struct Args {
    /// Path to input WAV file
    input: PathBuf,

    /// Path to output CSV file
    output: PathBuf,

    /// Target octave of the detail band
    #[arg(long, default_value_t = 3)]
    depth: usize,

    /// Frame length in samples (power of two)
    #[arg(long, default_value_t = 4096)]
    frame_len: usize,

    /// First sample of the frame
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Bands to write
    #[arg(long, value_enum, default_value_t = Bands::Target)]
    bands: Bands,

    /// Optional path to save an SVG plot of the bands
    #[arg(long)]
    svg_output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (samples, sample_rate) = read_audio(&args.input)?;
    let frame = take_frame(&samples, args.offset, args.frame_len);
    check_depth(frame.len(), args.depth)?;

    let (bands, first_depth) = match args.bands {
        Bands::Target => (vec![decompose_vec(&frame, args.depth)?], args.depth),
        Bands::All => (decompose_levels(&frame, args.depth)?, 1),
    };

    write_csv(&args.output, &bands, first_depth)?;
    if let Some(path) = &args.svg_output {
        save_svg(path, &bands)?;
    }

    let nyquist = sample_rate as f32 / 2.0;
    for (i, band) in bands.iter().enumerate() {
        let depth = first_depth + i;
        let hi = nyquist / (1u32 << (depth - 1)) as f32;
        let rms = (band.iter().map(|v| v * v).sum::<f32>() / band.len() as f32).sqrt();
        println!(
            "d{}: ~{:.0}-{:.0} Hz, rms {:.6}",
            depth,
            hi / 2.0,
            hi,
            rms
        );
    }
    Ok(())
}
