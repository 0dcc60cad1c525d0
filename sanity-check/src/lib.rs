use atrous::swt::max_level;
use clap::ValueEnum;
use hound::{SampleFormat, WavReader};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Which bands the CLI writes out.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bands {
    /// Only the detail band at the requested depth.
    Target,
    /// Detail bands of every depth up to the requested one.
    All,
}

/// Read a WAV file as mono `f32` samples in `[-1, 1]` plus its sample rate.
///
/// Multi-channel files are averaged frame by frame.
pub fn read_audio(path: &Path) -> Result<(Vec<f32>, u32), Box<dyn Error>> {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
    if !is_wav {
        return Err(Box::new(io::Error::new(
            io::ErrorKind::InvalidInput,
            "only WAV input is supported",
        )));
    }
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };
    let channels = usize::from(spec.channels.max(1));
    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };
    Ok((samples, spec.sample_rate))
}

/// Reject a depth the frame is too short for, before decomposing.
pub fn check_depth(frame_len: usize, depth: usize) -> Result<(), Box<dyn Error>> {
    let max = max_level(frame_len);
    if depth == 0 || depth > max {
        return Err(format!(
            "depth {} invalid for a {}-sample frame (valid: 1..={})",
            depth, frame_len, max
        )
        .into());
    }
    Ok(())
}

/// Copy `len` samples starting at `offset`, zero-padding past the end.
pub fn take_frame(samples: &[f32], offset: usize, len: usize) -> Vec<f32> {
    let mut frame = vec![0.0f32; len];
    if let Some(src) = samples.get(offset..) {
        let n = src.len().min(len);
        frame[..n].copy_from_slice(&src[..n]);
    }
    frame
}

/// Write bands as CSV: one row per sample, one column per band.
pub fn write_csv(path: &Path, bands: &[Vec<f32>], first_depth: usize) -> Result<(), Box<dyn Error>> {
    let mut out = BufWriter::new(File::create(path)?);
    let header: Vec<String> = (0..bands.len())
        .map(|i| format!("d{}", first_depth + i))
        .collect();
    writeln!(out, "index,{}", header.join(","))?;
    let rows = bands.first().map_or(0, Vec::len);
    for k in 0..rows {
        write!(out, "{}", k)?;
        for band in bands {
            write!(out, ",{}", band[k])?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Render each band as a polyline in its own horizontal lane.
pub fn save_svg(path: &Path, bands: &[Vec<f32>]) -> Result<(), Box<dyn Error>> {
    use svg::node::element::Polyline;
    use svg::Document;

    const LANE_HEIGHT: f32 = 100.0;
    let width = bands.first().map_or(0, Vec::len);
    let height = LANE_HEIGHT * bands.len() as f32;
    let mut document = Document::new().set("viewBox", (0.0, 0.0, width as f32, height));
    for (lane, band) in bands.iter().enumerate() {
        let peak = band.iter().fold(0.0f32, |m, &v| m.max(v.abs())).max(f32::EPSILON);
        let centre = LANE_HEIGHT * (lane as f32 + 0.5);
        let points: Vec<String> = band
            .iter()
            .enumerate()
            .map(|(x, &v)| format!("{},{:.3}", x, centre - v / peak * LANE_HEIGHT * 0.45))
            .collect();
        let line = Polyline::new()
            .set("points", points.join(" "))
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", 0.5);
        document = document.add(line);
    }
    svg::save(path, &document)?;
    Ok(())
}
