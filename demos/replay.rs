//! Offline replay: feed a 16-bit mono (or stereo, left channel only) WAV
//! fixture through a [`knockbell::Detector`] and print every detection and
//! diagnostic via [`knockbell::TracingSink`].

use std::error::Error;
use std::path::PathBuf;

use hound::{SampleFormat, WavReader};
use knockbell::{DetectorConfig, ScanFlags, TracingSink};

const DEFAULT_BATCH_SIZE: usize = 1600;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("demos/fixtures/sample.wav"));
    let high_sensitivity = args.any(|a| a == "--high-sensitivity");

    let reader = WavReader::open(&input)
        .map_err(|e| format!("failed to open '{}': {e}", input.display()))?;
    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err("replay only supports 16-bit integer WAV fixtures".into());
    }

    let mut config = DetectorConfig {
        sample_rate_hz: spec.sample_rate as f32,
        ..DetectorConfig::default()
    };
    if high_sensitivity {
        config.sensitivity = knockbell::Sensitivity::High;
    }
    let mut detector = knockbell::Detector::with_config(config)?;
    let mut sink = TracingSink;

    let channels = spec.channels as usize;
    let mut samples = reader.into_samples::<i16>();
    let mut batch = Vec::with_capacity(DEFAULT_BATCH_SIZE);
    let mut total_frames = 0u64;

    loop {
        batch.clear();
        for _ in 0..DEFAULT_BATCH_SIZE {
            match samples.next() {
                Some(sample) => {
                    let left = sample?;
                    batch.push(left);
                    for _ in 1..channels {
                        samples.next().transpose()?;
                    }
                    total_frames += 1;
                }
                None => break,
            }
        }
        if batch.is_empty() {
            break;
        }
        let flags = ScanFlags::DISP_THRESHOLDS | ScanFlags::DISP_EVENTS | ScanFlags::DISP_PEAKS;
        detector.scan(&batch, None, flags, &mut sink);
    }

    println!("replayed {total_frames} frames from '{}'", input.display());
    Ok(())
}
