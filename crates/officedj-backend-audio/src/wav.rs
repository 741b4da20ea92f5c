//! Deterministic WAV export.
//!
//! Files are 16-bit mono PCM written with `hound`; nothing time-dependent
//! goes into the header, so the same samples always produce the same bytes.
//! The PCM hash covers the sample data only.

use std::io::Cursor;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::AudioResult;

/// WAV header for 16-bit mono at `sample_rate`.
pub fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Converts a float sample to 16-bit PCM, clamping to `[-1, 1]`.
#[inline]
pub fn to_pcm16(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f64).round() as i16
}

/// Little-endian 16-bit PCM bytes for a buffer.
pub fn pcm_bytes(samples: &[f64]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|s| to_pcm16(*s).to_le_bytes())
        .collect()
}

/// BLAKE3 hex digest of the 16-bit PCM data.
pub fn pcm_hash(samples: &[f64]) -> String {
    blake3::hash(&pcm_bytes(samples)).to_hex().to_string()
}

/// Encodes a buffer as a complete WAV file in memory.
pub fn encode_wav(samples: &[f64], sample_rate: u32) -> AudioResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, wav_spec(sample_rate))?;
        for sample in samples {
            writer.write_sample(to_pcm16(*sample))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Writes a buffer as a WAV file, replacing any existing file.
pub fn write_wav(path: &Path, samples: &[f64], sample_rate: u32) -> AudioResult<()> {
    let mut writer = WavWriter::create(path, wav_spec(sample_rate))?;
    for sample in samples {
        writer.write_sample(to_pcm16(*sample))?;
    }
    writer.finalize()?;
    Ok(())
}
