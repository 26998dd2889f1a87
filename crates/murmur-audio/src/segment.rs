use std::{
    io::{Cursor, Read},
    path::Path,
    time::Duration,
};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{AudioError, Result};

/// Integer PCM audio held in memory
///
/// Samples are interleaved by channel and stored widened to `i32`, while
/// `sample_width` remembers the width (in bytes) they were decoded from.
/// Every processing step clamps to the range of that width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSegment {
    samples: Vec<i32>,
    channels: u16,
    frame_rate: u32,
    sample_width: u16,
}

impl AudioSegment {
    /// Build a segment from interleaved samples
    pub fn new(samples: Vec<i32>, channels: u16, frame_rate: u32, sample_width: u16) -> Result<Self> {
        if channels == 0 {
            return Err(AudioError::UnsupportedFormat("audio has no channels".to_string()));
        }

        if frame_rate == 0 {
            return Err(AudioError::UnsupportedFormat("frame rate must be greater than 0".to_string()));
        }

        if !(1..=4).contains(&sample_width) {
            return Err(AudioError::UnsupportedFormat(format!(
                "sample width of {sample_width} bytes"
            )));
        }

        if samples.len() % usize::from(channels) != 0 {
            return Err(AudioError::UnsupportedFormat(format!(
                "{} samples do not divide into {channels} channels",
                samples.len()
            )));
        }

        Ok(Self {
            samples,
            channels,
            frame_rate,
            sample_width,
        })
    }

    /// Decode a WAV file from disk
    pub fn from_wav_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(WavReader::open(path)?)
    }

    /// Decode WAV data held in memory
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(WavReader::new(Cursor::new(bytes))?)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_reader<R: Read>(reader: WavReader<R>) -> Result<Self> {
        let spec = reader.spec();

        let (samples, sample_width) = match spec.sample_format {
            SampleFormat::Int => {
                let samples = reader.into_samples::<i32>().collect::<std::result::Result<Vec<_>, _>>()?;
                (samples, spec.bits_per_sample.div_ceil(8))
            }
            // Float input is brought down to 16-bit PCM
            SampleFormat::Float => {
                let samples = reader
                    .into_samples::<f32>()
                    .map(|s| s.map(|v| (f64::from(v) * 32768.0).clamp(-32768.0, 32767.0) as i32))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                (samples, 2)
            }
        };

        Self::new(samples, spec.channels, spec.sample_rate, sample_width)
    }

    /// Encode as a PCM WAV file at the segment's own sample width
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        let spec = WavSpec {
            channels: self.channels,
            sample_rate: self.frame_rate,
            bits_per_sample: self.bits(),
            sample_format: SampleFormat::Int,
        };

        let mut buffer = Vec::with_capacity(44 + self.samples.len() * usize::from(self.sample_width));

        {
            let mut writer = WavWriter::new(Cursor::new(&mut buffer), spec)?;
            for &sample in &self.samples {
                writer.write_sample(sample)?;
            }
            writer.finalize()?;
        }

        Ok(buffer)
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    pub const fn channels(&self) -> u16 {
        self.channels
    }

    pub const fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Bytes per sample
    pub const fn sample_width(&self) -> u16 {
        self.sample_width
    }

    /// Bits per sample
    pub const fn bits(&self) -> u16 {
        self.sample_width * 8
    }

    /// Number of frames (one sample per channel)
    pub fn frame_count(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frame_count() as f64 / f64::from(self.frame_rate))
    }

    /// Full-scale amplitude, `2^(bits-1)`
    pub fn max_possible_amplitude(&self) -> f64 {
        f64::from(1_u32 << (self.bits() - 1))
    }

    /// Smallest and largest representable sample
    pub fn sample_bounds(&self) -> (i32, i32) {
        let bits = u32::from(self.bits());
        let max = i32::try_from((1_i64 << (bits - 1)) - 1).unwrap_or(i32::MAX);
        let min = i32::try_from(-(1_i64 << (bits - 1))).unwrap_or(i32::MIN);
        (min, max)
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> u32 {
        self.samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0)
    }

    /// Peak level relative to full scale, `-inf` for silence
    pub fn max_dbfs(&self) -> f64 {
        crate::effects::ratio_to_db(f64::from(self.peak()) / self.max_possible_amplitude())
    }

    pub(crate) fn samples_mut(&mut self) -> &mut Vec<i32> {
        &mut self.samples
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Mono 16-bit sine tone
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn tone(frequency: f64, amplitude: f64, frame_rate: u32, frames: usize) -> AudioSegment {
        let samples = (0..frames)
            .map(|i| {
                let t = i as f64 / f64::from(frame_rate);
                (amplitude * 32767.0 * (2.0 * std::f64::consts::PI * frequency * t).sin()) as i32
            })
            .collect();

        AudioSegment::new(samples, 1, frame_rate, 2).unwrap()
    }

    #[test]
    fn rejects_ragged_channel_layout() {
        let err = AudioSegment::new(vec![1, 2, 3], 2, 24_000, 2).unwrap_err();
        assert!(err.to_string().contains("2 channels"));
    }

    #[test]
    fn rejects_unsupported_width() {
        assert!(AudioSegment::new(vec![], 1, 24_000, 5).is_err());
    }

    #[test]
    fn wav_bytes_decode_back_to_same_layout() {
        let segment = AudioSegment::new(vec![0, 1000, -1000, 32767, -32768, 5], 2, 22_050, 2).unwrap();
        let decoded = AudioSegment::from_wav_bytes(&segment.to_wav_bytes().unwrap()).unwrap();

        assert_eq!(decoded, segment);
        assert_eq!(decoded.frame_count(), 3);
    }

    #[test]
    fn decodes_file_written_by_hound() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voice.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 24_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for i in 0..2400_i16 {
            writer.write_sample(i).unwrap();
        }
        writer.finalize().unwrap();

        let segment = AudioSegment::from_wav_file(&path).unwrap();

        assert_eq!(segment.frame_rate(), 24_000);
        assert_eq!(segment.sample_width(), 2);
        assert!((segment.duration().as_secs_f64() - 0.1).abs() < 1e-6);
        assert_eq!(segment.peak(), 2399);
    }

    #[test]
    fn float_wav_is_converted_to_16_bit() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut buffer = Vec::new();
        {
            let mut writer = WavWriter::new(Cursor::new(&mut buffer), spec).unwrap();
            for value in [0.0_f32, 0.5, -1.0, 1.0] {
                writer.write_sample(value).unwrap();
            }
            writer.finalize().unwrap();
        }

        let segment = AudioSegment::from_wav_bytes(&buffer).unwrap();

        assert_eq!(segment.sample_width(), 2);
        assert_eq!(segment.samples(), &[0, 16384, -32768, 32767]);
    }

    #[test]
    fn garbage_is_a_wav_error() {
        let err = AudioSegment::from_wav_bytes(b"definitely not a wav file").unwrap_err();
        assert!(matches!(err, AudioError::Wav(_)));
    }

    #[test]
    fn levels_of_silence_and_full_scale() {
        let silence = AudioSegment::new(vec![0; 100], 1, 8000, 2).unwrap();
        assert_eq!(silence.peak(), 0);
        assert!(silence.max_dbfs().is_infinite() && silence.max_dbfs() < 0.0);

        let full = AudioSegment::new(vec![-32768, 0], 1, 8000, 2).unwrap();
        assert!(full.max_dbfs().abs() < 1e-9);
        assert_eq!(full.sample_bounds(), (-32768, 32767));
    }
}
