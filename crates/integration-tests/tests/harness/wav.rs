//! WAV fixtures

/// Mono 16-bit sine tone at 24 kHz
#[allow(clippy::cast_possible_truncation)]
pub fn tone(freq: f64, amplitude: f64, seconds: f64) -> Vec<u8> {
    const RATE: u32 = 24_000;

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut bytes = Vec::new();
    {
        let mut writer = hound::WavWriter::new(std::io::Cursor::new(&mut bytes), spec).unwrap();
        let frames = (seconds * f64::from(RATE)) as u32;
        for i in 0..frames {
            let t = f64::from(i) / f64::from(RATE);
            let sample = amplitude * f64::from(i16::MAX) * (2.0 * std::f64::consts::PI * freq * t).sin();
            writer.write_sample(sample as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    bytes
}

/// Largest absolute sample relative to full scale, in dBFS
pub fn peak_dbfs(bytes: &[u8]) -> f64 {
    let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
    let peak = reader
        .samples::<i16>()
        .map(|s| i32::from(s.unwrap()).unsigned_abs())
        .max()
        .unwrap_or(0);
    20.0 * (f64::from(peak) / 32768.0).log10()
}

/// Duration in seconds
pub fn duration_secs(bytes: &[u8]) -> f64 {
    let reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
    f64::from(reader.duration()) / f64::from(reader.spec().sample_rate)
}
