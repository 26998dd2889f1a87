use std::f64::consts::PI;

use crate::segment::AudioSegment;

/// Convert decibels to a linear amplitude ratio
pub fn db_to_float(db: f64) -> f64 {
    10_f64.powf(db / 20.0)
}

/// Convert a linear amplitude ratio to decibels
pub fn ratio_to_db(ratio: f64) -> f64 {
    20.0 * ratio.log10()
}

/// Dynamic range compressor parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compressor {
    /// Level above which gain reduction starts, in dBFS
    pub threshold_db: f64,
    pub ratio: f64,
    pub attack_ms: f64,
    pub release_ms: f64,
}

#[allow(clippy::cast_possible_truncation)]
fn scale(sample: i32, factor: f64, (min, max): (i32, i32)) -> i32 {
    (f64::from(sample) * factor).clamp(f64::from(min), f64::from(max)).floor() as i32
}

fn squared(sample: i32) -> u128 {
    u128::from(sample.unsigned_abs()).pow(2)
}

impl AudioSegment {
    fn frames_for_ms(&self, ms: f64) -> f64 {
        f64::from(self.frame_rate()) * ms / 1000.0
    }

    /// Change the level by `db`, clamping at the sample range and rounding down
    #[must_use]
    pub fn apply_gain(mut self, db: f64) -> Self {
        let factor = db_to_float(db);
        let bounds = self.sample_bounds();

        for sample in self.samples_mut() {
            *sample = scale(*sample, factor, bounds);
        }

        self
    }

    /// Raise or lower the level so the peak sits at 0 dBFS
    ///
    /// Silence is returned unchanged.
    #[must_use]
    pub fn normalize_peak(self) -> Self {
        if self.peak() == 0 {
            return self;
        }

        let gain = -self.max_dbfs();
        self.apply_gain(gain)
    }

    /// Scale so the peak sits `headroom_db` below full scale
    ///
    /// Silence is returned unchanged.
    #[must_use]
    pub fn normalize(self, headroom_db: f64) -> Self {
        let peak = self.peak();
        if peak == 0 {
            return self;
        }

        let target = self.max_possible_amplitude() * db_to_float(-headroom_db);
        let gain = ratio_to_db(target / f64::from(peak));
        self.apply_gain(gain)
    }

    /// Feed-forward compressor driven by a trailing RMS window
    ///
    /// The level detector looks at the `attack` worth of frames that precede
    /// the current one. Gain reduction ramps toward `(1 - 1/ratio)` of the
    /// overshoot over `attack` and decays over `release`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn compress_dynamic_range(mut self, compressor: &Compressor) -> Self {
        let channels = usize::from(self.channels());
        let frame_count = self.frame_count();
        let bounds = self.sample_bounds();

        let threshold = self.max_possible_amplitude() * db_to_float(compressor.threshold_db);
        let attack_frames = self.frames_for_ms(compressor.attack_ms);
        let release_frames = self.frames_for_ms(compressor.release_ms);
        let look_frames = attack_frames as usize;

        let source = std::mem::take(self.samples_mut());
        let mut output = Vec::with_capacity(source.len());

        let mut window_start = 0;
        let mut window_sum: u128 = 0;
        let mut attenuation = 0.0_f64;

        for frame in 0..frame_count {
            let window_samples = (frame - window_start) * channels;
            let rms = if window_samples == 0 {
                0.0
            } else {
                // RMS in whole sample units
                (window_sum as f64 / window_samples as f64).sqrt().trunc()
            };

            let over_db = if rms <= 0.0 {
                0.0
            } else {
                ratio_to_db(rms / threshold).max(0.0)
            };
            let max_attenuation = (1.0 - 1.0 / compressor.ratio) * over_db;

            if rms > threshold && attenuation <= max_attenuation {
                attenuation = (attenuation + max_attenuation / attack_frames).min(max_attenuation);
            } else {
                attenuation = (attenuation - max_attenuation / release_frames).max(0.0);
            }

            let current = &source[frame * channels..(frame + 1) * channels];
            if attenuation > 0.0 {
                let factor = db_to_float(-attenuation);
                output.extend(current.iter().map(|&s| scale(s, factor, bounds)));
            } else {
                output.extend_from_slice(current);
            }

            window_sum += current.iter().map(|&s| squared(s)).sum::<u128>();
            if frame + 1 - window_start > look_frames {
                let leaving = &source[window_start * channels..(window_start + 1) * channels];
                window_sum -= leaving.iter().map(|&s| squared(s)).sum::<u128>();
                window_start += 1;
            }
        }

        *self.samples_mut() = output;
        self
    }

    /// Single-pole RC low-pass filter
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn low_pass_filter(mut self, cutoff_hz: f64) -> Self {
        let rc = 1.0 / (cutoff_hz * 2.0 * PI);
        let dt = 1.0 / f64::from(self.frame_rate());
        let alpha = dt / (rc + dt);

        let channels = usize::from(self.channels());
        let (min, max) = self.sample_bounds();
        let samples = self.samples_mut();

        let mut last: Vec<f64> = samples.iter().take(channels).map(|&s| f64::from(s)).collect();

        for (offset, sample) in samples.iter_mut().enumerate().skip(channels) {
            let channel = offset % channels;
            last[channel] += alpha * (f64::from(*sample) - last[channel]);
            *sample = last[channel].clamp(f64::from(min), f64::from(max)) as i32;
        }

        self
    }

    /// Single-pole RC high-pass filter
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn high_pass_filter(mut self, cutoff_hz: f64) -> Self {
        let rc = 1.0 / (cutoff_hz * 2.0 * PI);
        let dt = 1.0 / f64::from(self.frame_rate());
        let alpha = rc / (rc + dt);

        let channels = usize::from(self.channels());
        let (min, max) = self.sample_bounds();
        let samples = self.samples_mut();

        let mut last: Vec<f64> = samples.iter().take(channels).map(|&s| f64::from(s)).collect();
        let mut previous: Vec<i32> = samples.iter().take(channels).copied().collect();

        for (offset, sample) in samples.iter_mut().enumerate().skip(channels) {
            let channel = offset % channels;
            let original = *sample;
            last[channel] = alpha * (last[channel] + f64::from(original) - f64::from(previous[channel]));
            previous[channel] = original;
            *sample = last[channel].clamp(f64::from(min), f64::from(max)) as i32;
        }

        self
    }
}
