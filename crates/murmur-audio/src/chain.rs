use murmur_config::EffectsConfig;

use crate::{effects::Compressor, segment::AudioSegment};

/// One step of the post-processing chain
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Compress(Compressor),
    /// Bring the peak to 0 dBFS
    NormalizePeak,
    Gain { db: f64 },
    LowPass { cutoff_hz: f64 },
    HighPass { cutoff_hz: f64 },
    /// Bring the peak to `headroom_db` below full scale
    Normalize { headroom_db: f64 },
}

impl Effect {
    pub fn apply(&self, segment: AudioSegment) -> AudioSegment {
        match *self {
            Self::Compress(ref compressor) => segment.compress_dynamic_range(compressor),
            Self::NormalizePeak => segment.normalize_peak(),
            Self::Gain { db } => segment.apply_gain(db),
            Self::LowPass { cutoff_hz } => segment.low_pass_filter(cutoff_hz),
            Self::HighPass { cutoff_hz } => segment.high_pass_filter(cutoff_hz),
            Self::Normalize { headroom_db } => segment.normalize(headroom_db),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Compress(_) => "compress",
            Self::NormalizePeak => "normalize_peak",
            Self::Gain { .. } => "gain",
            Self::LowPass { .. } => "low_pass",
            Self::HighPass { .. } => "high_pass",
            Self::Normalize { .. } => "normalize",
        }
    }
}

/// The fixed speech clean-up chain
///
/// Compression tames peaks, the level is pushed to full scale and backed
/// off slightly, a low-pass softens sibilance, a high-pass removes rumble
/// and a final normalization leaves headroom for the encoder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectChain {
    effects: Vec<Effect>,
}

impl EffectChain {
    pub fn from_config(config: &EffectsConfig) -> Self {
        if !config.enabled {
            return Self::default();
        }

        let compressor = &config.compressor;

        Self {
            effects: vec![
                Effect::Compress(Compressor {
                    threshold_db: compressor.threshold_db,
                    ratio: compressor.ratio,
                    attack_ms: compressor.attack_ms,
                    release_ms: compressor.release_ms,
                }),
                Effect::NormalizePeak,
                Effect::Gain {
                    db: -config.peak_headroom_db,
                },
                Effect::LowPass {
                    cutoff_hz: config.low_pass_hz,
                },
                Effect::HighPass {
                    cutoff_hz: config.high_pass_hz,
                },
                Effect::Normalize {
                    headroom_db: config.final_headroom_db,
                },
            ],
        }
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Run every effect in order
    pub fn apply(&self, segment: AudioSegment) -> AudioSegment {
        self.effects.iter().fold(segment, |segment, effect| {
            let processed = effect.apply(segment);
            tracing::trace!(effect = effect.name(), max_dbfs = processed.max_dbfs(), "effect applied");
            processed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::tests::tone;

    #[test]
    fn default_chain_runs_in_fixed_order() {
        let chain = EffectChain::from_config(&EffectsConfig::default());
        let names: Vec<_> = chain.effects().iter().map(Effect::name).collect();

        assert_eq!(
            names,
            ["compress", "normalize_peak", "gain", "low_pass", "high_pass", "normalize"]
        );
        assert_eq!(chain.effects()[2], Effect::Gain { db: -0.5 });
        assert_eq!(chain.effects()[3], Effect::LowPass { cutoff_hz: 8000.0 });
        assert_eq!(chain.effects()[4], Effect::HighPass { cutoff_hz: 100.0 });
        assert_eq!(chain.effects()[5], Effect::Normalize { headroom_db: 1.0 });
    }

    #[test]
    fn disabled_chain_is_a_no_op() {
        let config = EffectsConfig {
            enabled: false,
            ..EffectsConfig::default()
        };
        let chain = EffectChain::from_config(&config);
        let input = tone(440.0, 0.3, 24_000, 2400);

        assert!(chain.is_empty());
        assert_eq!(chain.apply(input.clone()), input);
    }

    #[test]
    fn processed_speech_peaks_below_full_scale() {
        let chain = EffectChain::from_config(&EffectsConfig::default());
        let output = chain.apply(tone(440.0, 0.8, 24_000, 24_000));

        assert_eq!(output.frame_count(), 24_000);
        assert!(output.max_dbfs() <= 0.0);
        assert!((output.max_dbfs() + 1.0).abs() < 0.05);
    }
}
