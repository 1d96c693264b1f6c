// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Synthetic ramped tones

use std::f64::consts::PI;

use super::{Stimulus, REFERENCE_PRESSURE};
use crate::error::{PeripheryError, Result};

fn check_duration(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PeripheryError::invalid(format!(
            "{} = {} must be finite and non-negative",
            name, value
        )));
    }
    Ok(())
}

impl Stimulus {
    /// Pure tone with raised-cosine onset/offset ramps after a silent delay
    ///
    /// # Arguments
    /// * `duration` - tone duration (s)
    /// * `simulation_duration` - analysis window (s), at least `delay + duration`
    /// * `sampling_rate` - Hz
    /// * `rise_fall_time` - ramp length applied at both ends of the tone (s)
    /// * `delay` - leading silence (s)
    /// * `frequency` - tone frequency (Hz)
    /// * `level_db` - level in dB SPL (peak pressure `sqrt(2) * 20 uPa * 10^(dB/20)`)
    ///
    /// `stimulus_duration` is `delay + duration`.
    ///
    /// # Errors
    /// `InvalidParameter` when the ramps exceed half the tone, the frequency
    /// is not below Nyquist, or any duration is malformed.
    pub fn ramped_sine_wave(
        duration: f64,
        simulation_duration: f64,
        sampling_rate: u32,
        rise_fall_time: f64,
        delay: f64,
        frequency: f64,
        level_db: f64,
    ) -> Result<Self> {
        if sampling_rate == 0 {
            return Err(PeripheryError::invalid("sampling rate must be positive"));
        }
        check_duration("duration", duration)?;
        check_duration("simulation_duration", simulation_duration)?;
        check_duration("rise_fall_time", rise_fall_time)?;
        check_duration("delay", delay)?;
        if duration <= 0.0 {
            return Err(PeripheryError::invalid("tone duration must be positive"));
        }
        if rise_fall_time > duration / 2.0 {
            return Err(PeripheryError::invalid(format!(
                "rise/fall time {} s exceeds half the tone duration {} s",
                rise_fall_time, duration
            )));
        }
        let fs = sampling_rate as f64;
        if !(frequency > 0.0 && frequency < fs / 2.0) {
            return Err(PeripheryError::invalid(format!(
                "frequency {} Hz must lie in (0, {}) Hz",
                frequency,
                fs / 2.0
            )));
        }
        if !level_db.is_finite() {
            return Err(PeripheryError::invalid("level must be finite"));
        }
        let stimulus_duration = delay + duration;
        if simulation_duration + 1e-12 < stimulus_duration {
            return Err(PeripheryError::invalid(format!(
                "simulation duration {} s is shorter than the stimulus ({} s)",
                simulation_duration, stimulus_duration
            )));
        }

        let n_total = (stimulus_duration * fs).round() as usize;
        let n_delay = ((delay * fs).round() as usize).min(n_total);
        let n_tone = ((duration * fs).round() as usize).min(n_total - n_delay);
        let n_ramp = ((rise_fall_time * fs).round() as usize).min(n_tone / 2);

        let amplitude = 2f64.sqrt() * REFERENCE_PRESSURE * 10f64.powf(level_db / 20.0);
        if !amplitude.is_finite() {
            return Err(PeripheryError::invalid(format!(
                "level {} dB SPL overflows the peak pressure",
                level_db
            )));
        }
        let mut data = vec![0.0; n_total];
        for i in 0..n_tone {
            let t = i as f64 / fs;
            let envelope = if i < n_ramp {
                0.5 * (1.0 - (PI * i as f64 / n_ramp as f64).cos())
            } else if i >= n_tone - n_ramp {
                0.5 * (1.0 - (PI * (n_tone - 1 - i) as f64 / n_ramp as f64).cos())
            } else {
                1.0
            };
            data[n_delay + i] = amplitude * envelope * (2.0 * PI * frequency * t).sin();
        }

        Ok(Stimulus::from_parts(
            data,
            sampling_rate,
            stimulus_duration,
            simulation_duration.max(stimulus_duration),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_tone() {
        let stim =
            Stimulus::ramped_sine_wave(0.25, 0.3, 100_000, 2.5e-3, 25e-3, 5e3, 60.0).unwrap();
        assert!((stim.stimulus_duration() - 0.275).abs() < 1e-12);
        assert_eq!(stim.sampling_rate(), 100_000);
        assert_eq!(stim.n_simulation_timesteps(), 27_500);
        assert!((stim.simulation_duration() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_leading_silence_and_ramp() {
        let stim = Stimulus::ramped_sine_wave(0.1, 0.2, 100_000, 5e-3, 10e-3, 1e3, 60.0).unwrap();
        let data = stim.data();
        assert!(data[..1_000].iter().all(|&v| v == 0.0));

        let peak = 2f64.sqrt() * 20e-6 * 1e3;
        let max = data.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        assert!((max - peak).abs() / peak < 1e-3);

        // Inside the onset ramp the envelope is still small
        let early = data[1_000..1_050].iter().fold(0.0f64, |m, v| m.max(v.abs()));
        assert!(early < 0.05 * peak);
    }

    #[test]
    fn test_invalid_requests() {
        // Ramps longer than half the tone
        assert!(matches!(
            Stimulus::ramped_sine_wave(0.01, 0.1, 100_000, 6e-3, 0.0, 1e3, 60.0),
            Err(PeripheryError::InvalidParameter(_))
        ));
        // Frequency at Nyquist
        assert!(Stimulus::ramped_sine_wave(0.1, 0.1, 100_000, 1e-3, 0.0, 50e3, 60.0).is_err());
        // Window shorter than the stimulus
        assert!(Stimulus::ramped_sine_wave(0.1, 0.05, 100_000, 1e-3, 0.0, 1e3, 60.0).is_err());
        assert!(Stimulus::ramped_sine_wave(0.1, 0.1, 0, 1e-3, 0.0, 1e3, 60.0).is_err());
        assert!(Stimulus::ramped_sine_wave(0.1, 0.1, 100_000, 1e-3, -1.0, 1e3, 60.0).is_err());
    }

    #[test]
    fn test_overflowing_level_rejected() {
        assert!(matches!(
            Stimulus::ramped_sine_wave(0.01, 0.02, 100_000, 1e-3, 0.0, 1e3, 7000.0),
            Err(PeripheryError::InvalidParameter(_))
        ));
        // Loud but representable levels still produce finite samples
        let stim = Stimulus::ramped_sine_wave(0.01, 0.02, 100_000, 1e-3, 0.0, 1e3, 6000.0).unwrap();
        assert!(stim.data().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_simulation_window_padding() {
        let stim = Stimulus::ramped_sine_wave(0.1, 0.3, 100_000, 2.5e-3, 25e-3, 5e3, 60.0).unwrap();
        let padded = stim.to_simulation_window();
        assert_eq!(padded.n_simulation_timesteps(), 30_000);
        assert!((padded.stimulus_duration() - 0.3).abs() < 1e-12);
        assert_eq!(&padded.data()[..stim.n_simulation_timesteps()], stim.data());
    }
}
