//! Clock module - refresh-rate independent speed factor
//!
//! Every per-tick constant in the simulation is calibrated for 60 updates per
//! second. Hosts driving the simulation from a display refresh callback run at
//! whatever rate the display offers, so the simulation scales each tick by a
//! *speed factor*: at 120 Hz the factor is 0.5, at 30 Hz it is 2.0, and the
//! same distance is covered per real second either way.
//!
//! - [`FrameRateProbe`] turns raw frame deltas into a measurement (`60 / fps`).
//! - [`SpeedClock`] owns the factor the simulation reads each tick.

use super_capy_types::BASELINE_TICK_RATE;

/// Frame deltas at or above this are treated as hitches, not refresh rate.
const OUTLIER_DELTA_MS: f32 = 200.0;

/// Accepted samples per measurement window.
const PROBE_SAMPLES: usize = 30;

/// Measures display refresh rate from consecutive frame deltas.
#[derive(Debug, Clone)]
pub struct FrameRateProbe {
    fps_sum: f32,
    samples: usize,
    window: usize,
}

impl FrameRateProbe {
    pub fn new() -> Self {
        Self::with_window(PROBE_SAMPLES)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            fps_sum: 0.0,
            samples: 0,
            window: window.max(1),
        }
    }

    /// Feed one frame delta.
    ///
    /// Returns `Some(measurement)` when a window completes; the probe then
    /// starts a new window so later refresh-rate changes are picked up too.
    pub fn record_frame(&mut self, delta_ms: f32) -> Option<f32> {
        if !(delta_ms > 0.0 && delta_ms < OUTLIER_DELTA_MS) {
            return None;
        }
        self.fps_sum += 1000.0 / delta_ms;
        self.samples += 1;
        if self.samples < self.window {
            return None;
        }

        let fps = self.fps_sum / self.samples as f32;
        self.fps_sum = 0.0;
        self.samples = 0;
        Some(BASELINE_TICK_RATE / fps)
    }

    pub fn pending_samples(&self) -> usize {
        self.samples
    }
}

impl Default for FrameRateProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the speed factor applied to all displacement and timers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedClock {
    base: f32,
    measurement: f32,
    factor: f32,
}

impl SpeedClock {
    /// Clock with a neutral measurement and the given base multiplier.
    ///
    /// Invalid base multipliers fall back to `1.0`.
    pub fn new(base: f32) -> Self {
        let base = sanitize(base).unwrap_or_else(|| {
            log::warn!("speed base multiplier {base} is invalid, using 1.0");
            1.0
        });
        Self {
            base,
            measurement: 1.0,
            factor: base,
        }
    }

    pub fn speed_factor(&self) -> f32 {
        self.factor
    }

    pub fn base(&self) -> f32 {
        self.base
    }

    /// Apply a new refresh-rate measurement.
    ///
    /// `None` or a non-positive / non-finite value means the measurement is
    /// unavailable and the clock falls back to the neutral calibration.
    /// Returns `true` when the effective factor changed.
    pub fn apply_measurement(&mut self, measurement: Option<f32>) -> bool {
        let measurement = match measurement.and_then(sanitize) {
            Some(m) => m,
            None => {
                if measurement.is_some() {
                    log::warn!("refresh-rate measurement {measurement:?} rejected, using neutral speed");
                }
                1.0
            }
        };

        let factor = self.base * measurement;
        let changed = (factor - self.factor).abs() > f32::EPSILON;
        self.measurement = measurement;
        self.factor = factor;
        if changed {
            log::debug!("speed factor now {factor:.3} (measurement {measurement:.3})");
        }
        changed
    }
}

impl Default for SpeedClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn sanitize(v: f32) -> Option<f32> {
    if v.is_finite() && v > 0.0 {
        Some(v)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(probe: &mut FrameRateProbe, delta: f32, n: usize) -> Option<f32> {
        let mut out = None;
        for _ in 0..n {
            if let Some(m) = probe.record_frame(delta) {
                out = Some(m);
            }
        }
        out
    }

    #[test]
    fn probe_at_60hz_is_neutral() {
        let mut probe = FrameRateProbe::new();
        let m = feed(&mut probe, 1000.0 / 60.0, 30).unwrap();
        assert!((m - 1.0).abs() < 1e-3, "{m}");
    }

    #[test]
    fn probe_at_120hz_halves_speed() {
        let mut probe = FrameRateProbe::new();
        let m = feed(&mut probe, 1000.0 / 120.0, 30).unwrap();
        assert!((m - 0.5).abs() < 1e-3, "{m}");
    }

    #[test]
    fn probe_ignores_outliers() {
        let mut probe = FrameRateProbe::new();
        assert_eq!(probe.record_frame(0.0), None);
        assert_eq!(probe.record_frame(-3.0), None);
        assert_eq!(probe.record_frame(250.0), None);
        assert_eq!(probe.pending_samples(), 0);
    }

    #[test]
    fn probe_restarts_after_a_window() {
        let mut probe = FrameRateProbe::with_window(2);
        assert!(probe.record_frame(1000.0 / 30.0).is_none());
        let m = probe.record_frame(1000.0 / 30.0).unwrap();
        assert!((m - 2.0).abs() < 1e-3);
        assert_eq!(probe.pending_samples(), 0);
    }

    #[test]
    fn clock_defaults_to_neutral() {
        let clock = SpeedClock::default();
        assert_eq!(clock.speed_factor(), 1.0);
    }

    #[test]
    fn clock_falls_back_when_measurement_missing() {
        let mut clock = SpeedClock::new(1.0);
        assert!(clock.apply_measurement(Some(2.0)));
        assert_eq!(clock.speed_factor(), 2.0);

        assert!(clock.apply_measurement(None));
        assert_eq!(clock.speed_factor(), 1.0);

        assert!(!clock.apply_measurement(Some(f32::NAN)));
        assert_eq!(clock.speed_factor(), 1.0);
    }

    #[test]
    fn clock_applies_base_multiplier() {
        let mut clock = SpeedClock::new(1.5);
        assert_eq!(clock.speed_factor(), 1.5);
        clock.apply_measurement(Some(0.5));
        assert!((clock.speed_factor() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn invalid_base_is_neutral() {
        assert_eq!(SpeedClock::new(0.0).speed_factor(), 1.0);
        assert_eq!(SpeedClock::new(f32::INFINITY).speed_factor(), 1.0);
    }
}
