//! Scale interpolation between the "visible" cheat scale and the true 350:1 scale.

use std::f64::consts::TAU;

/// Ring radius at ratio 0, chosen so Earth and the ring fit on screen together.
pub const R_VISIBLE: f32 = 15.0;
/// Ring radius at ratio 1: the Orbital's true size in Earth radii.
pub const R_TRUE: f32 = 350.0;

/// Below this ratio the label reads as the comparison scale.
pub const COMPARISON_THRESHOLD: f32 = 0.1;
/// Above this ratio the label reads as the true scale.
pub const TRUE_SCALE_THRESHOLD: f32 = 0.9;

/// Slider steps between 0 and 1 (step size 0.01).
pub const SLIDER_STEPS: u32 = 100;

/// Kilometres per scene unit (one Earth radius).
pub const KM_PER_UNIT: f64 = 6371.0;
/// Spin gravity target at the ring floor, m/s².
const STANDARD_GRAVITY: f64 = 9.806_65;

/// Linear interpolation from `R_VISIBLE` to `R_TRUE`. The ratio is clamped to [0, 1];
/// NaN is treated as 0.
pub fn ring_radius(ratio: f32) -> f32 {
    let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
    R_VISIBLE + (R_TRUE - R_VISIBLE) * ratio
}

/// Human-readable name of the current scale.
pub fn scale_label(ratio: f32) -> String {
    if ratio < COMPARISON_THRESHOLD {
        "Visual Comparison (Cheat Scale)".to_string()
    } else if ratio > TRUE_SCALE_THRESHOLD {
        "True Scale (1:350)".to_string()
    } else {
        format!("Interpolated Scale ({}%)", (ratio * 100.0).round() as i32)
    }
}

/// Slider position, quantised to 0.01 and kept within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct ScaleRatio(u32);

impl ScaleRatio {
    pub const VISIBLE: Self = Self(0);
    pub const TRUE: Self = Self(SLIDER_STEPS);

    /// Nearest step to `value`, clamped.
    pub fn from_value(value: f32) -> Self {
        if value.is_nan() {
            return Self::VISIBLE;
        }
        let steps = (value.clamp(0.0, 1.0) * SLIDER_STEPS as f32).round() as u32;
        Self(steps.min(SLIDER_STEPS))
    }

    /// Move by `steps` hundredths, saturating at both ends.
    pub fn stepped(self, steps: i32) -> Self {
        let target = (self.0 as i64 + steps as i64).clamp(0, SLIDER_STEPS as i64);
        Self(target as u32)
    }

    pub fn steps(self) -> u32 {
        self.0
    }

    pub fn value(self) -> f32 {
        self.0 as f32 / SLIDER_STEPS as f32
    }

    pub fn ring_radius(self) -> f32 {
        ring_radius(self.value())
    }

    pub fn label(self) -> String {
        scale_label(self.value())
    }
}

/// Physical figures for the true-scale Orbital.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalStats {
    pub radius_km: f64,
    pub diameter_km: f64,
    pub circumference_km: f64,
    pub plate_width_km: f64,
    /// Rotation period that gives 1 g at the ring floor.
    pub spin_period_hours: f64,
    /// Floor speed at that rotation.
    pub rim_speed_km_s: f64,
}

impl OrbitalStats {
    pub fn for_ring(radius_units: f32, width_units: f32) -> Self {
        let radius_km = radius_units as f64 * KM_PER_UNIT;
        let radius_m = radius_km * 1000.0;
        let spin_period_s = TAU * (radius_m / STANDARD_GRAVITY).sqrt();
        Self {
            radius_km,
            diameter_km: radius_km * 2.0,
            circumference_km: radius_km * TAU,
            plate_width_km: width_units.max(0.0) as f64 * KM_PER_UNIT,
            spin_period_hours: spin_period_s / 3600.0,
            rim_speed_km_s: (radius_m * STANDARD_GRAVITY).sqrt() / 1000.0,
        }
    }

    pub fn true_scale(width_units: f32) -> Self {
        Self::for_ring(R_TRUE, width_units)
    }
}

/// `14010630` -> `"14,010,630"`.
pub fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 && digits != "0" {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderer::framing_distance;

    #[test]
    fn radius_endpoints_and_midpoint() {
        assert_eq!(ring_radius(0.0), 15.0);
        assert_eq!(ring_radius(1.0), 350.0);
        assert_eq!(ring_radius(0.5), 182.5);
    }

    #[test]
    fn radius_clamps_out_of_range() {
        assert_eq!(ring_radius(-3.0), R_VISIBLE);
        assert_eq!(ring_radius(7.0), R_TRUE);
        assert_eq!(ring_radius(f32::NAN), R_VISIBLE);
    }

    #[test]
    fn labels_at_thresholds() {
        assert_eq!(scale_label(0.0), "Visual Comparison (Cheat Scale)");
        assert_eq!(scale_label(0.05), "Visual Comparison (Cheat Scale)");
        assert_eq!(scale_label(0.09), "Visual Comparison (Cheat Scale)");
        assert_eq!(scale_label(0.1), "Interpolated Scale (10%)");
        assert_eq!(scale_label(0.5), "Interpolated Scale (50%)");
        assert_eq!(scale_label(0.9), "Interpolated Scale (90%)");
        assert_eq!(scale_label(0.91), "True Scale (1:350)");
        assert_eq!(scale_label(0.95), "True Scale (1:350)");
        assert_eq!(scale_label(1.0), "True Scale (1:350)");
    }

    #[test]
    fn ratio_quantises_and_clamps() {
        assert_eq!(ScaleRatio::from_value(0.123).steps(), 12);
        assert_eq!(ScaleRatio::from_value(0.126).steps(), 13);
        assert_eq!(ScaleRatio::from_value(-1.0), ScaleRatio::VISIBLE);
        assert_eq!(ScaleRatio::from_value(2.0), ScaleRatio::TRUE);
        assert_eq!(ScaleRatio::from_value(f32::NAN), ScaleRatio::VISIBLE);
    }

    #[test]
    fn ratio_steps_saturate() {
        assert_eq!(ScaleRatio::VISIBLE.stepped(-1), ScaleRatio::VISIBLE);
        assert_eq!(ScaleRatio::TRUE.stepped(10), ScaleRatio::TRUE);
        assert_eq!(ScaleRatio::from_value(0.95).stepped(10), ScaleRatio::TRUE);
        assert_eq!(ScaleRatio::VISIBLE.stepped(25).value(), 0.25);
    }

    #[test]
    fn ratio_label_matches_free_function() {
        let ratio = ScaleRatio::from_value(0.1);
        assert_eq!(ratio.label(), "Interpolated Scale (10%)");
        assert_eq!(ScaleRatio::TRUE.ring_radius(), R_TRUE);
    }

    #[test]
    fn camera_target_strictly_increases_across_slider() {
        let mut previous = f32::NEG_INFINITY;
        for step in 0..=10 {
            let ratio = ScaleRatio::VISIBLE.stepped(step * 10);
            let distance = framing_distance(ratio.ring_radius());
            assert!(distance > previous, "step {} did not increase", step);
            previous = distance;
        }
        assert_eq!(previous, 575.0);
    }

    #[test]
    fn true_scale_stats() {
        let stats = OrbitalStats::true_scale(1.5);
        assert!((stats.radius_km - 2_229_850.0).abs() < 1.0);
        // about fourteen million kilometres around
        assert!((stats.circumference_km - 14.01e6).abs() < 0.01e6);
        assert!((stats.plate_width_km - 9556.5).abs() < 0.1);
        // roughly a day-long spin for 1 g
        assert!(stats.spin_period_hours > 24.0 && stats.spin_period_hours < 28.0);
        assert!(stats.rim_speed_km_s > 140.0 && stats.rim_speed_km_s < 155.0);
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.4), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(14_010_630.2), "14,010,630");
    }
}
