use crate::config::{score_caps, Thresholds};

/// Composite pump score in [0, 100].
/// Each component only counts once its threshold is crossed and is capped on its own,
/// so one extreme input saturates instead of dominating.
pub fn compute_score(volume_ratio: f64, oi_change_pct: f64, delta_pct: f64, t: &Thresholds) -> f64 {
    let mut score = 0.0;

    if volume_ratio >= t.volume_spike {
        score += ((volume_ratio - 1.0) * 10.0).min(score_caps::VOLUME);
    }
    if oi_change_pct >= t.oi_spike {
        score += (oi_change_pct / 2.0).min(score_caps::OPEN_INTEREST);
    }
    if delta_pct >= t.delta_strong {
        score += delta_pct.min(score_caps::DELTA);
    }

    round_to(score, 1)
}

pub fn is_pump(score: f64, t: &Thresholds) -> bool {
    score >= t.pump_score
}

/// Half-away-from-zero rounding to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(v: f64, o: f64, d: f64) -> f64 {
        compute_score(v, o, d, &Thresholds::default())
    }

    #[test]
    fn below_threshold_contributes_nothing() {
        assert_eq!(score(1.9, 0.0, 0.0), 0.0);
        assert_eq!(score(0.0, 9.9, 0.0), 0.0);
        assert_eq!(score(0.0, 0.0, 19.99), 0.0);
    }

    #[test]
    fn threshold_crossing_gives_full_component() {
        assert_eq!(score(2.0, 0.0, 0.0), 10.0);
        assert_eq!(score(0.0, 10.0, 0.0), 5.0);
        assert_eq!(score(0.0, 0.0, 20.0), 20.0);
    }

    #[test]
    fn components_saturate_at_their_caps() {
        assert_eq!(score(100.0, 0.0, 0.0), 33.0);
        assert_eq!(score(0.0, 1000.0, 0.0), 33.0);
        assert_eq!(score(0.0, 0.0, 1000.0), 34.0);
        assert_eq!(score(f64::MAX, f64::MAX, f64::MAX), 100.0);
    }

    #[test]
    fn score_stays_within_bounds() {
        let samples = [-50.0, -1.0, 0.0, 0.5, 1.9, 2.0, 3.3, 10.0, 19.9, 20.0, 45.0, 99.9, 1e6];
        for &v in &samples {
            for &o in &samples {
                for &d in &samples {
                    let s = score(v, o, d);
                    assert!((0.0..=100.0).contains(&s), "score({v}, {o}, {d}) = {s}");
                }
            }
        }
    }

    #[test]
    fn score_is_monotonic_in_each_input() {
        let steps: Vec<f64> = (0..400).map(|i| i as f64 * 0.5).collect();
        for pair in steps.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            assert!(score(hi, 12.0, 25.0) >= score(lo, 12.0, 25.0));
            assert!(score(2.5, hi, 25.0) >= score(2.5, lo, 25.0));
            assert!(score(2.5, 12.0, hi) >= score(2.5, 12.0, lo));
        }
    }

    #[test]
    fn nan_inputs_score_zero() {
        assert_eq!(score(f64::NAN, f64::NAN, f64::NAN), 0.0);
    }

    #[test]
    fn result_is_rounded_to_one_decimal() {
        assert_eq!(score(2.36, 0.0, 0.0), 13.6);
        assert_eq!(score(0.0, 0.0, 33.33), 33.3);
    }

    #[test]
    fn pump_classification_boundary() {
        let t = Thresholds::default();
        assert!(is_pump(50.0, &t));
        assert!(!is_pump(49.9, &t));
    }

    #[test]
    fn custom_thresholds_move_the_gates() {
        let t = Thresholds {
            volume_spike: 3.0,
            ..Thresholds::default()
        };
        assert_eq!(compute_score(2.5, 0.0, 0.0, &t), 0.0);
        assert_eq!(compute_score(3.0, 0.0, 0.0, &t), 20.0);
    }
}
