//! White-to-accent gradients keyed to a competition identity.

use crate::competition::Competition;

pub const WHITE: [u8; 3] = [0xff, 0xff, 0xff];

/// The fraction of the domain held flat at white, so near-zero probabilities
/// render as blank cells rather than faintly tinted ones.
const FLAT_WHITE_UNTIL: f32 = 0.2;

/// Piecewise-linear gradient over t in [0, 1].
#[derive(Debug, Clone)]
pub struct ColorScale {
    stops: Vec<(f32, [u8; 3])>,
}

impl ColorScale {
    /// Stops must be ordered by position and cover at least one point.
    pub fn new(stops: Vec<(f32, [u8; 3])>) -> Self {
        assert!(!stops.is_empty(), "color scale needs at least one stop");
        assert!(
            stops.windows(2).all(|w| w[0].0 <= w[1].0),
            "color scale stops must be ordered"
        );
        Self { stops }
    }

    pub fn sample(&self, t: f32) -> [u8; 3] {
        let t = t.clamp(0.0, 1.0);
        let first = self.stops[0];
        if t <= first.0 {
            return first.1;
        }
        for pair in self.stops.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            if t <= t1 {
                if t1 <= t0 {
                    return c1;
                }
                let frac = (t - t0) / (t1 - t0);
                return lerp(c0, c1, frac);
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

fn lerp(a: [u8; 3], b: [u8; 3], frac: f32) -> [u8; 3] {
    let mut out = [0u8; 3];
    for (i, slot) in out.iter_mut().enumerate() {
        let v = a[i] as f32 + (b[i] as f32 - a[i] as f32) * frac;
        *slot = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Gradient from white (held flat for the first 20% of the domain) to the
/// competition's accent color.
pub fn competition_scale(competition: Competition) -> ColorScale {
    ColorScale::new(vec![
        (0.0, WHITE),
        (FLAT_WHITE_UNTIL, WHITE),
        (1.0, competition.accent()),
    ])
}
