use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const ROBOT_COLOR: Rgb = Rgb(220, 20, 60);
pub const SENSOR_ACTIVE_COLOR: Rgb = Rgb(0, 255, 0);
pub const SENSOR_PASSIVE_COLOR: Rgb = Rgb(255, 0, 0);
pub const DEBUG_TEXT_COLOR: Rgb = Rgb(0, 0, 255);

pub const DEFAULT_TOLERANCE: u8 = 80;

impl Rgb {
    pub fn channels(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

/// A sample counts as line iff every channel differs from `line` by strictly
/// less than `tolerance`.
pub fn is_on_line(sample: Rgb, line: Rgb, tolerance: u8) -> bool {
    sample
        .channels()
        .iter()
        .zip(line.channels().iter())
        .all(|(&s, &l)| s.abs_diff(l) < tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_is_on_line() {
        assert!(is_on_line(BLACK, BLACK, DEFAULT_TOLERANCE));
        assert!(!is_on_line(WHITE, BLACK, DEFAULT_TOLERANCE));
    }

    #[test]
    fn tolerance_bound_is_strict() {
        assert!(is_on_line(Rgb(79, 79, 79), BLACK, 80));
        assert!(!is_on_line(Rgb(80, 0, 0), BLACK, 80));
        assert!(!is_on_line(Rgb(0, 0, 80), BLACK, 80));
    }

    #[test]
    fn zero_tolerance_never_matches() {
        assert!(!is_on_line(BLACK, BLACK, 0));
    }

    #[test]
    fn every_channel_must_match() {
        assert!(!is_on_line(Rgb(0, 0, 200), BLACK, 80));
        assert!(is_on_line(Rgb(250, 10, 240), Rgb(255, 0, 255), 80));
    }
}
