use crate::sensor::{SensorName, SensorReadings};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_BASE_SPEED: f32 = 2.0;
pub const DEFAULT_TURN_RATE: f32 = 2.0;
pub const DEFAULT_SEARCH_TIMEOUT: u32 = 120;

const MAX_TURN_FACTOR: f32 = 3.0;
const HARD_TURN_FACTOR: f32 = 1.5;
const CORNER_TURN_FACTOR: f32 = 2.0;
const SWEEP_TURN_FACTOR: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Following,
    Searching,
    /// Line lost for longer than the search timeout. Terminal.
    Aborted,
}

impl Mode {
    pub fn is_terminal(self) -> bool {
        matches!(self, Mode::Aborted)
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Following => "FOLLOWING",
            Mode::Searching => "SEARCHING",
            Mode::Aborted => "ABORTED",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerState {
    pub mode: Mode,
    pub lost_counter: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Command {
    pub turn_delta_degrees: f32,
    pub speed: f32,
}

impl Command {
    pub const STOP: Command = Command {
        turn_delta_degrees: 0.0,
        speed: 0.0,
    };

    pub fn new(turn_delta_degrees: f32, speed: f32) -> Self {
        Self {
            turn_delta_degrees,
            speed,
        }
    }
}

/// Signed urgency of each sensor: negative turns toward negative heading,
/// positive toward positive heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringWeights {
    pub left_forward: f32,
    pub left: f32,
    pub center: f32,
    pub right: f32,
    pub right_forward: f32,
}

impl Default for SteeringWeights {
    fn default() -> Self {
        Self {
            left_forward: -3.0,
            left: -2.0,
            center: 0.0,
            right: 2.0,
            right_forward: 3.0,
        }
    }
}

impl SteeringWeights {
    pub fn weight(&self, name: SensorName) -> f32 {
        match name {
            SensorName::Center => self.center,
            SensorName::Left => self.left,
            SensorName::Right => self.right,
            SensorName::LeftForward => self.left_forward,
            SensorName::RightForward => self.right_forward,
        }
    }

    /// Center is neutral, left side steers negative, right side positive, and
    /// the forward sensors outweigh the lateral ones on their side.
    pub fn is_valid(&self) -> bool {
        self.center == 0.0
            && self.left < 0.0
            && self.left_forward < self.left
            && self.right > 0.0
            && self.right_forward > self.right
    }

    pub fn steering_error(&self, readings: &SensorReadings) -> f32 {
        readings
            .iter()
            .filter(|(_, reading)| reading.active)
            .map(|(name, _)| self.weight(name))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub state: ControllerState,
    pub command: Command,
}

/// Line-following state machine. `decide` is pure apart from logging: the
/// state is threaded through by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controller {
    pub weights: SteeringWeights,
    pub base_speed: f32,
    pub turn_rate: f32,
    pub search_timeout: u32,
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            weights: SteeringWeights::default(),
            base_speed: DEFAULT_BASE_SPEED,
            turn_rate: DEFAULT_TURN_RATE,
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }
}

impl Controller {
    pub fn decide(&self, state: ControllerState, readings: &SensorReadings) -> Decision {
        let decision = match state.mode {
            Mode::Following => self.follow(readings),
            Mode::Searching => self.search(state.lost_counter, readings),
            Mode::Aborted => Decision {
                state,
                command: Command::STOP,
            },
        };

        debug!(
            "mode: {}, states: {}, turn: {:.2}, speed: {:.2}",
            decision.state.mode,
            readings,
            decision.command.turn_delta_degrees,
            decision.command.speed
        );

        decision
    }

    fn follow(&self, readings: &SensorReadings) -> Decision {
        if !readings.any_active() {
            info!("line lost while following, entering search");
            return Decision {
                state: ControllerState {
                    mode: Mode::Searching,
                    lost_counter: 0,
                },
                command: Command::STOP,
            };
        }

        let turn = if readings.is_active(SensorName::Center) {
            self.proportional_turn(readings)
        } else {
            self.recovery_turn(readings)
        };

        Decision {
            state: ControllerState {
                mode: Mode::Following,
                lost_counter: 0,
            },
            command: Command::new(turn, self.base_speed),
        }
    }

    /// Center is off but some other sensor sees the line. The first matching
    /// rule wins.
    fn recovery_turn(&self, readings: &SensorReadings) -> f32 {
        let on = |name: SensorName| readings.is_active(name);

        if on(SensorName::Left) && !on(SensorName::Right) {
            -self.turn_rate * HARD_TURN_FACTOR
        } else if on(SensorName::Right) && !on(SensorName::Left) {
            self.turn_rate * HARD_TURN_FACTOR
        } else if on(SensorName::LeftForward) && !on(SensorName::RightForward) {
            -self.turn_rate * CORNER_TURN_FACTOR
        } else if on(SensorName::RightForward) && !on(SensorName::LeftForward) {
            self.turn_rate * CORNER_TURN_FACTOR
        } else {
            self.proportional_turn(readings)
        }
    }

    fn proportional_turn(&self, readings: &SensorReadings) -> f32 {
        let limit = self.turn_rate * MAX_TURN_FACTOR;
        let turn = self.weights.steering_error(readings) * self.turn_rate;
        // f32::clamp panics when the limit is negative.
        turn.max(-limit).min(limit)
    }

    fn search(&self, lost_counter: u32, readings: &SensorReadings) -> Decision {
        let turn = self.sweep_turn(lost_counter);
        let mut state = ControllerState {
            mode: Mode::Searching,
            lost_counter: lost_counter.saturating_add(1),
        };

        if readings.any_active() {
            info!("line found during search, resuming follow");
            state = ControllerState {
                mode: Mode::Following,
                lost_counter: 0,
            };
        }

        if state.lost_counter > self.search_timeout {
            error!("line lost for {} ticks, giving up search", state.lost_counter);
            state.mode = Mode::Aborted;
        }

        Decision {
            state,
            command: Command::new(turn, 0.0),
        }
    }

    /// Sweep direction for the `lost_counter`-th search tick: positive for the
    /// first quarter of the timeout, negative for the second, repeating.
    pub fn sweep_turn(&self, lost_counter: u32) -> f32 {
        // counter % (T / 2) < T / 4, scaled by 4 to stay in integers.
        let timeout = u64::from(self.search_timeout);
        let magnitude = self.turn_rate * SWEEP_TURN_FACTOR;
        if timeout == 0 || (4 * u64::from(lost_counter)) % (2 * timeout) < timeout {
            magnitude
        } else {
            -magnitude
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{SENSOR_COUNT, SensorSet};
    use approx::assert_abs_diff_eq;

    const TURN: f32 = DEFAULT_TURN_RATE;

    fn readings(active: &[SensorName]) -> SensorReadings {
        let mut flags = SensorSet([false; SENSOR_COUNT]);
        for &name in active {
            flags[name] = true;
        }
        flags.to_readings()
    }

    fn following() -> ControllerState {
        ControllerState::default()
    }

    fn searching(lost_counter: u32) -> ControllerState {
        ControllerState {
            mode: Mode::Searching,
            lost_counter,
        }
    }

    fn turn_for(active: &[SensorName]) -> f32 {
        Controller::default()
            .decide(following(), &readings(active))
            .command
            .turn_delta_degrees
    }

    #[test]
    fn centered_on_line_drives_straight() {
        let decision = Controller::default().decide(following(), &readings(&[SensorName::Center]));
        assert_eq!(decision.state, following());
        assert_abs_diff_eq!(decision.command.turn_delta_degrees, 0.0);
        assert_abs_diff_eq!(decision.command.speed, DEFAULT_BASE_SPEED);
    }

    #[test]
    fn proportional_turn_is_clamped() {
        use SensorName::*;
        assert_abs_diff_eq!(turn_for(&[Center, Right]), 2.0 * TURN);
        assert_abs_diff_eq!(turn_for(&[Center, Right, RightForward]), 3.0 * TURN);
        assert_abs_diff_eq!(turn_for(&[Center, Left, LeftForward]), -3.0 * TURN);
        assert_abs_diff_eq!(turn_for(&[Center, Left, Right]), 0.0);
    }

    #[test]
    fn only_right_turns_hard_right() {
        assert_abs_diff_eq!(turn_for(&[SensorName::Right]), 1.5 * TURN);
    }

    #[test]
    fn only_left_turns_hard_left() {
        assert_abs_diff_eq!(turn_for(&[SensorName::Left]), -1.5 * TURN);
    }

    #[test]
    fn forward_sensors_anticipate_corners() {
        assert_abs_diff_eq!(turn_for(&[SensorName::LeftForward]), -2.0 * TURN);
        assert_abs_diff_eq!(turn_for(&[SensorName::RightForward]), 2.0 * TURN);
    }

    #[test]
    fn side_rule_beats_forward_rule() {
        assert_abs_diff_eq!(
            turn_for(&[SensorName::Left, SensorName::RightForward]),
            -1.5 * TURN
        );
    }

    #[test]
    fn balanced_off_center_falls_back_to_weighted_sum() {
        use SensorName::*;
        assert_abs_diff_eq!(turn_for(&[Left, Right, LeftForward, RightForward]), 0.0);
        assert_abs_diff_eq!(turn_for(&[LeftForward, RightForward]), 0.0);
        // Both sides on: rule 4 still applies to the forward pair.
        assert_abs_diff_eq!(turn_for(&[Left, Right, RightForward]), 2.0 * TURN);
    }

    #[test]
    fn losing_the_line_stops_and_searches() {
        let decision = Controller::default().decide(following(), &readings(&[]));
        assert_eq!(decision.state, searching(0));
        assert_eq!(decision.command, Command::STOP);
    }

    #[test]
    fn sweep_alternates_every_quarter_timeout() {
        let controller = Controller::default();
        let mut state = searching(0);
        for tick in 0..120 {
            let decision = controller.decide(state, &readings(&[]));
            let expected = if (tick / 30) % 2 == 0 { 1.5 * TURN } else { -1.5 * TURN };
            assert_abs_diff_eq!(decision.command.turn_delta_degrees, expected);
            assert_abs_diff_eq!(decision.command.speed, 0.0);
            state = decision.state;
        }
    }

    #[test]
    fn finding_the_line_resets_counter() {
        let decision =
            Controller::default().decide(searching(57), &readings(&[SensorName::LeftForward]));
        assert_eq!(decision.state, following());
        assert_abs_diff_eq!(decision.command.speed, 0.0);
    }

    #[test]
    fn search_times_out_after_threshold() {
        let controller = Controller::default();
        let mut state = searching(0);
        for _ in 0..DEFAULT_SEARCH_TIMEOUT {
            state = controller.decide(state, &readings(&[])).state;
            assert_eq!(state.mode, Mode::Searching);
        }
        state = controller.decide(state, &readings(&[])).state;
        assert_eq!(state.mode, Mode::Aborted);
        assert_eq!(state.lost_counter, DEFAULT_SEARCH_TIMEOUT + 1);
    }

    #[test]
    fn aborted_is_terminal() {
        let state = ControllerState {
            mode: Mode::Aborted,
            lost_counter: 121,
        };
        let decision = Controller::default().decide(state, &readings(&[SensorName::Center]));
        assert_eq!(decision.state, state);
        assert_eq!(decision.command, Command::STOP);
    }

    #[test]
    fn default_weights_are_valid() {
        assert!(SteeringWeights::default().is_valid());
        let flipped = SteeringWeights {
            left: 2.0,
            ..SteeringWeights::default()
        };
        assert!(!flipped.is_valid());
    }

    #[test]
    fn forward_weights_must_outweigh_lateral() {
        let inverted = SteeringWeights {
            left_forward: -0.5,
            right_forward: 0.5,
            ..SteeringWeights::default()
        };
        assert!(!inverted.is_valid());
        let equal = SteeringWeights {
            right_forward: 2.0,
            ..SteeringWeights::default()
        };
        assert!(!equal.is_valid());
    }

    #[test]
    fn sweep_handles_odd_and_huge_timeouts() {
        let odd = Controller {
            search_timeout: 10,
            ..Controller::default()
        };
        // Half period 5.0, quarter 2.5: ticks 0..=2 positive, 3..=4 negative.
        let signs: Vec<bool> = (0..10).map(|c| odd.sweep_turn(c) > 0.0).collect();
        assert_eq!(
            signs,
            [true, true, true, false, false, true, true, true, false, false]
        );

        let odd = Controller {
            search_timeout: 7,
            ..Controller::default()
        };
        // Half period 3.5, quarter 1.75.
        let signs: Vec<bool> = (0..7).map(|c| odd.sweep_turn(c) > 0.0).collect();
        assert_eq!(signs, [true, true, false, false, true, true, false]);

        let huge = Controller {
            search_timeout: u32::MAX,
            ..Controller::default()
        };
        let quarter = u32::MAX / 4;
        assert!(huge.sweep_turn(quarter) > 0.0);
        assert!(huge.sweep_turn(quarter + 1) < 0.0);
        assert!(huge.sweep_turn(u32::MAX) > 0.0);
    }
}
