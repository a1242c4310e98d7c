use linefollow_core::{
    BLACK, Controller, ControllerState, DebugOverlay, Mode, Pose, Rgb, SensorArray, SensorName,
    SensorSet, SimConfig, SimError, Simulation, TrackLayout, TrackRaster, TrackSurface, WHITE,
    WorldBounds,
};

const TURN_RATE: f32 = 2.0;

fn flags(active: &[SensorName]) -> SensorSet<bool> {
    let mut flags = SensorSet([false; 5]);
    for &name in active {
        flags[name] = true;
    }
    flags
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn left_beats_right_forward_by_priority() {
    let readings = flags(&[SensorName::Left, SensorName::RightForward]).to_readings();
    let decision = Controller::default().decide(ControllerState::default(), &readings);
    assert_close(decision.command.turn_delta_degrees, -1.5 * TURN_RATE);
}

#[test]
fn drifting_right_turns_right() {
    let readings = flags(&[SensorName::Right]).to_readings();
    let decision = Controller::default().decide(ControllerState::default(), &readings);
    assert_close(decision.command.turn_delta_degrees, 1.5 * TURN_RATE);
    assert_close(decision.command.speed, 2.0);
}

#[test]
fn sweep_pattern_repeats_with_half_timeout_period() {
    let controller = Controller::default();
    let expected = |tick: u32| match tick {
        0..=29 | 60..=89 => 1.5 * TURN_RATE,
        _ => -1.5 * TURN_RATE,
    };
    for tick in 0..120 {
        assert_close(controller.sweep_turn(tick), expected(tick));
    }
}

#[test]
fn centered_robot_on_horizontal_line_keeps_heading() {
    let mut raster = TrackRaster::new(800, 600, TrackLayout::default());
    raster.draw_fixed_track();
    let pose = Pose::new(300.0, 112.5, 0.0);
    let readings = SensorArray::default().sense(&pose, &raster);
    assert_eq!(readings.active_flags(), flags(&[SensorName::Center]));

    let mut sim = Simulation::new(
        raster,
        SensorArray::default(),
        Controller::default(),
        WorldBounds::new(800.0, 600.0),
        pose,
    );
    let tick = sim.step().unwrap();
    assert_close(tick.command.turn_delta_degrees, 0.0);
    assert_close(tick.pose.heading_degrees, 0.0);
    assert_close(tick.pose.x, 302.0);
}

#[test]
fn robot_far_from_line_aborts_after_121_search_ticks() {
    let config = SimConfig {
        start: Pose::new(400.0, 300.0, 0.0),
        ..SimConfig::default()
    };
    let mut sim = Simulation::from_config(&config).unwrap();

    let mut steps = 0;
    let err = loop {
        match sim.step() {
            Ok(tick) => {
                assert_ne!(tick.mode, Mode::Following);
                steps += 1;
            }
            Err(err) => break err,
        }
        assert!(steps < 1000, "simulation never aborted");
    };

    // One tick to notice the loss, then 121 search ticks.
    assert_eq!(steps, 121);
    assert!(matches!(err, SimError::LineLostTimeout { ticks: 121 }));
}

#[test]
fn long_run_is_total_and_stays_in_bounds() {
    let mut sim = Simulation::from_config(&SimConfig::default()).unwrap();
    for _ in 0..5000 {
        match sim.step() {
            Ok(tick) => {
                assert!((0.0..=799.0).contains(&tick.pose.x));
                assert!((0.0..=599.0).contains(&tick.pose.y));
                assert!((0.0..360.0).contains(&tick.pose.heading_degrees));
            }
            Err(SimError::LineLostTimeout { .. }) => break,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn redrawing_track_does_not_change_samples() {
    let mut raster = TrackRaster::new(800, 600, TrackLayout::default());
    raster.draw_fixed_track();
    let probes = [(112.5, 112.5), (400.0, 300.0), (690.0, 480.0), (-3.0, 900.0)];
    let first: Vec<Rgb> = probes.iter().map(|&(x, y)| raster.sample_color(x, y)).collect();
    for _ in 0..3 {
        raster.draw_fixed_track();
    }
    let again: Vec<Rgb> = probes.iter().map(|&(x, y)| raster.sample_color(x, y)).collect();
    assert_eq!(first, again);
    assert_eq!(first, vec![BLACK, WHITE, BLACK, WHITE]);
}

#[test]
fn overlay_markers_follow_sensor_positions() {
    struct Positions(Vec<[f32; 2]>);
    impl DebugOverlay for Positions {
        fn draw_marker(&mut self, position: [f32; 2], _active: bool, _label: &str) {
            self.0.push(position);
        }
    }

    let mut sim = Simulation::from_config(&SimConfig::default()).unwrap();
    sim.step().unwrap();
    let mut positions = Positions(Vec::new());
    sim.draw_overlay(&mut positions);

    let expected = SensorArray::default()
        .geometry
        .positions(&SimConfig::default().start);
    assert_eq!(positions.0, expected.0.to_vec());
}
