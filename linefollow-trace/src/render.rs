use image::{Rgb as Pixel, RgbImage};
use linefollow_core::color::{ROBOT_COLOR, SENSOR_ACTIVE_COLOR, SENSOR_PASSIVE_COLOR};
use linefollow_core::{DebugOverlay, ROBOT_RADIUS, Rgb, Simulation, TrackRaster, robot_triangle};

use crate::trace::TraceRun;

const PATH_COLOR: Rgb = Rgb(255, 140, 0);
const MARKER_RADIUS: i64 = 6;

fn pixel(color: Rgb) -> Pixel<u8> {
    Pixel([color.0, color.1, color.2])
}

fn put(image: &mut RgbImage, x: i64, y: i64, color: Rgb) {
    if x < 0 || y < 0 || x >= i64::from(image.width()) || y >= i64::from(image.height()) {
        return;
    }
    image.put_pixel(x as u32, y as u32, pixel(color));
}

fn fill_circle(image: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: Rgb) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put(image, cx + dx, cy + dy, color);
            }
        }
    }
}

fn draw_segment(image: &mut RgbImage, from: [f32; 2], to: [f32; 2], color: Rgb) {
    let length = (to[0] - from[0]).hypot(to[1] - from[1]);
    let steps = length.ceil().max(1.0) as i64;
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let x = from[0] + (to[0] - from[0]) * t;
        let y = from[1] + (to[1] - from[1]) * t;
        put(image, x as i64, y as i64, color);
    }
}

struct ImageOverlay<'a> {
    image: &'a mut RgbImage,
}

impl DebugOverlay for ImageOverlay<'_> {
    fn draw_marker(&mut self, position: [f32; 2], active: bool, _label: &str) {
        let color = if active {
            SENSOR_ACTIVE_COLOR
        } else {
            SENSOR_PASSIVE_COLOR
        };
        fill_circle(
            self.image,
            position[0] as i64,
            position[1] as i64,
            MARKER_RADIUS,
            color,
        );
    }
}

pub fn raster_image(raster: &TrackRaster) -> RgbImage {
    let width = raster.width() as u32;
    let height = raster.height() as u32;
    let mut image = RgbImage::new(width, height);
    for (index, color) in raster.pixels().iter().enumerate() {
        let x = (index % raster.width()) as u32;
        let y = (index / raster.width()) as u32;
        image.put_pixel(x, y, pixel(*color));
    }
    image
}

/// Track raster with the robot's path, its final outline and the last
/// sensor markers drawn on top.
pub fn render_trace(sim: &Simulation<TrackRaster>, run: &TraceRun) -> RgbImage {
    let mut image = raster_image(sim.surface());

    for pair in run.path.windows(2) {
        draw_segment(&mut image, pair[0], pair[1], PATH_COLOR);
    }

    let outline = robot_triangle(sim.pose(), ROBOT_RADIUS);
    for (i, &corner) in outline.iter().enumerate() {
        let next = outline[(i + 1) % outline.len()];
        draw_segment(&mut image, corner, next, ROBOT_COLOR);
    }

    sim.draw_overlay(&mut ImageOverlay { image: &mut image });
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::run_headless;
    use linefollow_core::{BLACK, SimConfig, WHITE};

    #[test]
    fn raster_image_matches_raster() {
        let (sim, _) = run_headless(&SimConfig::default(), 0).unwrap();
        let image = raster_image(sim.surface());
        assert_eq!(image.dimensions(), (800, 600));
        assert_eq!(*image.get_pixel(112, 112), pixel(BLACK));
        assert_eq!(*image.get_pixel(400, 300), pixel(WHITE));
    }

    #[test]
    fn trace_marks_path_and_sensors() {
        let (sim, run) = run_headless(&SimConfig::default(), 30).unwrap();
        let image = render_trace(&sim, &run);

        // Path runs along the top segment between the start and the robot.
        assert_eq!(*image.get_pixel(120, 112), pixel(PATH_COLOR));

        let readings = sim.last_readings().unwrap();
        let center = readings[linefollow_core::SensorName::Center].position;
        assert_eq!(
            *image.get_pixel(center[0] as u32, center[1] as u32),
            pixel(SENSOR_ACTIVE_COLOR)
        );
    }
}
