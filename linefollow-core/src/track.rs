use crate::color::{BLACK, Rgb, WHITE};
use serde::{Deserialize, Serialize};

/// The world as the sensors see it: a static track that can be (re)drawn and
/// sampled for color at any coordinate.
pub trait TrackSurface {
    /// Draws the static track geometry. Calling it repeatedly yields the same
    /// surface.
    fn draw_fixed_track(&mut self);

    /// Color at `(x, y)`. Coordinates outside the surface, including
    /// non-finite ones, read as background.
    fn sample_color(&self, x: f32, y: f32) -> Rgb;

    fn line_color(&self) -> Rgb;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl TrackRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        let (x0, y0) = (i64::from(self.x), i64::from(self.y));
        x >= x0 && x < x0 + i64::from(self.width) && y >= y0 && y < y0 + i64::from(self.height)
    }
}

/// Rectangular loop track: an outer rectangle of line color with an inner
/// rectangle of background cut out, leaving a band `thickness` wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackLayout {
    #[serde(default = "default_origin")]
    pub origin: [i32; 2],
    #[serde(default = "default_size")]
    pub size: [i32; 2],
    #[serde(default = "default_thickness")]
    pub thickness: i32,
    #[serde(default = "default_line_color")]
    pub line_color: Rgb,
    #[serde(default = "default_background")]
    pub background: Rgb,
}

fn default_origin() -> [i32; 2] {
    [100, 100]
}

fn default_size() -> [i32; 2] {
    [600, 400]
}

fn default_thickness() -> i32 {
    25
}

fn default_line_color() -> Rgb {
    BLACK
}

fn default_background() -> Rgb {
    WHITE
}

impl Default for TrackLayout {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            size: default_size(),
            thickness: default_thickness(),
            line_color: default_line_color(),
            background: default_background(),
        }
    }
}

impl TrackLayout {
    pub fn outer_rect(&self) -> TrackRect {
        TrackRect::new(self.origin[0], self.origin[1], self.size[0], self.size[1])
    }

    pub fn inner_rect(&self) -> TrackRect {
        TrackRect::new(
            self.origin[0] + self.thickness,
            self.origin[1] + self.thickness,
            self.size[0] - 2 * self.thickness,
            self.size[1] - 2 * self.thickness,
        )
    }

    /// Geometric containment test for the line band at pixel `(x, y)`.
    pub fn is_line_pixel(&self, x: i64, y: i64) -> bool {
        self.outer_rect().contains(x, y) && !self.inner_rect().contains(x, y)
    }
}

/// CPU-side raster of the track. This is the ground truth the sensors sample;
/// window rendering draws the same `TrackLayout` independently.
#[derive(Debug, Clone)]
pub struct TrackRaster {
    width: usize,
    height: usize,
    layout: TrackLayout,
    pixels: Vec<Rgb>,
}

impl TrackRaster {
    pub fn new(width: usize, height: usize, layout: TrackLayout) -> Self {
        Self {
            width,
            height,
            layout,
            pixels: vec![layout.background; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layout(&self) -> &TrackLayout {
        &self.layout
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgb> {
        let index = self.pixel_index(x, y)?;
        Some(self.pixels[index])
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Fills `rect` clipped to the raster.
    pub fn fill_rect(&mut self, rect: TrackRect, color: Rgb) {
        if rect.is_empty() {
            return;
        }
        let x0 = rect.x.max(0) as usize;
        let y0 = rect.y.max(0) as usize;
        let x1 = (i64::from(rect.x) + i64::from(rect.width)).clamp(0, self.width as i64) as usize;
        let y1 = (i64::from(rect.y) + i64::from(rect.height)).clamp(0, self.height as i64) as usize;

        for y in y0..y1 {
            let row = y * self.width;
            for x in x0..x1 {
                self.pixels[row + x] = color;
            }
        }
    }

    fn pixel_index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }
}

impl TrackSurface for TrackRaster {
    fn draw_fixed_track(&mut self) {
        let layout = self.layout;
        self.fill(layout.background);
        self.fill_rect(layout.outer_rect(), layout.line_color);
        self.fill_rect(layout.inner_rect(), layout.background);
    }

    fn sample_color(&self, x: f32, y: f32) -> Rgb {
        if !x.is_finite() || !y.is_finite() {
            return self.layout.background;
        }
        // Truncation toward zero, so -0.5 still lands on column 0.
        self.pixel(x as i64, y as i64).unwrap_or(self.layout.background)
    }

    fn line_color(&self) -> Rgb {
        self.layout.line_color
    }
}
