use crate::coords::Vec2;
use crate::paint::Color;
use crate::raster::RasterContext;
use crate::surface::{Path, Rectangle, Renderer, Segment};
use crate::time::FrameScheduler;

/// Slots in the FPS ring; also the graph width in pixels.
pub const FPS_SAMPLES: usize = 512;

const GRAPH_HEIGHT: f32 = 256.0;

/// Ring buffer of instantaneous FPS values, one byte per frame.
#[derive(Debug, Clone)]
pub struct FpsMeter {
    samples: [u8; FPS_SAMPLES],
    cursor: usize,
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self {
            samples: [0; FPS_SAMPLES],
            cursor: 0,
        }
    }
}

impl FpsMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `1 / dt` and returns the mean over all slots.
    ///
    /// Values saturate to `0..=255`; unfilled slots count as zero, so the
    /// mean ramps up over the first 512 frames.
    pub fn push(&mut self, dt: f32) -> f32 {
        // `as` saturates and maps NaN to 0.
        self.samples[self.cursor] = (1.0 / dt) as u8;
        self.cursor = (self.cursor + 1) % FPS_SAMPLES;
        self.mean()
    }

    pub fn mean(&self) -> f32 {
        let sum: u32 = self.samples.iter().map(|&s| u32::from(s)).sum();
        sum as f32 / FPS_SAMPLES as f32
    }

    /// Raw slots in storage order (not oldest first).
    #[inline]
    pub fn samples(&self) -> &[u8; FPS_SAMPLES] {
        &self.samples
    }
}

/// Draws the FPS ring as a bar graph against the bottom edge of the surface.
///
/// Screen space: the active camera is saved and restored around the overlay.
pub fn draw_fps_graph<C, S>(renderer: &mut Renderer<C, S>, meter: &FpsMeter)
where
    C: RasterContext,
    S: FrameScheduler,
{
    let height = renderer.info().height as f32;

    renderer.default_camera();
    renderer.set_smoothing(false);

    renderer.rectangle(&Rectangle::filled(
        Vec2::new(FPS_SAMPLES as f32 * 0.5, height - GRAPH_HEIGHT * 0.5),
        Vec2::new(FPS_SAMPLES as f32, GRAPH_HEIGHT),
        Color::LIGHT_STEEL_BLUE,
    ));

    let bars = meter
        .samples()
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let x = i as f32;
            Segment::new(Vec2::new(x, height), Vec2::new(x, height - f32::from(v)))
        })
        .collect();
    renderer.path(&Path::segments(bars, Color::INDIAN_RED, 2.0));

    renderer.set_smoothing(true);
    renderer.reset_camera();
}
