use std::time::Instant;

use crate::coords::{Rect, Vec2, Viewport};
use crate::paint::Color;
use crate::raster::{PixmapContext, RasterContext};
use crate::text::FontSpec;
use crate::time::{FrameClock, FrameHandle, FrameScheduler, ManualScheduler};
use crate::transform::AffineTransform;

use super::shapes::{
    Background, Line, Path, PathPoints, Rectangle, ResizeOptions, Square, Text, TextStyle,
};
use super::target::{DetachedTarget, SurfaceTarget};

/// Color used by `background` without a color, and by `stop_loop`.
pub const DEFAULT_BACKGROUND: Color = Color::RAYWHITE;

/// Snapshot handed to the frame callback.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RendererInfo {
    /// Buffer width in pixels.
    pub width: u32,
    /// Buffer height in pixels.
    pub height: u32,
    /// Seconds since the previous frame, at most 0.1.
    pub dt: f32,
}

/// Per-frame callback registered with [`Renderer::run_loop`].
pub type FrameCallback<C, S> = Box<dyn FnMut(&mut Renderer<C, S>, RendererInfo)>;

/// Construction options. Every field is optional.
pub struct RendererOptions<C, S> {
    /// Element hosting the surface. Defaults to [`DetachedTarget`].
    pub target: Option<Box<dyn SurfaceTarget>>,
    /// Raster context. Defaults to `C::default()`.
    pub context: Option<C>,
    /// Frame scheduler. Defaults to `S::default()`.
    pub scheduler: Option<S>,
    /// Resize applied right after construction.
    pub initial_size: Option<ResizeOptions>,
}

impl<C, S> Default for RendererOptions<C, S> {
    fn default() -> Self {
        Self {
            target: None,
            context: None,
            scheduler: None,
            initial_size: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum LoopState {
    Idle,
    /// `pending` is `None` only while the callback of the current frame runs.
    Running { pending: Option<FrameHandle> },
}

/// Immediate-mode drawing surface with a camera and a frame loop.
///
/// Single-threaded: the renderer, its context and its scheduler live on the
/// thread that receives display refresh callbacks.
pub struct Renderer<C = PixmapContext, S = ManualScheduler> {
    target: Box<dyn SurfaceTarget>,
    context: C,
    scheduler: S,

    camera: AffineTransform,
    saved_cameras: Vec<AffineTransform>,

    text_color: Color,
    font: FontSpec,
    smoothing: bool,

    clock: FrameClock,
    dt: f32,
    state: LoopState,
    callback: Option<FrameCallback<C, S>>,
}

impl<C, S> Renderer<C, S>
where
    C: RasterContext + Default,
    S: FrameScheduler + Default,
{
    pub fn new(options: RendererOptions<C, S>) -> Self {
        let mut target = options
            .target
            .unwrap_or_else(|| Box::new(DetachedTarget));
        let context = options.context.unwrap_or_default();
        let scheduler = options.scheduler.unwrap_or_default();

        target.attach(context.size());

        let mut renderer = Self {
            target,
            context,
            scheduler,
            camera: AffineTransform::identity(),
            saved_cameras: Vec::new(),
            text_color: Color::BLACK,
            font: FontSpec::default(),
            smoothing: true,
            clock: FrameClock::default(),
            dt: 0.0,
            state: LoopState::Idle,
            callback: None,
        };

        if let Some(initial) = options.initial_size {
            renderer.resize(&initial);
        }

        renderer
    }
}

impl<C, S> Renderer<C, S>
where
    C: RasterContext,
    S: FrameScheduler,
{
    // ── primitives (world space) ──────────────────────────────────────────

    /// Fills and/or strokes a rectangle centered on `rect.center`.
    ///
    /// The center goes through the camera and the size is multiplied by the
    /// camera's per-axis scale. A rotation, when present, is offset by the
    /// camera's rotation.
    pub fn rectangle(&mut self, rect: &Rectangle) {
        if rect.fill.is_none() && rect.stroke.is_none() {
            return;
        }

        let center = self.camera.transform_point(rect.center);
        let size = rect.size.mul_components(self.camera.scale_of());
        let angle = rect
            .rotation
            .map_or(0.0, |r| self.camera.transform_angle(r));

        if !(center.is_finite() && size.is_finite() && angle.is_finite()) {
            log::debug!("rectangle skipped: non-finite geometry {rect:?}");
            return;
        }

        let mut local_to_screen = AffineTransform::from_translation(center.x, center.y);
        local_to_screen.rotate(angle);
        let local = Rect::from_center_size(Vec2::zero(), size);

        if let Some(fill) = rect.fill {
            self.context.fill_rect(local, fill, &local_to_screen);
        }
        if let Some(stroke) = rect.stroke {
            self.context
                .stroke_rect(local, stroke, rect.line_width, &local_to_screen);
        }
    }

    pub fn square(&mut self, square: &Square) {
        self.rectangle(&Rectangle::from(square));
    }

    /// Strokes a polyline or a set of segments; every point goes through the camera.
    pub fn path(&mut self, path: &Path) {
        let Some(points) = &path.points else { return };
        let color = path.color.unwrap_or(Color::BLACK);

        match points {
            PathPoints::Points(points) => {
                let mapped: Vec<Vec2> = points
                    .iter()
                    .map(|&p| self.camera.transform_point(p))
                    .collect();
                if mapped.len() < 2 {
                    return;
                }
                if !mapped.iter().all(|p| p.is_finite()) {
                    log::debug!("path skipped: non-finite point");
                    return;
                }
                self.context.stroke_polyline(&mapped, color, path.width);
            }
            PathPoints::Segments(segments) => {
                for seg in segments {
                    let from = self.camera.transform_point(seg.from);
                    let to = self.camera.transform_point(seg.to);
                    if !(from.is_finite() && to.is_finite()) {
                        log::debug!("path segment skipped: non-finite point {seg:?}");
                        continue;
                    }
                    self.context.stroke_polyline(&[from, to], color, path.width);
                }
            }
        }
    }

    // ── primitives (screen space) ─────────────────────────────────────────

    /// Strokes one segment in buffer pixels.
    pub fn line(&mut self, line: &Line) {
        if !(line.from.is_finite() && line.to.is_finite()) {
            log::debug!("line skipped: non-finite endpoint {line:?}");
            return;
        }
        let color = line.color.unwrap_or(Color::BLACK);
        self.context
            .stroke_polyline(&[line.from, line.to], color, line.width);
    }

    pub fn background(&mut self, background: &Background) {
        self.context
            .clear(background.color.unwrap_or(DEFAULT_BACKGROUND));
    }

    pub fn text_style(&mut self, style: &TextStyle) {
        if let Some(color) = style.color {
            self.text_color = color;
        }
        if let Some(font) = &style.font {
            self.font = font.clone();
        }
        if let Some(family) = &style.family {
            self.font = self.font.with_family(family.clone());
        }
        if let Some(size) = style.size {
            self.font = self.font.with_size(size);
        }
    }

    /// Current text color and font.
    pub fn current_text_style(&self) -> (Color, &FontSpec) {
        (self.text_color, &self.font)
    }

    /// Draws `text.text` with its top-left corner at `text.pivot`.
    pub fn text(&mut self, text: &Text) {
        if !text.pivot.is_finite() {
            log::debug!("text skipped: non-finite pivot");
            return;
        }
        self.context
            .fill_text(&text.text, text.pivot, self.text_color, &self.font);
    }

    // ── surface state ─────────────────────────────────────────────────────

    /// Sets the buffer size, and the visible placement when requested.
    ///
    /// No-op unless both `pivot` and `size` are present.
    pub fn resize(&mut self, options: &ResizeOptions) {
        let (Some(pivot), Some(size)) = (options.pivot, options.size) else {
            return;
        };

        let buffer = Viewport::from_extent(size.x, size.y);
        self.context.set_size(buffer);
        log::debug!("surface resized to {}x{}", buffer.width, buffer.height);

        if options.place_target {
            self.target.place(Rect::from_origin_size(pivot, size));
        }
    }

    pub fn info(&self) -> RendererInfo {
        let size = self.context.size();
        RendererInfo {
            width: size.width,
            height: size.height,
            dt: self.dt,
        }
    }

    /// Replaces the active world-to-screen transform.
    pub fn set_camera(&mut self, camera: AffineTransform) {
        self.camera = camera;
    }

    pub fn camera(&self) -> AffineTransform {
        self.camera
    }

    /// Saves the active camera and switches to identity (screen space).
    ///
    /// Saves nest; each `reset_camera` restores the most recent one.
    pub fn default_camera(&mut self) {
        self.saved_cameras.push(self.camera);
        self.camera = AffineTransform::identity();
    }

    /// Restores the camera saved by the matching `default_camera`.
    pub fn reset_camera(&mut self) {
        match self.saved_cameras.pop() {
            Some(camera) => self.camera = camera,
            None => log::debug!("reset_camera without a saved camera"),
        }
    }

    pub fn set_smoothing(&mut self, enabled: bool) {
        self.smoothing = enabled;
        self.context.set_smoothing(enabled);
    }

    pub fn smoothing(&self) -> bool {
        self.smoothing
    }

    #[inline]
    pub fn context(&self) -> &C {
        &self.context
    }

    #[inline]
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    #[inline]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[inline]
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // ── frame loop ────────────────────────────────────────────────────────

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    /// Starts calling `callback` once per scheduled frame.
    ///
    /// Only one loop runs at a time: while running, this logs a warning and
    /// returns without touching the active loop.
    pub fn run_loop<F>(&mut self, callback: F)
    where
        F: FnMut(&mut Renderer<C, S>, RendererInfo) + 'static,
    {
        self.run_loop_from(Instant::now(), callback);
    }

    /// Like [`run_loop`](Self::run_loop) with an explicit start time, which
    /// the first frame's `dt` is measured from.
    pub fn run_loop_from<F>(&mut self, start: Instant, callback: F)
    where
        F: FnMut(&mut Renderer<C, S>, RendererInfo) + 'static,
    {
        if self.is_running() {
            log::warn!("frame loop already running; run_loop ignored");
            return;
        }

        self.clock.reset(start);
        self.dt = 0.0;
        self.callback = Some(Box::new(callback));
        let handle = self.scheduler.request_frame();
        self.state = LoopState::Running { pending: Some(handle) };
        log::info!("frame loop started");
    }

    /// Delivers a display refresh for `handle`.
    ///
    /// Runs the callback if `handle` is the pending frame of a running loop,
    /// then schedules the next frame unless the callback stopped the loop.
    /// Returns whether the callback ran. Stale handles are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, now: Instant) -> bool {
        if self.state != (LoopState::Running { pending: Some(handle) }) {
            log::trace!("ignoring stale frame {handle:?}");
            return false;
        }
        let Some(mut callback) = self.callback.take() else {
            return false;
        };

        self.state = LoopState::Running { pending: None };
        self.dt = self.clock.tick(now).dt;

        let info = self.info();
        callback(self, info);

        // The callback may have stopped the loop, or stopped and restarted it
        // with a new callback; only the untouched case continues with this one.
        if self.state == (LoopState::Running { pending: None }) && self.callback.is_none() {
            self.callback = Some(callback);
            let next = self.scheduler.request_frame();
            self.state = LoopState::Running { pending: Some(next) };
        }

        true
    }

    /// Stops the loop, cancels the pending frame and clears to the default background.
    ///
    /// No-op while idle. No callback runs after this returns.
    pub fn stop_loop(&mut self) {
        let LoopState::Running { pending } = std::mem::replace(&mut self.state, LoopState::Idle)
        else {
            return;
        };

        if let Some(handle) = pending {
            self.scheduler.cancel_frame(handle);
        }
        self.callback = None;
        self.background(&Background::default());
        log::info!("frame loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::camera::Camera;
    use crate::raster::{RasterOp, RecordingContext};
    use crate::surface::shapes::Segment;
    use crate::surface::target::SharedPlacement;

    type TestRenderer = Renderer<RecordingContext, ManualScheduler>;

    fn renderer() -> TestRenderer {
        Renderer::new(RendererOptions::default())
    }

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    // ── construction / sizing ─────────────────────────────────────────────

    #[test]
    fn starts_idle_at_context_size() {
        let r = renderer();
        assert!(!r.is_running());
        assert_eq!(r.info(), RendererInfo { width: 300, height: 150, dt: 0.0 });
    }

    #[test]
    fn initial_size_is_applied() {
        let r: TestRenderer = Renderer::new(RendererOptions {
            initial_size: Some(ResizeOptions::new(Vec2::zero(), v(640.0, 480.0))),
            ..RendererOptions::default()
        });
        assert_eq!((r.info().width, r.info().height), (640, 480));
    }

    #[test]
    fn resize_then_info() {
        let mut r = renderer();
        r.resize(&ResizeOptions::new(v(0.0, 0.0), v(800.0, 600.0)));
        let info = r.info();
        assert_eq!((info.width, info.height), (800, 600));
    }

    #[test]
    fn resize_without_pivot_or_size_is_ignored() {
        let mut r = renderer();
        r.resize(&ResizeOptions { size: Some(v(10.0, 10.0)), ..ResizeOptions::default() });
        r.resize(&ResizeOptions { pivot: Some(v(1.0, 1.0)), ..ResizeOptions::default() });
        assert!(r.context().ops().is_empty());
        assert_eq!(r.info().width, 300);
    }

    #[test]
    fn resize_places_target_only_on_request() {
        let placement = SharedPlacement::new();
        let mut r: TestRenderer = Renderer::new(RendererOptions {
            target: Some(Box::new(placement.clone())),
            ..RendererOptions::default()
        });

        r.resize(&ResizeOptions::new(v(5.0, 6.0), v(100.0, 50.0)));
        assert_eq!(placement.take(), None);

        r.resize(&ResizeOptions { place_target: true, ..ResizeOptions::new(v(5.0, 6.0), v(100.0, 50.0)) });
        assert_eq!(placement.take(), Some(Rect::new(5.0, 6.0, 100.0, 50.0)));
    }

    // ── rectangle / square ────────────────────────────────────────────────

    #[test]
    fn world_unit_rectangle_scales_to_pixels() {
        let mut r = renderer();
        r.resize(&ResizeOptions::new(Vec2::zero(), v(800.0, 600.0)));
        let mut cam = Camera::new();
        cam.set_scale(v(80.0, 60.0));
        r.set_camera(cam.view_matrix_2d());
        r.context_mut().take_ops();

        r.rectangle(&Rectangle::filled(Vec2::zero(), v(1.0, 1.0), Color::BLACK));

        let [RasterOp::FillRect { rect, color, transform }] = r.context().ops() else {
            panic!("expected one fill, got {:?}", r.context().ops());
        };
        assert_eq!(*color, Color::BLACK);
        assert_eq!(*rect, Rect::new(-40.0, -30.0, 80.0, 60.0));
        assert_eq!(transform.transform_point(Vec2::zero()), Vec2::zero());
        assert!(transform.approx_eq(&AffineTransform::identity(), 1e-6));
    }

    #[test]
    fn rectangle_without_colors_draws_nothing() {
        let mut r = renderer();
        r.rectangle(&Rectangle { size: v(10.0, 10.0), ..Rectangle::default() });
        assert!(r.context().ops().is_empty());
    }

    #[test]
    fn rectangle_fill_and_stroke_share_transform() {
        let mut r = renderer();
        r.set_camera(AffineTransform::from_translation(100.0, 50.0));
        r.rectangle(&Rectangle {
            center: v(1.0, 2.0),
            size: v(4.0, 2.0),
            fill: Some(Color::WHITE),
            stroke: Some(Color::BLACK),
            line_width: 3.0,
            ..Rectangle::default()
        });

        let ops = r.context().ops();
        assert_eq!(ops.len(), 2);
        let RasterOp::FillRect { transform: fill_t, .. } = &ops[0] else { panic!() };
        let RasterOp::StrokeRect { transform: stroke_t, width, .. } = &ops[1] else { panic!() };
        assert_eq!(fill_t, stroke_t);
        assert_eq!(*width, 3.0);
        assert_eq!(fill_t.translation(), v(101.0, 52.0));
    }

    #[test]
    fn rectangle_rotation_is_offset_by_camera() {
        let mut r = renderer();
        let mut cam = Camera::new();
        cam.set_rotation(0.5);
        r.set_camera(cam.view_matrix_2d());

        r.rectangle(&Rectangle { rotation: Some(0.25), ..Rectangle::filled(Vec2::zero(), v(2.0, 2.0), Color::BLACK) });
        r.rectangle(&Rectangle::filled(Vec2::zero(), v(2.0, 2.0), Color::BLACK));

        let angles: Vec<f32> = r
            .context()
            .ops()
            .iter()
            .map(|op| match op {
                RasterOp::FillRect { transform, .. } => transform.angle(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert!((angles[0] - 0.75).abs() < 1e-5);
        assert_eq!(angles[1], 0.0);
    }

    #[test]
    fn non_finite_rectangle_is_skipped() {
        let mut r = renderer();
        r.rectangle(&Rectangle::filled(v(f32::NAN, 0.0), v(1.0, 1.0), Color::BLACK));
        assert!(r.context().ops().is_empty());
    }

    #[test]
    fn square_broadcasts_size() {
        let mut r = renderer();
        r.square(&Square { center: v(3.0, 3.0), size: 6.0, fill: Some(Color::ERROR), ..Square::default() });
        let [RasterOp::FillRect { rect, .. }] = r.context().ops() else { panic!() };
        assert_eq!(rect.size, v(6.0, 6.0));
    }

    // ── path / line ───────────────────────────────────────────────────────

    #[test]
    fn points_and_equivalent_segments_draw_the_same_lines() {
        let (p0, p1, p2) = (v(0.0, 0.0), v(1.0, 2.0), v(3.0, -1.0));
        let mut cam = Camera::new();
        cam.set_scale(v(10.0, 10.0)).set_offset(v(5.0, 5.0));

        let mut a = renderer();
        a.set_camera(cam.view_matrix_2d());
        a.path(&Path::polyline(vec![p0, p1, p2], Color::BLACK, 1.0));

        let mut b = renderer();
        b.set_camera(cam.view_matrix_2d());
        b.path(&Path::segments(vec![Segment::new(p0, p1), Segment::new(p1, p2)], Color::BLACK, 1.0));

        assert_eq!(a.context().segments(), b.context().segments());
        assert_eq!(a.context().segments()[0], (v(5.0, 5.0), v(15.0, 25.0)));
        // One polyline versus two separate strokes.
        assert_eq!(a.context().ops().len(), 1);
        assert_eq!(b.context().ops().len(), 2);
    }

    #[test]
    fn path_without_points_is_ignored() {
        let mut r = renderer();
        r.path(&Path::default());
        r.path(&Path::polyline(vec![v(1.0, 1.0)], Color::BLACK, 1.0));
        assert!(r.context().ops().is_empty());
    }

    #[test]
    fn path_defaults_to_black() {
        let mut r = renderer();
        r.path(&Path {
            points: Some(PathPoints::Points(vec![v(0.0, 0.0), v(1.0, 1.0)])),
            ..Path::default()
        });
        let [RasterOp::Polyline { color, .. }] = r.context().ops() else { panic!() };
        assert_eq!(*color, Color::BLACK);
    }

    #[test]
    fn line_ignores_camera() {
        let mut r = renderer();
        r.set_camera(AffineTransform::from_scale(50.0, 50.0));
        r.line(&Line { from: v(1.0, 1.0), to: v(2.0, 2.0), color: Some(Color::WHITE), width: 2.0 });
        assert_eq!(r.context().segments(), vec![(v(1.0, 1.0), v(2.0, 2.0))]);
    }

    // ── background / text ─────────────────────────────────────────────────

    #[test]
    fn background_defaults_to_raywhite() {
        let mut r = renderer();
        r.background(&Background::default());
        r.background(&Background { color: Some(Color::BLACK) });
        assert_eq!(
            r.context().ops(),
            &[RasterOp::Clear(DEFAULT_BACKGROUND), RasterOp::Clear(Color::BLACK)]
        );
    }

    #[test]
    fn text_style_patches_family_and_size_independently() {
        let mut r = renderer();
        r.text_style(&TextStyle { font: FontSpec::parse("16px monospace"), ..TextStyle::default() });
        r.text_style(&TextStyle { size: Some(24.0), ..TextStyle::default() });
        assert_eq!(r.current_text_style().1.to_string(), "24px monospace");

        r.text_style(&TextStyle {
            color: Some(Color::WHITE),
            family: Some("serif".into()),
            ..TextStyle::default()
        });
        let (color, font) = r.current_text_style();
        assert_eq!(color, Color::WHITE);
        assert_eq!(font.to_string(), "24px serif");
    }

    #[test]
    fn text_is_screen_space_and_uses_current_style() {
        let mut r = renderer();
        r.set_camera(AffineTransform::from_translation(500.0, 500.0));
        r.text_style(&TextStyle { color: Some(Color::ERROR), ..TextStyle::default() });
        r.text(&Text::new("fps", v(4.0, 8.0)));

        assert_eq!(
            r.context().ops(),
            &[RasterOp::Text {
                text: "fps".into(),
                origin: v(4.0, 8.0),
                color: Color::ERROR,
                font: FontSpec::default(),
            }]
        );
    }

    // ── camera stack / smoothing ──────────────────────────────────────────

    #[test]
    fn default_camera_round_trip() {
        let mut r = renderer();
        let cam = AffineTransform::from_scale(2.0, 3.0);
        r.set_camera(cam);

        r.default_camera();
        assert_eq!(r.camera(), AffineTransform::identity());
        r.reset_camera();
        assert_eq!(r.camera(), cam);
    }

    #[test]
    fn default_camera_nests() {
        let mut r = renderer();
        let outer = AffineTransform::from_scale(2.0, 2.0);
        let inner = AffineTransform::from_translation(7.0, 0.0);
        r.set_camera(outer);

        r.default_camera();
        r.set_camera(inner);
        r.default_camera();
        r.reset_camera();
        assert_eq!(r.camera(), inner);
        r.reset_camera();
        assert_eq!(r.camera(), outer);
    }

    #[test]
    fn reset_camera_with_nothing_saved_is_no_op() {
        let mut r = renderer();
        let cam = AffineTransform::from_translation(1.0, 1.0);
        r.set_camera(cam);
        r.reset_camera();
        assert_eq!(r.camera(), cam);
    }

    #[test]
    fn smoothing_reaches_context() {
        let mut r = renderer();
        r.set_smoothing(false);
        assert!(!r.smoothing());
        assert!(!r.context().smoothing());
    }

    // ── frame loop ────────────────────────────────────────────────────────

    fn counting(calls: Rc<Cell<u32>>) -> impl FnMut(&mut TestRenderer, RendererInfo) + 'static {
        move |_, _| calls.set(calls.get() + 1)
    }

    #[test]
    fn loop_delivers_frames_with_clamped_dt() {
        let t0 = Instant::now();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut r = renderer();
        {
            let seen = seen.clone();
            r.run_loop_from(t0, move |_, info| seen.borrow_mut().push(info.dt));
        }

        let h = r.scheduler_mut().take_pending().unwrap();
        assert!(r.on_frame(h, t0 + ms(16)));
        let h = r.scheduler_mut().take_pending().unwrap();
        assert!(r.on_frame(h, t0 + ms(16) + ms(5000)));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!((seen[0] - 0.016).abs() < 1e-6);
        assert!((seen[1] - 0.1).abs() < 1e-6);
        assert!((r.info().dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn second_run_loop_is_ignored() {
        let calls = Rc::new(Cell::new(0));
        let other = Rc::new(Cell::new(0));
        let mut r = renderer();
        r.run_loop(counting(calls.clone()));
        r.run_loop(counting(other.clone()));

        assert_eq!(r.scheduler().requested(), 1);
        let h = r.scheduler_mut().take_pending().unwrap();
        r.on_frame(h, Instant::now());
        assert_eq!((calls.get(), other.get()), (1, 0));
    }

    #[test]
    fn stop_loop_cancels_and_clears() {
        let calls = Rc::new(Cell::new(0));
        let mut r = renderer();
        r.run_loop(counting(calls.clone()));
        let pending = r.scheduler().pending().unwrap();

        r.stop_loop();
        assert!(!r.is_running());
        assert_eq!(r.scheduler().pending(), None);
        assert_eq!(r.scheduler().cancelled(), 1);
        assert_eq!(r.context().ops(), &[RasterOp::Clear(DEFAULT_BACKGROUND)]);

        // A refresh that was already in flight must not reach the callback.
        assert!(!r.on_frame(pending, Instant::now()));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn stop_loop_while_idle_is_no_op() {
        let mut r = renderer();
        r.stop_loop();
        r.stop_loop();
        assert!(r.context().ops().is_empty());
        assert_eq!(r.scheduler().cancelled(), 0);
    }

    #[test]
    fn restart_after_stop() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut r = renderer();

        r.run_loop(counting(first.clone()));
        r.stop_loop();
        r.run_loop(counting(second.clone()));
        assert!(r.is_running());

        let h = r.scheduler_mut().take_pending().unwrap();
        r.on_frame(h, Instant::now());
        assert_eq!((first.get(), second.get()), (0, 1));
    }

    #[test]
    fn callback_can_stop_its_own_loop() {
        let calls = Rc::new(Cell::new(0));
        let mut r = renderer();
        {
            let calls = calls.clone();
            r.run_loop(move |r: &mut TestRenderer, _| {
                calls.set(calls.get() + 1);
                r.stop_loop();
            });
        }

        let h = r.scheduler_mut().take_pending().unwrap();
        assert!(r.on_frame(h, Instant::now()));
        assert!(!r.is_running());
        assert_eq!(r.scheduler().pending(), None);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn callback_draws_through_renderer() {
        let mut r = renderer();
        r.run_loop(|r: &mut TestRenderer, info| {
            r.background(&Background::default());
            r.line(&Line {
                from: Vec2::zero(),
                to: v(info.width as f32, info.height as f32),
                ..Line::default()
            });
        });

        let h = r.scheduler_mut().take_pending().unwrap();
        r.on_frame(h, Instant::now());
        assert_eq!(r.context().segments(), vec![(Vec2::zero(), v(300.0, 150.0))]);
        assert!(r.scheduler().pending().is_some());
    }

    #[test]
    fn unknown_handle_is_ignored() {
        let calls = Rc::new(Cell::new(0));
        let mut r = renderer();
        r.run_loop(counting(calls.clone()));
        assert!(!r.on_frame(FrameHandle(999), Instant::now()));
        assert_eq!(calls.get(), 0);
        assert!(r.scheduler().pending().is_some());
    }
}
