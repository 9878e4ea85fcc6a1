use anyhow::Result;

use easel_engine::camera::Camera;
use easel_engine::coords::Vec2;
use easel_engine::debug::{draw_fps_graph, FpsMeter};
use easel_engine::device::GpuInit;
use easel_engine::logging::{init_logging, LoggingConfig};
use easel_engine::paint::Color;
use easel_engine::surface::{Background, Path, Rectangle, Segment, Square, Text, TextStyle};
use easel_engine::window::{Runtime, RuntimeConfig, WindowRenderer};

/// World units visible across the shorter window axis.
const VIEW_EXTENT: f32 = 10.0;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(RuntimeConfig::default(), GpuInit::default(), setup)
}

fn setup(render: &mut WindowRenderer) -> Result<()> {
    match load_font() {
        Some(bytes) => {
            render.context_mut().fonts_mut().load_font("sans-serif", &bytes)?;
        }
        None => log::warn!("no system font found; text will not be drawn"),
    }

    render.text_style(&TextStyle {
        color: Some(Color::BLACK),
        size: Some(16.0),
        ..TextStyle::default()
    });

    let mut camera = Camera::new();
    let mut fps = FpsMeter::new();
    let mut elapsed = 0.0_f32;

    render.run_loop(move |render, info| {
        elapsed += info.dt;
        let avg = fps.push(info.dt);

        let (w, h) = (info.width as f32, info.height as f32);
        let unit = w.min(h) / VIEW_EXTENT;
        camera
            .set_offset(Vec2::new(w * 0.5, h * 0.5))
            .set_scale(Vec2::splat(unit))
            .set_rotation(elapsed * 0.25)
            .set_pos(Vec2::new(elapsed.sin(), 0.0));
        render.set_camera(camera.view_matrix_2d());

        render.background(&Background::default());
        draw_scene(render, elapsed);

        draw_fps_graph(render, &fps);
        render.text(&Text::new(format!("{avg:.1} fps"), Vec2::new(8.0, 8.0)));
    });

    Ok(())
}

fn draw_scene(render: &mut WindowRenderer, t: f32) {
    let axes = vec![
        Segment::new(Vec2::new(-4.0, 0.0), Vec2::new(4.0, 0.0)),
        Segment::new(Vec2::new(0.0, -4.0), Vec2::new(0.0, 4.0)),
    ];
    render.path(&Path::segments(axes, Color::hex3(0x999), 1.0));

    render.rectangle(&Rectangle::filled(Vec2::zero(), Vec2::new(1.0, 1.0), Color::BLACK));

    for i in 0..6 {
        let phase = i as f32 / 6.0 * std::f32::consts::TAU;
        render.square(&Square {
            center: Vec2::new(phase.cos() * 3.0, phase.sin() * 3.0),
            size: 0.6,
            rotation: Some(t + phase),
            fill: Some(Color::hsl(phase.to_degrees(), 60.0, 55.0)),
            stroke: Some(Color::BLACK),
            line_width: 2.0,
        });
    }

    let wave: Vec<Vec2> = (0..=64)
        .map(|i| {
            let x = -4.0 + i as f32 / 8.0;
            Vec2::new(x, (x * 2.0 + t * 3.0).sin() * 0.5 - 4.5)
        })
        .collect();
    render.path(&Path::polyline(wave, Color::INDIAN_RED, 3.0));
}

fn load_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}
