use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::{surface, GpuInit, SurfaceErrorAction};

/// Owns wgpu core objects and the surface configuration.
///
/// Presents CPU-rasterized frames:
/// - creates and stores Device/Queue for one window
/// - creates and configures the Surface (swapchain) with copy-destination usage
/// - uploads an RGBA8 buffer into each acquired surface texture and presents it
pub struct Gpu<'w> {
    /// Surface bound to the window.
    ///
    /// Surface lifetime is tied to the window; the owner must keep the window
    /// alive for as long as the `Gpu`.
    surface: wgpu::Surface<'w>,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,

    /// Fill for the part of the surface a smaller frame leaves uncovered.
    clear: wgpu::Color,

    /// Scratch buffer for BGRA surfaces.
    staging: Vec<u8>,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_limits,
            desired_maximum_frame_latency,
            clear_color,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("easel-engine device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let surface_caps = surface.get_capabilities(&adapter);
        anyhow::ensure!(
            surface_caps.usages.contains(wgpu::TextureUsages::COPY_DST),
            "surface textures cannot be written to by copy"
        );

        let format = surface::choose_surface_format(&surface_caps, prefer_srgb)
            .context("no 8-bit RGBA/BGRA surface format")?;

        let alpha_mode = surface::choose_alpha_mode(&surface_caps, alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_DST,
            format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);
        log::debug!("surface configured: {format:?} {}x{}", size.width, size.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            clear: surface::clear_value(clear_color, format),
            staging: Vec::new(),
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Reconfigures the surface after a resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
    }

    /// Copies a `width`×`height` RGBA8 buffer to the top-left of the next
    /// surface texture and presents it.
    ///
    /// The overlap of buffer and surface is copied; any surface area outside
    /// the buffer is filled with the clear color. A zero-sized surface
    /// (minimized window) presents nothing.
    pub fn present_rgba8(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> std::result::Result<(), SurfaceError> {
        if self.size.width == 0 || self.size.height == 0 {
            return Ok(());
        }

        let expected = width as usize * height as usize * 4;
        if pixels.len() < expected {
            log::warn!(
                "present skipped: {} bytes for a {width}x{height} frame",
                pixels.len()
            );
            return Ok(());
        }

        let frame = self.surface.get_current_texture()?;

        let copy_w = width.min(self.config.width);
        let copy_h = height.min(self.config.height);

        if copy_w < self.config.width || copy_h < self.config.height {
            self.clear_surface(&frame.texture);
        }

        if copy_w > 0 && copy_h > 0 {
            let data: &[u8] = if surface::is_bgra8(self.config.format) {
                surface::swizzle_rgba_to_bgra(&pixels[..expected], &mut self.staging);
                &self.staging
            } else {
                &pixels[..expected]
            };

            self.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &frame.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                data,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(width * 4),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width: copy_w,
                    height: copy_h,
                    depth_or_array_layers: 1,
                },
            );
        }

        // Flushes the pending texture write.
        self.queue.submit(std::iter::empty());
        frame.present();
        Ok(())
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
    }

    fn clear_surface(&self, texture: &wgpu::Texture) {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("easel clear encoder"),
            });

        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("easel clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        // Submitted before the texture write so the copy lands on top.
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}
