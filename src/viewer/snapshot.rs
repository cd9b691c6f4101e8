//! Offscreen rendering to PNG.

use std::path::Path;

use image::RgbaImage;

use super::camera::OrbitCamera;
use super::renderer::{create_depth_view, request_device, SceneRenderer};
use super::scene::SceneGeometry;
use crate::error::{GpuError, ViewerError};
use crate::layout::SceneLayout;

const SNAPSHOT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Background for a layout: transparent without a template, otherwise a
/// dark or light fill depending on the template name.
pub fn background(layout: &SceneLayout) -> wgpu::Color {
    match layout.template.as_deref() {
        None => wgpu::Color::TRANSPARENT,
        Some(t) if t.contains("dark") => wgpu::Color {
            r: 0.02,
            g: 0.02,
            b: 0.05,
            a: 1.0,
        },
        Some(_) => wgpu::Color::WHITE,
    }
}

/// Render `geometry` offscreen at the layout's size and save it as PNG.
pub fn render_png(
    geometry: &SceneGeometry,
    layout: &SceneLayout,
    camera: &OrbitCamera,
    path: &Path,
) -> Result<(), ViewerError> {
    let img = pollster::block_on(render_image(geometry, layout, camera))?;
    img.save_with_format(path, image::ImageFormat::Png)?;
    log::info!("Saved snapshot to {}", path.display());
    Ok(())
}

/// Render `geometry` offscreen and read the pixels back.
pub async fn render_image(
    geometry: &SceneGeometry,
    layout: &SceneLayout,
    camera: &OrbitCamera,
) -> Result<RgbaImage, GpuError> {
    let (width, height) = (layout.width.max(1), layout.height.max(1));

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        ..Default::default()
    });
    let (_adapter, device, queue) = request_device(&instance, None).await?;

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Snapshot Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: SNAPSHOT_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let color_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let depth_view = create_depth_view(&device, width, height);

    let mut renderer = SceneRenderer::new(&device, SNAPSHOT_FORMAT, &geometry.symbols());
    renderer.upload(&device, geometry);
    renderer.update_camera(&queue, camera.view_proj(width as f32 / height as f32), width, height);

    // Rows must be aligned to COPY_BYTES_PER_ROW_ALIGNMENT (256)
    let unpadded_row = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_row = unpadded_row.div_ceil(align) * align;

    let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Snapshot Staging Buffer"),
        size: (padded_row * height) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Snapshot Encoder"),
    });
    renderer.render(&mut encoder, &color_view, &depth_view, background(layout));
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let buffer_slice = staging_buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device.poll(wgpu::Maintain::Wait);
    rx.recv()
        .map_err(|e| GpuError::BufferMapping(e.to_string()))?
        .map_err(|e| GpuError::BufferMapping(e.to_string()))?;

    let mut pixels = Vec::with_capacity((unpadded_row * height) as usize);
    {
        let data = buffer_slice.get_mapped_range();
        for row in data.chunks(padded_row as usize) {
            pixels.extend_from_slice(&row[..unpadded_row as usize]);
        }
    }
    staging_buffer.unmap();

    RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| GpuError::BufferMapping("snapshot size mismatch".to_string()))
}
