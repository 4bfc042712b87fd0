use std::time::{SystemTime, UNIX_EPOCH};

use image::{GrayImage, Luma};
use rand::{rngs::StdRng, Rng, SeedableRng};
use wgpu::util::DeviceExt;

use crate::context::RenderContext;

pub const NOISE_SIZE: u32 = 16;

/// Seed taken from the system clock in nanoseconds, so every run gets a
/// different texture.
pub fn timer_seed() -> u64 {
    seed_from_clock(SystemTime::now())
}

fn seed_from_clock(now: SystemTime) -> u64 {
    match now.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_nanos() as u64,
        Err(err) => {
            let behind = err.duration().as_nanos() as u64;
            log::warn!("system clock is {behind}ns before the epoch, seeding from that offset");
            behind
        }
    }
}

/// 16x16 single-channel noise. Fixed once generated.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseTexture {
    seed: u64,
    image: GrayImage,
}

impl NoiseTexture {
    pub fn generate(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let image = GrayImage::from_fn(NOISE_SIZE, NOISE_SIZE, |_, _| Luma([rng.gen::<u8>()]));

        Self { seed, image }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.image.width(),
            height: self.image.height(),
            depth_or_array_layers: 1,
        }
    }

    pub fn upload(&self, render_ctx: &RenderContext) -> GpuTexture {
        let (device, queue) = render_ctx.get_device();

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("noise texture"),
                size: self.extent(),
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::R8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            self.pixels(),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = Self::create_sampler(device);

        log::info!(
            "uploaded {}x{} noise texture (seed {})",
            self.image.width(),
            self.image.height(),
            self.seed()
        );

        GpuTexture {
            texture,
            view,
            sampler,
        }
    }

    fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("noise sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        })
    }
}

pub struct GpuTexture {
    // Kept alive alongside its view.
    #[allow(dead_code)]
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl GpuTexture {
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}
