use winit::dpi::PhysicalSize;

use crate::{
    config::AppConfig,
    error::{write_error_line, BootstrapError, ShaderError, ShaderStage},
};

pub struct RenderContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl RenderContext {
    /// Creates the instance and the surface for `window`, then picks an adapter
    /// able to present to it.
    pub async fn new<
        W: raw_window_handle::HasRawWindowHandle + raw_window_handle::HasRawDisplayHandle,
    >(
        window: &W,
        config: &AppConfig,
    ) -> Result<(Self, wgpu::Surface), BootstrapError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: config.backends,
            dx12_shader_compiler: Default::default(),
        });

        let surface = unsafe { instance.create_surface(window) }.map_err(BootstrapError::Surface)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: config.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(BootstrapError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                    label: Some("noise-quad device"),
                },
                None,
            )
            .await
            .map_err(BootstrapError::Device)?;

        device.on_uncaptured_error(Box::new(|error| {
            log::debug!("uncaptured device error: {:?}", error);
            // Reported on stderr whatever the log filter says.
            if let Err(e) = write_error_line(&mut std::io::stderr().lock(), &error) {
                log::warn!("failed to report device error: {e}");
            }
        }));

        Ok((
            Self {
                instance,
                adapter,
                device,
                queue,
            },
            surface,
        ))
    }

    pub(super) fn surface_config(
        &self,
        surface: &wgpu::Surface,
        size: PhysicalSize<u32>,
    ) -> wgpu::SurfaceConfiguration {
        let surface_caps = surface.get_capabilities(&self.adapter);

        // Linear target: the noise is linear luminance.
        let texture_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: texture_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        }
    }

    pub(super) fn configure_surface(
        &self,
        surface: &wgpu::Surface,
        config: &wgpu::SurfaceConfiguration,
    ) {
        surface.configure(&self.device, config)
    }

    pub fn get_device(&self) -> (&wgpu::Device, &wgpu::Queue) {
        (&self.device, &self.queue)
    }

    /// Compiles one WGSL stage, reporting validation failures instead of
    /// handing back a broken module.
    pub async fn compile_shader(
        &self,
        stage: ShaderStage,
        source: &str,
    ) -> Result<wgpu::ShaderModule, ShaderError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(stage.label()),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

        match self.device.pop_error_scope().await {
            None => Ok(module),
            Some(error) => Err(ShaderError::Compile {
                stage,
                log: error.to_string(),
            }),
        }
    }

    /// Runs `build` inside a validation scope; any error raised while it runs
    /// is reported as a link failure.
    pub async fn link<T>(&self, build: impl FnOnce(&wgpu::Device) -> T) -> Result<T, ShaderError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let linked = build(&self.device);

        match self.device.pop_error_scope().await {
            None => Ok(linked),
            Some(error) => Err(ShaderError::Link {
                log: error.to_string(),
            }),
        }
    }
}
