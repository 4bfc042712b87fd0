use crate::context::RenderContext;

pub(crate) type SurfaceError = wgpu::SurfaceError;

pub struct SurfaceRenderer {
    surface: wgpu::Surface,
    config: wgpu::SurfaceConfiguration,

    size: winit::dpi::PhysicalSize<u32>,
}

impl SurfaceRenderer {
    pub fn new(
        surface: wgpu::Surface,
        window: &winit::window::Window,
        ctx: &RenderContext,
    ) -> Self {
        let size = window.inner_size();
        let config = ctx.surface_config(&surface, size);

        let res = Self {
            surface,
            size,
            config,
        };

        if res.has_area() {
            res.configure(ctx);
        }

        log::info!(
            "surface {}x{} {:?} {:?}",
            size.width,
            size.height,
            res.config.format,
            res.config.present_mode
        );

        res
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn configure(&self, ctx: &RenderContext) {
        ctx.configure_surface(&self.surface, &self.config)
    }

    fn has_area(&self) -> bool {
        self.size.width > 0 && self.size.height > 0
    }

    pub fn get_current_texture(
        &mut self,
        context: &RenderContext,
    ) -> Result<wgpu::SurfaceTexture, SurfaceError> {
        match self.surface.get_current_texture() {
            Err(wgpu::SurfaceError::Lost) => {
                self.reconfigure(context);
                Err(wgpu::SurfaceError::Lost)
            }

            x => x,
        }
    }

    /// Makes the surface match `new_size`, reconfiguring only on change.
    pub fn ensure_size(&mut self, new_size: winit::dpi::PhysicalSize<u32>, context: &RenderContext) {
        if new_size != self.size {
            log::debug!("framebuffer resized to {}x{}", new_size.width, new_size.height);
            self.resize(new_size, context);
        }
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>, context: &RenderContext) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.configure(context);
        }
    }

    pub fn reconfigure(&mut self, context: &RenderContext) {
        self.resize(self.size, context)
    }
}

/// Whether a failed acquire should be followed by another redraw before the
/// loop goes back to waiting.
pub fn retry_after(error: &SurfaceError) -> bool {
    matches!(
        error,
        SurfaceError::Lost | SurfaceError::Outdated | SurfaceError::Timeout
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_acquire_failures_are_retried() {
        assert!(retry_after(&SurfaceError::Lost));
        assert!(retry_after(&SurfaceError::Outdated));
        assert!(retry_after(&SurfaceError::Timeout));
    }

    #[test]
    fn out_of_memory_is_not_retried() {
        assert!(!retry_after(&SurfaceError::OutOfMemory));
    }
}
