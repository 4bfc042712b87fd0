use glam::Mat4;
use winit::dpi::PhysicalSize;

/// Remaps OpenGL clip depth (-1..1) onto wgpu's (0..1).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn covering(size: PhysicalSize<u32>) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: size.width as f32,
            height: size.height as f32,
        }
    }
}

/// Orthographic projection of the unit square, in OpenGL clip space.
pub fn unit_ortho() -> Mat4 {
    Mat4::orthographic_rh_gl(0.0, 1.0, 0.0, 1.0, 0.0, 1.0)
}

/// `unit_ortho` as the GPU sees it.
pub fn clip_projection() -> Mat4 {
    OPENGL_TO_WGPU_MATRIX * unit_ortho()
}

/// Per-frame values. Rebuilt from the framebuffer size every frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameState {
    pub size: PhysicalSize<u32>,
    pub viewport: Viewport,
    pub projection: Mat4,
}

impl FrameState {
    pub fn new(size: PhysicalSize<u32>) -> Self {
        Self {
            size,
            viewport: Viewport::covering(size),
            projection: clip_projection(),
        }
    }

    /// A minimised window has nothing to draw into.
    pub fn is_empty(&self) -> bool {
        self.size.width == 0 || self.size.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const EPS: f32 = 1e-6;

    #[test]
    fn ortho_maps_origin_to_near_corner() {
        let p = unit_ortho().project_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(-1.0, -1.0, -1.0), EPS), "{p:?}");
    }

    #[test]
    fn ortho_maps_far_corner_to_far_corner() {
        // Right-handed: the far plane at distance 1 sits at z = -1.
        let p = unit_ortho().project_point3(Vec3::new(1.0, 1.0, -1.0));
        assert!(p.abs_diff_eq(Vec3::ONE, EPS), "{p:?}");
    }

    #[test]
    fn quad_lands_inside_wgpu_depth_range() {
        for corner in [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ] {
            let p = clip_projection().project_point3(corner);
            assert!((0.0..=1.0).contains(&p.z), "{corner:?} -> {p:?}");
            assert!(p.x.abs() <= 1.0 + EPS && p.y.abs() <= 1.0 + EPS);
        }
    }

    #[test]
    fn unit_square_fills_clip_space() {
        let min = clip_projection().project_point3(Vec3::ZERO);
        let max = clip_projection().project_point3(Vec3::new(1.0, 1.0, 0.0));
        assert!((min.x + 1.0).abs() < EPS && (min.y + 1.0).abs() < EPS);
        assert!((max.x - 1.0).abs() < EPS && (max.y - 1.0).abs() < EPS);
    }

    #[test]
    fn viewport_matches_framebuffer() {
        for (w, h) in [(800, 600), (1, 1), (3840, 2160), (601, 17)] {
            let frame = FrameState::new(PhysicalSize::new(w, h));
            assert_eq!(
                frame.viewport,
                Viewport {
                    x: 0.0,
                    y: 0.0,
                    width: w as f32,
                    height: h as f32
                }
            );
        }
    }

    #[test]
    fn projection_ignores_aspect_ratio() {
        let wide = FrameState::new(PhysicalSize::new(1920, 200));
        let tall = FrameState::new(PhysicalSize::new(200, 1920));
        assert_eq!(wide.projection, tall.projection);
        assert_eq!(wide.projection, clip_projection());
    }

    #[test]
    fn zero_sized_frame_is_empty() {
        assert!(FrameState::new(PhysicalSize::new(0, 600)).is_empty());
        assert!(FrameState::new(PhysicalSize::new(800, 0)).is_empty());
        assert!(!FrameState::new(PhysicalSize::new(800, 600)).is_empty());
    }
}
