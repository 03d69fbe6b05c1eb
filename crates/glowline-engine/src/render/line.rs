use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

/// Quad index pattern relative to the quad's first vertex.
pub const QUAD_INDEX_PATTERN: [u16; 6] = [0, 1, 2, 2, 1, 3];

/// Outline vertex as consumed by `outline.wgsl`.
///
/// `position` is already clip-ready: for endpoints in front of the camera the
/// perspective divide has been done on the CPU and `w == 1`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct OutlineVertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

impl OutlineVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x4, // position
        1 => Float32x4  // color
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OutlineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// A world-space line segment to be drawn as a constant-width quad.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineSegment {
    pub from: Vec3,
    pub to: Vec3,
    pub thickness: f32,
    pub color: Vec4,
}

impl LineSegment {
    pub const fn new(from: Vec3, to: Vec3, thickness: f32, color: Vec4) -> Self {
        Self {
            from,
            to,
            thickness,
            color,
        }
    }
}

/// Rasterized segment: four corner vertices and two triangles.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineQuad {
    pub vertices: [OutlineVertex; 4],
    pub indices: [u16; 6],
}

/// Converts one segment into a screen-space quad.
///
/// The perpendicular offset is computed after the perspective divide, so the
/// quad keeps the same on-screen width at any distance from the camera. `base`
/// is the number of vertices already emitted this frame.
///
/// Zero-length segments (on screen) produce NaN positions; they are not filtered.
pub fn rasterize_line(
    segment: &LineSegment,
    view_projection: Mat4,
    aspect_ratio: f32,
    base: u16,
) -> LineQuad {
    let a = project(view_projection, segment.from);
    let b = project(view_projection, segment.to);

    // Perpendicular to a -> b, with x measured in y units.
    let nx = -(b.y - a.y);
    let ny = (b.x - a.x) * aspect_ratio;

    let len = (nx * nx + ny * ny).sqrt() / (segment.thickness * 0.5);
    let tx = nx / len;
    let ty = ny / len * aspect_ratio;

    let color = segment.color.to_array();
    let corner = |p: Vec4, sign: f32| OutlineVertex {
        position: [p.x + sign * tx, p.y + sign * ty, p.z, p.w],
        color,
    };

    LineQuad {
        vertices: [corner(a, 1.0), corner(a, -1.0), corner(b, 1.0), corner(b, -1.0)],
        indices: QUAD_INDEX_PATTERN.map(|i| base.wrapping_add(i)),
    }
}

/// Clip-space transform followed by the perspective divide.
///
/// Points behind the camera (`w <= 0`) are left undivided; dividing would flip
/// their sign.
fn project(view_projection: Mat4, p: Vec3) -> Vec4 {
    let clip = view_projection * p.extend(1.0);
    if clip.w > 0.0 {
        (clip.truncate() / clip.w).extend(1.0)
    } else {
        clip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::camera::Camera;
    use glam::Vec2;

    const WHITE: Vec4 = Vec4::ONE;

    fn seg(from: Vec3, to: Vec3, thickness: f32) -> LineSegment {
        LineSegment::new(from, to, thickness, WHITE)
    }

    /// On-screen perpendicular width, in units of half the viewport width.
    fn measured_width(quad: &LineQuad, width: f32, height: f32) -> f32 {
        let px = |v: &OutlineVertex| Vec2::new(v.position[0] * width / 2.0, v.position[1] * height / 2.0);
        let (a0, a1, b0) = (px(&quad.vertices[0]), px(&quad.vertices[1]), px(&quad.vertices[2]));
        let a_mid = (a0 + a1) / 2.0;
        let b_mid = (b0 + px(&quad.vertices[3])) / 2.0;
        let dir = (b_mid - a_mid).normalize();
        let across = a0 - a1;
        let perpendicular = across - dir * across.dot(dir);
        perpendicular.length() / (width / 2.0)
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn vertex_is_32_bytes() {
        assert_eq!(std::mem::size_of::<OutlineVertex>(), 32);
    }

    #[test]
    fn indices_are_offset_by_base() {
        let q = rasterize_line(&seg(Vec3::ZERO, Vec3::X, 0.1), Mat4::IDENTITY, 1.0, 40);
        assert_eq!(q.indices, [40, 41, 42, 42, 41, 43]);
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn identity_transform_offsets_perpendicular() {
        let q = rasterize_line(&seg(Vec3::ZERO, Vec3::X, 0.2), Mat4::IDENTITY, 1.0, 0);
        assert_eq!(q.vertices[0].position, [0.0, 0.1, 0.0, 1.0]);
        assert_eq!(q.vertices[1].position, [0.0, -0.1, 0.0, 1.0]);
        assert_eq!(q.vertices[2].position, [1.0, 0.1, 0.0, 1.0]);
        assert_eq!(q.vertices[3].position, [1.0, -0.1, 0.0, 1.0]);
    }

    #[test]
    fn color_is_copied_to_every_corner() {
        let color = Vec4::new(0.8, 1.0, 0.9, 0.1);
        let q = rasterize_line(&LineSegment::new(Vec3::ZERO, Vec3::Y, 0.1, color), Mat4::IDENTITY, 1.0, 0);
        assert!(q.vertices.iter().all(|v| v.color == [0.8, 1.0, 0.9, 0.1]));
    }

    #[test]
    fn divided_endpoints_have_unit_w() {
        let cam = Camera::default();
        let vp = cam.view_projection(1.5);
        let q = rasterize_line(&seg(Vec3::new(-1.0, 0.5, 0.0), Vec3::new(1.0, 0.2, -1.0), 0.02), vp, 1.5, 0);
        assert!(q.vertices.iter().all(|v| v.position[3] == 1.0));
    }

    #[test]
    fn points_behind_camera_are_not_divided() {
        let cam = Camera::default();
        let vp = cam.view_projection(1.0);
        // The camera sits at z = +6; z = +20 is behind it.
        let q = rasterize_line(&seg(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, 0.02), vp, 1.0, 0);
        assert!(q.vertices[0].position[3] < 0.0);
        assert_eq!(q.vertices[2].position[3], 1.0);
    }

    #[test]
    fn width_is_constant_across_depth_and_zoom() {
        let (w, h) = (1280.0, 720.0);
        let aspect = w / h;
        let thickness = 0.02;

        let mut near_cam = Camera::default();
        near_cam.apply_pan(300.0, 120.0);
        let mut far_cam = near_cam;
        for _ in 0..4 {
            far_cam.apply_tap(h, h);
        }

        let segments = [
            seg(Vec3::new(-1.0, -0.7, 2.0), Vec3::new(1.0, 0.4, 2.0), thickness),
            seg(Vec3::new(-2.0, 0.7, -4.0), Vec3::new(3.0, -0.7, -4.5), thickness),
            seg(Vec3::new(0.3, -1.0, 0.0), Vec3::new(0.2, 1.0, 1.0), thickness),
        ];

        for cam in [near_cam, far_cam] {
            let vp = cam.view_projection(aspect);
            for s in &segments {
                let q = rasterize_line(s, vp, aspect, 0);
                let width = measured_width(&q, w, h);
                assert!(
                    (width - thickness).abs() < 1e-4,
                    "width {width} != {thickness} for {s:?} at zoom {}",
                    cam.zoom
                );
            }
        }
    }

    #[test]
    fn offset_is_perpendicular_on_screen() {
        let (w, h) = (800.0, 600.0);
        let aspect = w / h;
        let vp = Camera::default().view_projection(aspect);
        let q = rasterize_line(&seg(Vec3::new(-1.0, -1.0, 0.5), Vec3::new(1.5, 0.8, -0.5), 0.05), vp, aspect, 0);

        let px = |i: usize| Vec2::new(q.vertices[i].position[0] * w / 2.0, q.vertices[i].position[1] * h / 2.0);
        let across = px(0) - px(1);
        let along = px(2) - px(0);
        assert!(across.normalize().dot(along.normalize()).abs() < 1e-4);
    }

    #[test]
    fn degenerate_segment_yields_nan() {
        let q = rasterize_line(&seg(Vec3::ONE, Vec3::ONE, 0.02), Mat4::IDENTITY, 1.0, 0);
        assert!(q.vertices[0].position[0].is_nan());
    }
}
