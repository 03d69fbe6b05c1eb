use crate::coords::ViewportSize;

/// Depth/stencil format for the outline pass.
pub const DEPTH_STENCIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

/// One offscreen color target.
///
/// `view` is what the composite pass samples. When multisampled, the outline
/// pass renders into `msaa_view` and resolves into `view`.
pub struct ColorTarget {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    _msaa_texture: Option<wgpu::Texture>,
    pub msaa_view: Option<wgpu::TextureView>,
}

impl ColorTarget {
    /// (render attachment, resolve target) for the outline pass.
    pub fn attachment(&self) -> (&wgpu::TextureView, Option<&wgpu::TextureView>) {
        match &self.msaa_view {
            Some(msaa) => (msaa, Some(&self.view)),
            None => (&self.view, None),
        }
    }
}

/// Creates a color target sized to the viewport.
///
/// `sample_count > 1` selects the multisampled strategy; the sampled texture is
/// always single-sampled so the composite pass binds it the same way.
pub fn make_color_target(
    device: &wgpu::Device,
    label: &str,
    size: ViewportSize,
    format: wgpu::TextureFormat,
    sample_count: u32,
) -> ColorTarget {
    let resolved = create_texture(
        device,
        label,
        size,
        format,
        1,
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
    );
    let view = resolved.create_view(&wgpu::TextureViewDescriptor::default());

    let (msaa_texture, msaa_view) = if sample_count > 1 {
        let msaa = create_texture(
            device,
            &format!("{label} msaa"),
            size,
            format,
            sample_count,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let v = msaa.create_view(&wgpu::TextureViewDescriptor::default());
        (Some(msaa), Some(v))
    } else {
        (None, None)
    };

    ColorTarget {
        _texture: resolved,
        view,
        _msaa_texture: msaa_texture,
        msaa_view,
    }
}

/// Raw + bloom color targets and the shared depth/stencil buffer.
pub struct OutlineTargets {
    pub raw: ColorTarget,
    pub bloom: ColorTarget,
    _depth: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
    pub size: ViewportSize,
    pub format: wgpu::TextureFormat,
    pub sample_count: u32,
}

impl OutlineTargets {
    pub fn new(
        device: &wgpu::Device,
        size: ViewportSize,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        // Zero-sized textures are invalid; a minimized window keeps 1x1 targets
        // until a real size arrives.
        let size = ViewportSize::new(size.width.max(1), size.height.max(1));

        let raw = make_color_target(device, "glowline raw target", size, format, sample_count);
        let bloom = make_color_target(device, "glowline bloom target", size, format, sample_count);
        let depth = create_texture(
            device,
            "glowline outline depth",
            size,
            DEPTH_STENCIL_FORMAT,
            sample_count,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!(
            "outline targets created: {}x{} {:?}, {}x sampling",
            size.width,
            size.height,
            format,
            sample_count
        );

        Self {
            raw,
            bloom,
            _depth: depth,
            depth_view,
            size,
            format,
            sample_count,
        }
    }

    pub fn matches(&self, size: ViewportSize) -> bool {
        self.size == ViewportSize::new(size.width.max(1), size.height.max(1))
    }
}

fn create_texture(
    device: &wgpu::Device,
    label: &str,
    size: ViewportSize,
    format: wgpu::TextureFormat,
    sample_count: u32,
    usage: wgpu::TextureUsages,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    })
}
