use wgpu::TextureFormatFeatureFlags as Flags;

/// Sample count every device may use for renderable formats without the
/// adapter-specific format features enabled.
const PORTABLE_SAMPLE_COUNT: u32 = 4;

/// Picks the sample count shared by the color and depth-stencil attachments.
///
/// Without `TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES` only 1 and 4 are legal
/// whatever the adapter reports. With it, `requested` must be supported by
/// both formats and the color format must be resolvable. Anything else
/// falls back to 1.
pub fn negotiate_sample_count(
    requested: u32,
    adapter_specific_formats: bool,
    color: Flags,
    depth_stencil: Flags,
) -> u32 {
    if requested <= 1 {
        return 1;
    }

    let supported = if adapter_specific_formats {
        color.sample_count_supported(requested)
            && color.contains(Flags::MULTISAMPLE_RESOLVE)
            && depth_stencil.sample_count_supported(requested)
    } else {
        requested == PORTABLE_SAMPLE_COUNT
    };

    if supported {
        requested
    } else {
        1
    }
}
