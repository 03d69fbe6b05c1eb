use anyhow::Result;

use glowline_engine::core::{App, AppControl, FrameCtx};
use glowline_engine::device::{Gpu, GpuInit};
use glowline_engine::logging::{init_logging, LoggingConfig};
use glowline_engine::render::{FrameOutcome, OutlineRenderer, RendererConfig};
use glowline_engine::window::{Runtime, RuntimeConfig};

/// Forwards runtime callbacks to the outline renderer.
struct Demo {
    config: RendererConfig,
    renderer: Option<OutlineRenderer>,
}

impl Demo {
    fn new(config: RendererConfig) -> Self {
        Self {
            config,
            renderer: None,
        }
    }
}

impl App for Demo {
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> AppControl {
        match OutlineRenderer::new(gpu, self.config.clone()) {
            Ok(renderer) => {
                self.renderer = Some(renderer);
                AppControl::Continue
            }
            Err(e) => {
                log::error!("{e}");
                AppControl::Exit
            }
        }
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        if let Some(r) = &self.renderer {
            r.on_resize(width, height);
        }
    }

    fn on_pan(&mut self, dx: f32, dy: f32) {
        if let Some(r) = &self.renderer {
            r.on_pan(dx, dy);
        }
    }

    fn on_tap(&mut self, x: f32, y: f32) {
        if let Some(r) = &self.renderer {
            r.on_tap(x, y);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(renderer) = self.renderer.as_mut() else {
            return AppControl::Exit;
        };

        ctx.window.pre_present_notify();
        match renderer.render_frame(ctx.gpu, ctx.time) {
            Ok(FrameOutcome::Presented | FrameOutcome::Skipped) => AppControl::Continue,
            Ok(FrameOutcome::SurfaceLost) => AppControl::Exit,
            // A later frame may fit; keep the window alive.
            Err(e) if e.is_frame_local() => {
                log::error!("frame {} dropped: {e}", ctx.time.frame_index);
                AppControl::Continue
            }
            Err(e) => {
                log::error!("{e}");
                AppControl::Exit
            }
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RendererConfig::from_env();
    log::info!("starting glowline demo: {config:?}");

    Runtime::run(RuntimeConfig::default(), GpuInit::default(), Demo::new(config))
}
