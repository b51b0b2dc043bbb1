use anyhow::{anyhow, Context, Result};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info, warn};
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use std::{ffi::CString, num::NonZeroU32, ptr};
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};

use quadview::{
    config::ViewerConfig, render::SurfaceSettings, NativeGl, RenderSurface,
    RenderSurfaceController,
};

struct App {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    surface: RenderSurfaceController<NativeGl>,
}

impl App {
    fn new(config: &ViewerConfig) -> Result<(Self, EventLoop<()>)> {
        let event_loop = EventLoop::new()?;
        let window_builder = WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_depth_size(config.render.depth_bits);

        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("display offered no GL configs")
            })
            .map_err(|e| anyhow!("Failed to create window: {e}"))?;

        let window = window.context("Display builder returned no window")?;
        let raw_window_handle = window.raw_window_handle();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(
                config.render.gl_major,
                config.render.gl_minor,
            ))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .context("Failed to create OpenGL context")?;

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .context("Failed to create GL surface")?;

        let gl_context = not_current
            .make_current(&gl_surface)
            .context("Failed to make context current")?;

        if config.window.vsync {
            if let Err(e) =
                gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                warn!("Failed to enable vsync: {}", e);
            }
        }

        let gl = NativeGl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()).cast(),
            Err(_) => ptr::null(),
        });

        let depth_bits = gl_config.depth_size();
        if depth_bits < config.render.depth_bits {
            warn!(
                "Requested a {}-bit depth buffer, got {} bits",
                config.render.depth_bits, depth_bits
            );
        }
        let settings = SurfaceSettings::from(&config.render).with_depth(depth_bits > 0);
        let surface = RenderSurfaceController::new(gl, settings);

        Ok((
            Self {
                window,
                gl_context,
                gl_surface,
                surface,
            },
            event_loop,
        ))
    }

    fn realize(&mut self) {
        if let Err(e) = self.surface.initialize() {
            error!("Render surface initialization failed: {}", e);
            return;
        }
        let size = self.window.inner_size();
        self.surface.resize(size.width, size.height);
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.gl_surface.resize(&self.gl_context, w, h);
            self.surface.resize(width, height);
            self.window.request_redraw();
        }
    }

    fn redraw(&mut self) {
        if !self.surface.render() {
            return;
        }
        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            error!("Failed to swap buffers: {}", e);
        }
    }

    fn unrealize(&mut self) {
        self.surface.release();
    }
}

fn load_config() -> (ViewerConfig, Option<anyhow::Error>) {
    let loaded = ViewerConfig::default_path().and_then(|path| ViewerConfig::load_or_create(&path));
    match loaded {
        Ok(config) => (config, None),
        Err(e) => (ViewerConfig::default(), Some(e)),
    }
}

fn main() -> Result<()> {
    let (config, config_error) = load_config();
    SimpleLogger::new().with_level(config.log_level()).init()?;
    if let Some(e) = config_error {
        warn!("Using default configuration: {:#}", e);
    }
    info!("Initializing quadview...");

    let (mut app, event_loop) = App::new(&config)?;
    app.realize();

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Wait);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    app.unrealize();
                    elwt.exit();
                }
                WindowEvent::Resized(size) => app.resize(size.width, size.height),
                WindowEvent::RedrawRequested => app.redraw(),
                _ => (),
            },
            Event::LoopExiting => app.unrealize(),
            _ => (),
        }
    })?;

    Ok(())
}
