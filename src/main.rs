use anyhow::Result;
use tracing_subscriber::EnvFilter;

use touchkeysd::cli::Cli;
use touchkeysd::config::Config;
use touchkeysd::devices::{Framebuffer, TouchDevice, VirtualKeyboard};
use touchkeysd::frame_loop::FrameLoop;
use touchkeysd::layout::{Layout, PanelGeometry};
use touchkeysd::render::FontRasterizer;

fn main() -> Result<()> {
    let (cli, dropped) = Cli::parse_lenient(std::env::args_os());

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("touchkeysd={level}"))),
        )
        .init();
    for flag in &dropped {
        tracing::warn!("unrecognized option {flag}, ignoring");
    }

    let config = Config::resolve(&cli)?;

    let mut framebuffer = Framebuffer::open(&config.framebuffer)?;
    let geometry = PanelGeometry::for_screen(framebuffer.xres(), framebuffer.yres())?;
    framebuffer.place(&geometry);

    let rasterizer = FontRasterizer::load(&config.font, geometry.glyph_px())?;

    let touch = match &config.device {
        Some(path) => TouchDevice::open(path)?,
        None => TouchDevice::discover(&config.input_dir)?,
    };
    let axes = touch.axes()?;

    let layout = Layout::qwerty()?;
    let keyboard = VirtualKeyboard::create(&config.device_name, &layout.keymap().all_keycodes())?;

    let stride = framebuffer.line_length();
    let frame_loop = FrameLoop::new(
        touch,
        keyboard,
        framebuffer,
        rasterizer,
        layout,
        geometry,
        config.colors,
        axes,
        stride,
    )?;
    match frame_loop.run()? {}
}
