use std::convert::Infallible;

use anyhow::{Context, Result};

use crate::keyboard::{self, KeySink, PanelState, Synthesizer};
use crate::layout::{Axes, Layout, PanelGeometry};
use crate::render::{GlyphRasterizer, Palette, PanelBuffer, PanelDisplay, Renderer};
use crate::touch::{self, EventSource, TouchTracker};

/// Render, flush, wait for a touch batch, act on it. Forever.
pub struct FrameLoop<S, K, D, R> {
    source: S,
    sink: K,
    display: D,
    renderer: Renderer<R>,
    buffer: PanelBuffer,
    tracker: TouchTracker,
    synth: Synthesizer,
    axes: Axes,
    geometry: PanelGeometry,
    state: PanelState,
}

impl<S, K, D, R> FrameLoop<S, K, D, R>
where
    S: EventSource,
    K: KeySink,
    D: PanelDisplay,
    R: GlyphRasterizer,
{
    /// `stride` is the display's line length in bytes.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: S,
        sink: K,
        display: D,
        rasterizer: R,
        layout: Layout,
        geometry: PanelGeometry,
        palette: Palette,
        axes: Axes,
        stride: usize,
    ) -> Result<Self> {
        let synth = Synthesizer::new(layout.keymap().clone());
        let renderer = Renderer::new(layout, geometry, palette, rasterizer);
        let buffer = renderer.buffer(stride)?;
        Ok(Self {
            source,
            sink,
            display,
            renderer,
            buffer,
            tracker: TouchTracker::new(),
            synth,
            axes,
            geometry,
            state: PanelState::default(),
        })
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// One iteration. Fails only when the touch source does.
    pub fn step(&mut self) -> Result<()> {
        self.renderer.draw(&self.state, &mut self.buffer);
        if let Err(e) = self.display.flush(self.buffer.as_bytes()) {
            tracing::warn!("error writing panel to display: {e}");
        }

        let sample = self
            .tracker
            .next_sample(&mut self.source)
            .context("reading touch input")?;
        let zone = touch::zone_for(&sample, &self.axes, &self.geometry);
        if let Some(zone) = self.state.track(&sample, zone) {
            let activation = self.synth.activate(zone, self.state.page);
            keyboard::emit(&mut self.sink, &activation.events);
            if activation.page != self.state.page {
                tracing::debug!(
                    from = self.state.page.bits(),
                    to = activation.page.bits(),
                    "layout page changed"
                );
            }
            self.state.page = activation.page;
        }
        Ok(())
    }

    pub fn run(mut self) -> Result<Infallible> {
        tracing::info!("keyboard running");
        loop {
            self.step()?;
        }
    }
}
