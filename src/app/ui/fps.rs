use std::collections::VecDeque;

use eframe::egui::Context;

use super::super::ViewModel;

/// Rolling frame-rate window shown in the header.
#[derive(Debug, Default)]
pub(in crate::app) struct FrameRate {
    current: f32,
    samples: VecDeque<f32>,
}

impl FrameRate {
    const WINDOW: usize = 180;

    fn record(&mut self, dt: f32) {
        if dt <= f32::EPSILON {
            return;
        }
        self.current = (1.0 / dt).clamp(0.0, 1000.0);
        if self.samples.len() == Self::WINDOW {
            self.samples.pop_front();
        }
        self.samples.push_back(self.current);
    }

    fn summary(&self) -> String {
        let mut parts = vec![format!("FPS {:.0}", self.current)];
        if !self.samples.is_empty() {
            let avg = self.samples.iter().sum::<f32>() / self.samples.len() as f32;
            parts.push(format!("avg {avg:.1}"));
        }
        if let Some(low) = self.samples.iter().copied().reduce(f32::min) {
            parts.push(format!("low {low:.0}"));
        }
        if self.current > f32::EPSILON {
            parts.push(format!("{:.1} ms", 1000.0 / self.current));
        }
        parts.join(" | ")
    }
}

impl ViewModel {
    /// Samples this frame and returns the header text, if the readout is on.
    pub(in crate::app) fn frame_rate_text(&mut self, ctx: &Context) -> Option<String> {
        self.frame_rate.record(ctx.input(|input| input.stable_dt));
        self.show_fps.then(|| self.frame_rate.summary())
    }

    pub(in crate::app) fn scene_text(&self) -> String {
        let state = self.session.state();
        format!(
            "bodies: {} / created: {} | mode: {:?}",
            self.session.engine().body_count(),
            state.node_count,
            state.mode()
        )
    }
}
