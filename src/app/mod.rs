use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use physics_charts::build::JoinStyle;
use physics_charts::data::{BUNDLED_DATASET, DataRepository, Dataset};
use physics_charts::engine::Scene;
use physics_charts::session::Session;
use physics_charts::sim::SimulationState;
use tracing::warn;

mod canvas;
mod render_utils;
mod ui;

use canvas::CanvasInput;
use ui::FrameRate;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub join_style: JoinStyle,
    pub screen_pan: bool,
}

pub struct PhysicsChartsApp {
    config: AppConfig,
    state: AppState,
    reload_rx: Option<Receiver<LoadOutcome>>,
}

/// A failed load still yields a dataset, just an empty one.
struct LoadOutcome {
    dataset: Dataset,
    error: Option<String>,
}

enum AppState {
    Loading { rx: Receiver<LoadOutcome> },
    Ready(Box<ViewModel>),
}

struct ViewModel {
    session: Session<Scene>,
    source: String,
    load_error: Option<String>,
    input: CanvasInput,
    /// Camera has been framed on the world for the current canvas.
    framed: bool,
    simulate: bool,
    show_fps: bool,
    frame_rate: FrameRate,
}

impl ViewModel {
    fn new(config: &AppConfig, outcome: LoadOutcome) -> Self {
        let mut state = SimulationState::default();
        state.join_style = config.join_style;
        state.screen_pan_enabled = config.screen_pan;

        let scene = Scene::new(state.world_side());
        Self {
            session: Session::new(scene, outcome.dataset, state, config.seed),
            source: source_label(config),
            load_error: outcome.error,
            input: CanvasInput::default(),
            framed: false,
            simulate: true,
            show_fps: true,
            frame_rate: FrameRate::default(),
        }
    }

    fn replace_dataset(&mut self, outcome: LoadOutcome) {
        self.session.set_dataset(outcome.dataset);
        self.load_error = outcome.error;
    }
}

fn source_label(config: &AppConfig) -> String {
    config
        .data_path
        .as_ref()
        .map_or_else(|| "bundled".to_owned(), |path| path.display().to_string())
}

impl PhysicsChartsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let state = AppState::Loading {
            rx: Self::spawn_load(config.data_path.clone()),
        };
        Self {
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(path: Option<PathBuf>) -> Receiver<LoadOutcome> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let mut repository = DataRepository::new();
            let result = match &path {
                Some(path) => repository.load_path(path),
                None => repository.load_str(BUNDLED_DATASET),
            };
            let _ = tx.send(LoadOutcome {
                error: result.err().map(|error| error.to_string()),
                dataset: repository.into_dataset(),
            });
        });

        rx
    }
}

impl eframe::App for PhysicsChartsApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(outcome) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            &self.config,
                            outcome,
                        ))));
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        warn!("dataset loader disconnected, starting without rows");
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            &self.config,
                            LoadOutcome {
                                dataset: Dataset::empty(),
                                error: Some("dataset loader stopped unexpectedly".to_owned()),
                            },
                        ))));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading patient records...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.config.data_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(outcome) => model.replace_dataset(outcome),
                        Err(TryRecvError::Empty) => self.reload_rx = Some(rx),
                        Err(TryRecvError::Disconnected) => {
                            model.load_error = Some("dataset loader stopped unexpectedly".to_owned());
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
