use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Color32, Context, Pos2};

use crate::coauthor::{Dataset, collect_dataset};
use crate::records::InputFormat;

mod encode;
mod graph;
mod highlight;
mod interaction;
mod physics;
mod render_utils;
mod ui;

pub use physics::ForceConfig;

use self::encode::LegendEntry;
use self::highlight::SearchMatches;
use self::interaction::{InteractionState, Viewport};
use self::physics::LayoutEngine;

type LoadResult = Result<Dataset, String>;

pub struct CoauthorApp {
    source: PathBuf,
    format: Option<InputFormat>,
    initial_forces: ForceConfig,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    dataset: Dataset,
    graph_cache: RenderGraph,
    legend: Vec<LegendEntry>,
    search: String,
    search_matches: SearchMatches,
    selected: Option<usize>,
    details_panel_cache: Option<DetailsPanelCache>,
    viewport: Viewport,
    interaction: InteractionState,
    live_physics: bool,
    show_labels: bool,
    visible_node_count: usize,
    visible_edge_count: usize,
}

/// Connected authors and co-authorships ready for drawing, indexed by render position.
struct RenderGraph {
    nodes: Vec<RenderNode>,
    edges: Vec<RenderEdge>,
    engine: LayoutEngine,
    view_scratch: ViewScratch,
}

struct RenderNode {
    author: usize,
    name: String,
    group: usize,
    degree: usize,
    radius: f32,
    fill: Color32,
}

struct RenderEdge {
    edge: usize,
    source: usize,
    target: usize,
    stroke_width: f32,
}

#[derive(Default)]
struct ViewScratch {
    screen_positions: Vec<Pos2>,
    screen_radii: Vec<f32>,
    visible_indices: Vec<usize>,
    visible_mask: Vec<bool>,
}

struct DetailsPanelCache {
    selected: usize,
    coauthors: Vec<CoauthorEntry>,
}

#[derive(Clone)]
struct CoauthorEntry {
    name: String,
    shared_publications: usize,
    render_index: Option<usize>,
}

impl CoauthorApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: PathBuf,
        format: Option<InputFormat>,
        initial_forces: ForceConfig,
    ) -> Self {
        let state = Self::start_load(source.clone(), format);
        Self {
            source,
            format,
            initial_forces,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: PathBuf, format: Option<InputFormat>) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = collect_dataset(&source, format).map_err(|error| format!("{error:#}"));
            if let Err(error) = &result {
                tracing::error!(source = %source.display(), %error, "failed to load records");
            }
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: PathBuf, format: Option<InputFormat>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source, format),
        }
    }

    fn ready(&self, dataset: Dataset) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(dataset, self.initial_forces)))
    }
}

impl eframe::App for CoauthorApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading co-authorship records...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load co-authorship records");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        retry = true;
                    }
                });
                if retry {
                    self.state = Self::start_load(self.source.clone(), self.format);
                    return;
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone(), self.format));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = match result {
                Ok(dataset) => self.ready(dataset),
                Err(error) => AppState::Error(error),
            };
        }
    }
}

impl ViewModel {
    fn current_search_matches(&mut self) -> Arc<HashSet<usize>> {
        let names = self.graph_cache.nodes.iter().map(|node| node.name.as_str());
        self.search_matches.refresh(&self.search, names)
    }
}
