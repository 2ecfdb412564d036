use eframe::egui;
use launch_dash::data::model::LaunchDataset;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaunchDashApp {
    pub state: AppState,
}

impl LaunchDashApp {
    pub fn new(dataset: LaunchDataset) -> Self {
        Self {
            state: AppState::new(dataset),
        }
    }
}

impl eframe::App for LaunchDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title, summary, site dropdown ----
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            panels::header(ui, &self.state);
            panels::site_dropdown(ui, &mut self.state);
            ui.add_space(4.0);
        });

        // ---- Central panel: pie, payload slider, scatter ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::pie_chart(ui, &self.state);
            ui.separator();
            panels::payload_slider(ui, &mut self.state);
            ui.separator();
            plot::scatter_chart(ui, &self.state);
        });
    }
}
