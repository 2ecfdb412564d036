use eframe::egui::{self, Color32, RichText, Ui};
use launch_dash::data::query::SiteSelector;

use crate::state::{AppState, SLIDER_MAX, SLIDER_MIN, SLIDER_STEP};

const TITLE_COLOR: Color32 = Color32::from_rgb(0x50, 0x3D, 0x36);

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Render the dashboard title and the dataset summary line.
pub fn header(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new("SpaceX Launch Records Dashboard")
                .size(40.0)
                .color(TITLE_COLOR),
        );
    });

    ui.horizontal(|ui: &mut Ui| {
        let ds = &state.dataset;
        ui.label(format!(
            "{} launches at {} sites",
            ds.len(),
            ds.sites().len()
        ));
        if let Some((min, max)) = ds.payload_bounds() {
            ui.separator();
            ui.label(format!("payload {min:.0} – {max:.0} kg"));
        }

        if let Some(msg) = state.status_message() {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Site selection
// ---------------------------------------------------------------------------

/// Render the launch site dropdown. Defaults to all sites.
pub fn site_dropdown(ui: &mut Ui, state: &mut AppState) {
    let selected_text = state
        .selector()
        .map(SiteSelector::label)
        .unwrap_or("Select a Launch Site here");

    let options = state.site_options();
    let current = state.site.clone();
    let mut picked: Option<&'static str> = None;
    egui::ComboBox::from_id_salt("site-dropdown")
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.add(
                egui::TextEdit::singleline(&mut state.site_search)
                    .hint_text("Search sites"),
            );
            if options.is_empty() {
                ui.label(RichText::new("No matching site").weak());
            }
            for option in options {
                if ui
                    .selectable_label(current == option.value(), option.label())
                    .clicked()
                {
                    picked = Some(option.value());
                }
            }
        });

    if let Some(value) = picked {
        state.set_site(value);
    }
}

// ---------------------------------------------------------------------------
// Payload range
// ---------------------------------------------------------------------------

/// Render the payload range as a pair of sliders.
///
/// The sliders are independent, so the user can drag `low` past `high`; the
/// query rejects that and the header shows why.
pub fn payload_slider(ui: &mut Ui, state: &mut AppState) {
    ui.label("Payload range (Kg):");

    let [mut low, mut high] = state.payload;
    let mut changed = false;

    ui.horizontal(|ui: &mut Ui| {
        ui.spacing_mut().slider_width = (ui.available_width() / 2.0 - 80.0).max(100.0);
        changed |= ui
            .add(
                egui::Slider::new(&mut low, SLIDER_MIN..=SLIDER_MAX)
                    .step_by(SLIDER_STEP)
                    .text("min"),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut high, SLIDER_MIN..=SLIDER_MAX)
                    .step_by(SLIDER_STEP)
                    .text("max"),
            )
            .changed();
    });

    if changed {
        state.set_payload_range(low, high);
    }
}
