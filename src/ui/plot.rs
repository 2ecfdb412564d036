use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::epaint::Mesh;
use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, RichText, Sense, Shape, Ui, Vec2};
use egui_plot::{Legend, Plot, Points};

use crate::color::generate_palette;
use crate::state::AppState;

const PIE_SIZE: f32 = 280.0;

/// Render the placeholder shown when a query rejected the current input.
fn rejected(ui: &mut Ui) {
    ui.label(RichText::new("No chart for the current selection.").weak());
}

// ---------------------------------------------------------------------------
// Success pie chart
// ---------------------------------------------------------------------------

/// Render the success pie for the current site selection.
pub fn pie_chart(ui: &mut Ui, state: &AppState) {
    let (Some(selector), Ok(counts)) = (state.selector(), &state.pie) else {
        rejected(ui);
        return;
    };

    ui.strong(selector.pie_title());

    let total = counts.total();
    if total == 0 {
        ui.label("Nothing to show for this selection.");
        return;
    }

    let colors = generate_palette(counts.slices.len());

    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) = ui.allocate_painter(Vec2::splat(PIE_SIZE), Sense::hover());
        let center = response.rect.center();
        let radius = PIE_SIZE * 0.45;

        let mut start = -FRAC_PI_2;
        for (slice, &color) in counts.slices.iter().zip(&colors) {
            if slice.value == 0 {
                continue;
            }
            let share = slice.value as f32 / total as f32;
            let sweep = TAU * share;
            paint_wedge(&painter, center, radius, start, sweep, color);

            if share >= 0.05 {
                let mid = center + radius * 0.65 * Vec2::angled(start + sweep / 2.0);
                painter.text(
                    mid,
                    Align2::CENTER_CENTER,
                    format!("{:.1}%", share * 100.0),
                    FontId::proportional(13.0),
                    Color32::WHITE,
                );
            }
            start += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            for (slice, &color) in counts.slices.iter().zip(&colors) {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("■").color(color));
                    ui.label(format!("{}: {}", slice.label, slice.value));
                });
            }
        });
    });
}

/// Fill a circular sector as a triangle fan.
fn paint_wedge(painter: &Painter, center: Pos2, radius: f32, start: f32, sweep: f32, color: Color32) {
    let steps = ((sweep / TAU) * 128.0).ceil().max(1.0) as u32;

    let mut mesh = Mesh::default();
    mesh.colored_vertex(center, color);
    for i in 0..=steps {
        let angle = start + sweep * i as f32 / steps as f32;
        mesh.colored_vertex(center + radius * Vec2::angled(angle), color);
    }
    for i in 1..=steps {
        mesh.add_triangle(0, i, i + 1);
    }

    painter.add(Shape::mesh(mesh));
}

// ---------------------------------------------------------------------------
// Payload / outcome scatter plot
// ---------------------------------------------------------------------------

/// Render payload mass against outcome, one series per booster category.
pub fn scatter_chart(ui: &mut Ui, state: &AppState) {
    let (Some(selector), Ok(points)) = (state.selector(), &state.scatter) else {
        rejected(ui);
        return;
    };

    ui.strong(selector.scatter_title());

    let mut series: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        series
            .entry(p.booster_category.as_str())
            .or_default()
            .push([p.payload_mass_kg, f64::from(p.outcome.as_u8())]);
    }

    let [low, high] = state.payload;

    Plot::new("success-payload-scatter-chart")
        .legend(Legend::default())
        .x_axis_label("Payload Mass (kg)")
        .y_axis_label("class")
        .include_x(low)
        .include_x(high)
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (category, pts) in series {
                let points = Points::new(pts)
                    .name(category)
                    .color(state.color_map.color_for(category))
                    .radius(4.0);
                plot_ui.points(points);
            }
        });
}
