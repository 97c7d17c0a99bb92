use crate::app::ZigzagApp;
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};

/// Render the "Custom Range" dialog.
pub fn show_custom_range_dialog(app: &mut ZigzagApp, ctx: &Context) {
    let mut should_close = false;
    Window::new(RichText::new("Custom Range").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);

            egui::Grid::new("custom_range_grid")
                .num_columns(2)
                .striped(false)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("From").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut app.custom_start).id_salt("range_dp_start"));
                    ui.end_row();

                    ui.label(RichText::new("Until").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut app.custom_end).id_salt("range_dp_end"));
                    ui.end_row();
                });

            let today = app.controller.range().today();
            let last = app.controller.range().date_at(app.controller.range().max_range_days());
            ui.add_space(4.0);
            ui.label(
                RichText::new(format!(
                    "Dates outside {} – {} are clamped.",
                    today.format("%d %b %Y"),
                    last.format("%d %b %Y")
                ))
                .small()
                .color(theme::TEXT_DIM),
            );

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let apply_btn = egui::Button::new(RichText::new("Apply").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], apply_btn).clicked() {
                    app.apply_custom_range();
                    should_close = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_custom_range = false;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut ZigzagApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([320.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("ZigZag Map").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION"))).color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Projects and saved places on a map,");
                ui.label("filtered by a draggable date range.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}

/// Render the "CSV Import Format" help dialog.
pub fn show_csv_help_dialog(app: &mut ZigzagApp, ctx: &Context) {
    let mut should_close = false;

    Window::new(RichText::new("CSV Import Format").strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([520.0, 420.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(4.0);
                ui.label(RichText::new("Delimiters").strong());
                ui.label("The delimiter is auto-detected: comma (,), semicolon (;), or tab.");
                ui.add_space(8.0);

                ui.label(RichText::new("Columns").strong());
                ui.add_space(2.0);
                egui::Grid::new("csv_columns")
                    .num_columns(3)
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Column").underline());
                        ui.label(RichText::new("Accepted headers").underline());
                        ui.label(RichText::new("Notes").underline());
                        ui.end_row();

                        for (column, headers, notes) in [
                            ("Latitude", "Lat, Latitude, Y", "required"),
                            ("Longitude", "Lng, Lon, Long, Longitude, X", "required"),
                            ("Id", "Id, Key, UUID", "generated when missing"),
                            ("Title", "Title, Name, Label, Event", ""),
                            ("Category", "Category, Type, Kind", "project (default) / location"),
                            ("Start", "Start, Start Date, From, Begin, Date", "projects only"),
                            ("End", "End, End Date, To, Finish, Until", "projects only"),
                        ] {
                            ui.label(RichText::new(column).strong());
                            ui.label(headers);
                            ui.label(RichText::new(notes).color(theme::TEXT_SECONDARY));
                            ui.end_row();
                        }
                    });
                ui.add_space(8.0);

                ui.label(RichText::new("Notes").strong());
                for note in &[
                    "• Header matching ignores case, spaces, hyphens and underscores.",
                    "• Dates: YYYY-MM-DD, DD/MM/YYYY, MM/DD/YYYY, DD.MM.YYYY, optionally with HH:MM[:SS].",
                    "• Rows with unreadable coordinates or an unknown category are skipped.",
                ] {
                    ui.label(RichText::new(*note).small());
                }
                ui.add_space(8.0);

                ui.label(RichText::new("Example").strong());
                let example = "id;title;lat;lng;category;start;end\n\
                               c1;Concert;48.8566;2.3522;project;2025-06-14 20:00;2025-06-14 23:00\n\
                               h1;Home;48.8570;2.3530;location;;";
                egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut example.to_string())
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .interactive(false),
                    );
                });
            });

            ui.separator();
            if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_csv_help = false;
    }
}
