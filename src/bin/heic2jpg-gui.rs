#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use heic2jpg::{
    config::{init_logging, DEFAULT_DESTINATION, DEFAULT_SOURCE},
    list_files, report,
    stats::format_elapsed,
    ConversionStats, Pipeline, ProgressEvent,
};
use tracing::{error, info};

fn main() -> eframe::Result<()> {
    init_logging(false);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([700.0, 500.0])
            .with_min_inner_size([560.0, 420.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "HEIC to JPG Converter",
        options,
        Box::new(|cc| {
            configure_custom_style(&cc.egui_ctx);
            Ok(Box::new(ConverterApp::default()))
        }),
    )
}

fn configure_custom_style(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(10.0, 12.0);
    style.spacing.window_margin = egui::Margin::same(20.0);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);
    style.visuals.widgets.inactive.rounding = egui::Rounding::same(6.0);
    style.visuals.widgets.hovered.rounding = egui::Rounding::same(6.0);
    style.visuals.widgets.active.rounding = egui::Rounding::same(6.0);
    ctx.set_style(style);
}

/// Sent from the worker thread to the UI
enum WorkerMessage {
    Progress(ProgressEvent),
    Finished(ConversionStats),
    Failed(String),
}

struct ConverterApp {
    source_path: String,
    dest_path: String,
    info_message: String,
    progress: f32,
    log: Vec<String>,
    is_running: bool,
    rx: Receiver<WorkerMessage>,
    tx: Sender<WorkerMessage>,
}

impl Default for ConverterApp {
    fn default() -> Self {
        let (tx, rx) = channel();
        let mut app = Self {
            source_path: String::new(),
            dest_path: String::new(),
            info_message: "Ready to process.".to_string(),
            progress: 0.0,
            log: vec!["Logs will appear here...".to_string()],
            is_running: false,
            rx,
            tx,
        };

        let raw = Path::new(DEFAULT_SOURCE);
        if raw.is_dir() {
            let raw = std::path::absolute(raw).unwrap_or_else(|_| raw.to_path_buf());
            app.source_path = raw.display().to_string();
            app.update_info();
        }
        app
    }
}

impl eframe::App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_messages();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(
                    egui::RichText::new("📸 HEIC to JPG Converter")
                        .size(24.0)
                        .strong(),
                );
            });
            ui.add_space(10.0);

            egui::Frame::group(ui.style())
                .inner_margin(15.0)
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(60)))
                .show(ui, |ui| {
                    egui::Grid::new("path_grid")
                        .num_columns(2)
                        .spacing([10.0, 12.0])
                        .show(ui, |ui| {
                            let pick_source = ui.add_enabled(
                                !self.is_running,
                                egui::Button::new("Select Source Folder"),
                            );
                            if pick_source.clicked() {
                                if let Some(path) = rfd::FileDialog::new().pick_folder() {
                                    self.source_path = path.display().to_string();
                                    self.update_info();
                                }
                            }
                            let source_edit = ui.add(
                                egui::TextEdit::singleline(&mut self.source_path)
                                    .hint_text("Path to raw photos...")
                                    .desired_width(f32::INFINITY),
                            );
                            if source_edit.lost_focus() {
                                self.update_info();
                            }
                            ui.end_row();

                            let pick_dest = ui.add_enabled(
                                !self.is_running,
                                egui::Button::new("Select Dest Folder"),
                            );
                            if pick_dest.clicked() {
                                if let Some(path) = rfd::FileDialog::new().pick_folder() {
                                    self.dest_path = path.display().to_string();
                                }
                            }
                            ui.add(
                                egui::TextEdit::singleline(&mut self.dest_path)
                                    .hint_text("Optional (Defaults to 'converted' folder)")
                                    .desired_width(f32::INFINITY),
                            );
                            ui.end_row();
                        });
                });

            ui.add_space(5.0);
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(&self.info_message).weak());
            });
            ui.add(egui::ProgressBar::new(self.progress).show_percentage());

            let button_height = 50.0;
            let log_height = (ui.available_height() - button_height - 30.0).max(80.0);
            egui::Frame::none()
                .fill(egui::Color32::from_black_alpha(50))
                .inner_margin(8.0)
                .show(ui, |ui| {
                    egui::ScrollArea::vertical()
                        .max_height(log_height)
                        .auto_shrink([false, false])
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for line in &self.log {
                                ui.label(egui::RichText::new(line).monospace());
                            }
                        });
                });

            ui.add_space(10.0);
            let label = if self.is_running {
                "PROCESSING..."
            } else {
                "START CONVERSION"
            };
            let button = egui::Button::new(egui::RichText::new(label).size(16.0).strong())
                .min_size(egui::vec2(ui.available_width(), button_height));
            if ui.add_enabled(!self.is_running, button).clicked() {
                self.start_conversion(ctx);
            }
        });
    }
}

impl ConverterApp {
    fn update_info(&mut self) {
        let source = PathBuf::from(self.source_path.trim());
        self.info_message = if source.is_dir() {
            format!(
                "Found {} files in selected folder.",
                list_files(&source).len()
            )
        } else {
            "Invalid source folder.".to_string()
        };
    }

    fn drain_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            match message {
                WorkerMessage::Progress(event) => {
                    self.progress = event.stats.fraction() as f32;
                    self.info_message =
                        format!("Processing... {}%", (self.progress * 100.0) as u32);
                    self.log.push(report::render_event_line(&event));
                }
                WorkerMessage::Finished(stats) => {
                    self.log.push(String::new());
                    self.log.push("✅ DONE!".to_string());
                    self.log
                        .push(format!("Time: {}", format_elapsed(stats.elapsed())));
                    self.log.push(format!("Converted: {}", stats.converted));
                    self.log.push(format!("Copied: {}", stats.copied));
                    self.log.push(format!("Failed: {}", stats.failed));
                    self.info_message = "Processing Complete.".to_string();
                    self.progress = 1.0;
                    self.is_running = false;
                }
                WorkerMessage::Failed(reason) => {
                    self.log.push(format!("❌ {}", reason));
                    self.info_message = "Processing failed.".to_string();
                    self.is_running = false;
                }
            }
        }
    }

    fn start_conversion(&mut self, ctx: &egui::Context) {
        if self.is_running {
            return;
        }

        let source = self.source_path.trim();
        if source.is_empty() {
            self.info_message = "Please select a source folder.".to_string();
            return;
        }
        let source = PathBuf::from(source);
        let destination = match self.dest_path.trim() {
            "" => source.join(DEFAULT_DESTINATION),
            dest => PathBuf::from(dest),
        };

        let pipeline = Pipeline::new(source, destination);
        if let Err(e) = pipeline.preflight() {
            self.info_message = e.to_string();
            self.log.push(format!("❌ {}", e));
            return;
        }

        self.is_running = true;
        self.progress = 0.0;
        self.log.clear();
        info!(
            "Starting GUI conversion: {} -> {}",
            pipeline.source().display(),
            pipeline.destination().display()
        );

        let tx = self.tx.clone();
        let ctx = ctx.clone();

        thread::spawn(move || {
            let send = |message: WorkerMessage| {
                let _ = tx.send(message);
                ctx.request_repaint();
            };

            match pipeline.start() {
                Ok(mut conversion) => {
                    for event in conversion.by_ref() {
                        send(WorkerMessage::Progress(event));
                    }
                    send(WorkerMessage::Finished(conversion.stats()));
                }
                Err(e) => {
                    error!("Conversion failed: {:#}", e);
                    send(WorkerMessage::Failed(format!("{:#}", e)));
                }
            }
        });
    }
}
