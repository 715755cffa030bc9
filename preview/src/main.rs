//! Desktop preview app for myrtio-face-animator
//!
//! Renders the face matrix in a window with interactive controls.
//! Every change goes through the same textual commands a device receives.

use std::time::Instant as StdInstant;

use eframe::egui::{self};
use myrtio_face_animator::eyes::{BLUSH_COLOR_ATTRIBUTE, IRIS_ATTRIBUTE, OUTER_COLOR_ATTRIBUTE};
use myrtio_face_animator::{
    ElementId, Emotion, Eyes, FrameScheduler, Instant, OutputDriver, Rgb, SharedServer,
};

/// Matrix size
const MATRIX_WIDTH: usize = 32;
const MATRIX_HEIGHT: usize = 16;

const MAX_ELEMENTS: usize = 8;
const MAX_LINKS: usize = 16;

/// Size of each LED rectangle in pixels
const LED_SIZE: f32 = 16.0;

/// Gap between LEDs
const LED_GAP: f32 = 2.0;

/// Easing distance used for slider driven changes
const SLIDER_EASING: f32 = 0.3;

/// Color fade rate used for color pickers
const COLOR_FADE_RATE: f32 = 4.0;

const FACE: ElementId = ElementId::new(1, 0);

/// Static server shared between the UI and the frame loop
static SERVER: SharedServer<MAX_ELEMENTS, MAX_LINKS> = SharedServer::new();

/// Keeps a copy of the last presented frame
#[derive(Default)]
struct PreviewDriver {
    pixels: Vec<Rgb>,
}

impl OutputDriver for PreviewDriver {
    fn write(&mut self, pixels: &[Rgb]) {
        self.pixels.clear();
        self.pixels.extend_from_slice(pixels);
    }
}

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_title("Face Animator Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "myrtio-face-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()))),
    )
}

struct PreviewApp {
    scheduler: FrameScheduler<'static, PreviewDriver, MATRIX_WIDTH, MATRIX_HEIGHT, MAX_ELEMENTS, MAX_LINKS>,

    // UI state (tracked to detect changes and send commands)
    /// Synthetic time in milliseconds
    t_ms: u64,
    /// Wall-clock reference for delta time
    last_frame: StdInstant,
    /// Whether animation is playing
    playing: bool,
    /// Time scale multiplier (1.0 = realtime)
    time_scale: f32,
    /// LED pixel size for display
    led_size: f32,
    /// Whether slider changes are eased
    smooth: bool,
    /// Emotion weights in [`Emotion::ALL`] order
    emotions: [f32; 5],
    /// Iris column
    iris: f32,
    /// Eye color (RGB)
    outer_color: [u8; 3],
    /// Blush color (RGBA)
    blush_color: [u8; 4],
}

impl PreviewApp {
    fn new() -> Self {
        let eyes = Eyes::default();
        let iris = eyes.iris_position();
        if SERVER.insert(FACE, 0, eyes).is_err() {
            eprintln!("failed to register the eyes element");
        }

        Self {
            scheduler: FrameScheduler::new(&SERVER, PreviewDriver::default()),
            t_ms: 0,
            last_frame: StdInstant::now(),
            playing: true,
            time_scale: 1.0,
            led_size: LED_SIZE,
            smooth: true,
            emotions: [0.0; 5],
            iris,
            outer_color: [0x99, 0x00, 0xAA],
            blush_color: [0xFF, 0x60, 0xA0, 0xFF],
        }
    }

    /// Send a float change command
    ///
    /// Smooth changes drive the attribute through an eased constant link,
    /// later plain values only move that link's target.
    fn send_float(&self, attribute: u16, value: f32) {
        let payload = if self.smooth {
            format!(
                "S{}M{}V{attribute:X} {value} 1 {SLIDER_EASING} 0",
                FACE.set_id, FACE.module_id
            )
        } else {
            format!("S{}M{}V{attribute:X} {value}", FACE.set_id, FACE.module_id)
        };
        SERVER.parse_command("SET", &payload);
    }

    /// Send a color change command, `argb` is `AARRGGBB`
    fn send_color(&self, attribute: u16, argb: u32) {
        let payload = if self.smooth {
            format!(
                "S{}M{}V{attribute:X} {argb:08X} {COLOR_FADE_RATE}",
                FACE.set_id, FACE.module_id
            )
        } else {
            format!("S{}M{}V{attribute:X} {argb:08X}", FACE.set_id, FACE.module_id)
        };
        SERVER.parse_command("CSET", &payload);
    }

    /// Reset time to zero
    fn reset_time(&mut self) {
        self.t_ms = 0;
        self.last_frame = StdInstant::now();
    }

    /// Toggle playing state
    fn toggle_playing(&mut self) {
        self.playing = !self.playing;
    }

    /// Update synthetic time based on wall clock and time scale
    fn update_time(&mut self) {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        if self.playing {
            let delta_ms_f64 = delta.as_secs_f64() * 1000.0 * f64::from(self.time_scale);
            let delta_ms_f64 = if delta_ms_f64.is_finite() {
                #[allow(clippy::cast_precision_loss)]
                delta_ms_f64.clamp(0.0, u64::MAX as f64)
            } else {
                0.0
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let delta_ms = delta_ms_f64 as u64;
            self.t_ms = self.t_ms.wrapping_add(delta_ms);
        }
    }
}

fn argb(rgb: [u8; 3], alpha: u8) -> u32 {
    u32::from_be_bytes([alpha, rgb[0], rgb[1], rgb[2]])
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Update synthetic time
        self.update_time();

        // Render the frame using synthetic time
        self.scheduler.tick(Instant::from_millis(self.t_ms));
        let frame = self.scheduler.output().pixels.clone();

        // Request continuous repaint for animation
        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                // <PlaybackControls>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        if ui.button("⏮ Reset").clicked() {
                            self.reset_time();
                        }
                        if ui
                            .button(if self.playing { "⏸ Pause" } else { "▶ Play" })
                            .clicked()
                        {
                            self.toggle_playing();
                        }
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        let secs = self.t_ms / 1000;
                        let ms = self.t_ms % 1000;
                        ui.label(format!("Time: {secs}.{ms:03}s"));
                        ui.label(format!("Clock: {:.2}", SERVER.clock()));
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        ui.label("Speed:");
                        ui.add(egui::Slider::new(&mut self.time_scale, 0.1..=5.0).logarithmic(true));
                    });

                    ui.horizontal(|ui| {
                        ui.label("Size: ");
                        ui.add(egui::Slider::new(&mut self.led_size, 4.0..=32.0));
                    });
                });
                // </PlaybackControls>
                ui.add_space(16.0);
                // <FaceControls>
                ui.vertical(|ui| {
                    ui.checkbox(&mut self.smooth, "Smooth changes");

                    for emotion in Emotion::ALL {
                        ui.horizontal(|ui| {
                            ui.label(emotion.as_str());
                            let weight = &mut self.emotions[emotion.index()];
                            let old_weight = *weight;
                            ui.add(egui::Slider::new(weight, 0.0..=1.0));
                            let weight = *weight;
                            #[allow(clippy::float_cmp)]
                            if weight != old_weight {
                                self.send_float(emotion.attribute(), weight);
                            }
                        });
                    }

                    ui.horizontal(|ui| {
                        ui.label("iris");
                        let old_iris = self.iris;
                        ui.add(egui::Slider::new(&mut self.iris, -1.0..=11.0));
                        #[allow(clippy::float_cmp)]
                        if self.iris != old_iris {
                            self.send_float(IRIS_ATTRIBUTE, self.iris);
                        }
                    });
                });
                // </FaceControls>
                ui.add_space(16.0);
                // <ColorControls>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label("Eyes:");
                        if ui.color_edit_button_srgb(&mut self.outer_color).changed() {
                            self.send_color(
                                OUTER_COLOR_ATTRIBUTE,
                                argb(self.outer_color, 0xFF),
                            );
                        }
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        ui.label("Blush:");
                        if ui
                            .color_edit_button_srgba_unmultiplied(&mut self.blush_color)
                            .changed()
                        {
                            let [r, g, b, a] = self.blush_color;
                            self.send_color(
                                BLUSH_COLOR_ATTRIBUTE,
                                argb([r, g, b], a),
                            );
                        }
                    });
                });
                // </ColorControls>
            });

            ui.add_space(16.0);

            // === Matrix Display ===
            let led_pitch = self.led_size + LED_GAP;
            #[allow(clippy::cast_precision_loss)]
            let size = egui::vec2(
                MATRIX_WIDTH as f32 * led_pitch,
                MATRIX_HEIGHT as f32 * led_pitch,
            );
            let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
            let origin = response.rect.min;

            #[allow(clippy::cast_precision_loss)]
            for (i, pixel) in frame.iter().enumerate() {
                let row = i / MATRIX_WIDTH;
                let col = i % MATRIX_WIDTH;
                let x = origin.x + col as f32 * led_pitch;
                let y = origin.y + row as f32 * led_pitch;

                let rect = egui::Rect::from_min_size(
                    egui::pos2(x, y),
                    egui::vec2(self.led_size, self.led_size),
                );
                let color = egui::Color32::from_rgb(pixel.r, pixel.g, pixel.b);
                painter.rect_filled(rect, 3.0, color);
            }
        });
    }
}
