use eframe::egui::{self, Color32};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points};
use log::{error, info};

use plasma_trajectories::constants::{
    DEFAULT_HISTOGRAM_BINS, DEFAULT_HISTOGRAM_SAMPLES, DEFAULT_MAGNETIC_FIELD, DEFAULT_NUM_PARTICLES,
    DEFAULT_NUM_STEPS, DEFAULT_TEMPERATURE,
};
use plasma_trajectories::{
    Histogram, PlasmaConstants, RunOptions, Session, SimulationError, SimulationParameters, SimulationResult,
    gaussian_pdf,
};

// ===================================================================================
// Text entries
// ===================================================================================

/// Raw contents of the four entry fields; parsed only when "Simulate" is pressed.
struct Inputs {
    temperature: String,
    particles: String,
    steps: String,
    magnetic_field: String,
}

impl Default for Inputs {
    fn default() -> Self {
        Inputs {
            temperature: format!("{DEFAULT_TEMPERATURE:e}"),
            particles: DEFAULT_NUM_PARTICLES.to_string(),
            steps: DEFAULT_NUM_STEPS.to_string(),
            magnetic_field: DEFAULT_MAGNETIC_FIELD.to_string(),
        }
    }
}

enum Message {
    Info(String),
    Warning(String),
    Error(String),
}

/// Plot-ready copy of the Gaussian histogram view.
struct HistogramView {
    bars: Vec<(f64, f64)>,
    bin_width: f64,
    pdf: Vec<[f64; 2]>,
}

impl HistogramView {
    fn new(hist: &Histogram, mean: f64) -> Self {
        let midpoints = hist.midpoints();
        HistogramView {
            bars: midpoints.iter().copied().zip(hist.density.iter().copied()).collect(),
            bin_width: hist.bin_width(),
            pdf: midpoints.iter().map(|&m| [m, gaussian_pdf(m, mean, 1.0)]).collect(),
        }
    }
}

/// Trajectories and initial velocities converted to plot points once per run.
///
/// `Line` and `Points` only accept an owned series in egui_plot 0.30, so each
/// frame copies these slices verbatim instead of rebuilding them from the
/// result.
#[derive(Default)]
struct PlotSeries {
    trajectories: Vec<Vec<PlotPoint>>,
    velocities: Vec<PlotPoint>,
}

impl PlotSeries {
    fn from_result(result: &SimulationResult) -> Self {
        PlotSeries {
            trajectories: result
                .trajectories
                .iter()
                .map(|t| t.x.iter().zip(&t.y).map(|(&x, &y)| PlotPoint::new(x, y)).collect())
                .collect(),
            velocities: result.velocities.iter().map(|p| PlotPoint::new(p.vx, p.vy)).collect(),
        }
    }

    fn trajectory_lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.trajectories
            .iter()
            .map(|points| Line::new(PlotPoints::Owned(points.to_vec())))
    }

    fn velocity_points(&self) -> Points {
        Points::new(PlotPoints::Owned(self.velocities.to_vec())).radius(1.0)
    }
}

// ===================================================================================
// Main Application
// ===================================================================================

/// Entry fields and buttons on the left, trajectories in the centre, and two
/// optional windows for the velocity scatter and the sampling histogram.
pub struct PlasmaApp {
    inputs: Inputs,
    session: Session,

    // -------------- Plot data from the last run --------------
    series: PlotSeries,
    histogram: Option<HistogramView>,

    show_velocities: bool,
    show_histogram: bool,
    messages: Vec<Message>,
}

impl PlasmaApp {
    pub fn new(options: RunOptions) -> Self {
        Self {
            inputs: Inputs::default(),
            session: Session::new(PlasmaConstants::default(), options),
            series: PlotSeries::default(),
            histogram: None,
            show_velocities: false,
            show_histogram: false,
            messages: vec![],
        }
    }

    fn simulate(&mut self) {
        self.messages.clear();
        let params = match SimulationParameters::from_inputs(
            &self.inputs.temperature,
            &self.inputs.particles,
            &self.inputs.steps,
            &self.inputs.magnetic_field,
        ) {
            Ok(params) => params,
            Err(e) => return self.report(e),
        };

        match self.session.run(&params) {
            Ok(result) => {
                let d = result.derived;
                self.messages.push(Message::Info(d.collision_frequency_label()));
                self.messages.push(Message::Info(d.cyclotron_frequency_label()));
                self.messages.push(Message::Info(d.larmor_radius_label()));
                self.series = PlotSeries::from_result(result);
                self.histogram = None;
                info!("plotted {} trajectories", self.series.trajectories.len());
            }
            Err(e) => self.report(e),
        }
    }

    fn open_velocities(&mut self) {
        match self.session.velocity_distribution() {
            Ok(_) => self.show_velocities = true,
            Err(e) => self.report(e),
        }
    }

    fn open_histogram(&mut self) {
        let mean = match self.session.last_result() {
            Ok(result) => result.derived.thermal_velocity,
            Err(e) => return self.report(e),
        };
        match self.session.gaussian_histogram(DEFAULT_HISTOGRAM_SAMPLES, DEFAULT_HISTOGRAM_BINS) {
            Ok(hist) => {
                self.histogram = Some(HistogramView::new(&hist, mean));
                self.show_histogram = true;
            }
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, e: SimulationError) {
        match e {
            SimulationError::StateNotReady => {
                self.messages.push(Message::Warning("Run the trajectory simulation first.".into()))
            }
            other => {
                error!("{other}");
                self.messages.push(Message::Error(other.to_string()));
            }
        }
    }
}

impl eframe::App for PlasmaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // --------------------------
        // Sidebar with entries and buttons
        // --------------------------
        egui::SidePanel::left("config_panel").show(ctx, |ui| {
            ui.heading("Simulation Controls");

            ui.label("Temperature (K):");
            ui.text_edit_singleline(&mut self.inputs.temperature);
            ui.label("Number of particles:");
            ui.text_edit_singleline(&mut self.inputs.particles);
            ui.label("Number of collisions:");
            ui.text_edit_singleline(&mut self.inputs.steps);
            ui.label("Magnetic field B0 (T):");
            ui.text_edit_singleline(&mut self.inputs.magnetic_field);

            ui.separator();

            if ui.button("Simulate trajectories").clicked() {
                self.simulate();
            }
            if ui.button("Show velocity distribution").clicked() {
                self.open_velocities();
            }
            if ui.button("Show Gaussian histogram").clicked() {
                self.open_histogram();
            }

            ui.separator();

            for message in &self.messages {
                match message {
                    Message::Info(text) => ui.label(text.as_str()),
                    Message::Warning(text) => ui.colored_label(Color32::YELLOW, text.as_str()),
                    Message::Error(text) => ui.colored_label(Color32::RED, text.as_str()),
                };
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Trajectories with collisions");
            Plot::new("trajectories")
                .x_axis_label("x (m)")
                .y_axis_label("y (m)")
                .show(ui, |plot_ui| {
                    for line in self.series.trajectory_lines() {
                        plot_ui.line(line);
                    }
                });
        });

        egui::Window::new("Velocity distribution")
            .open(&mut self.show_velocities)
            .default_size([500.0, 450.0])
            .show(ctx, |ui| {
                ui.label("Initial velocities");
                Plot::new("velocity_scatter")
                    .x_axis_label("v0x")
                    .y_axis_label("v0y")
                    .data_aspect(1.0)
                    .show(ui, |plot_ui| {
                        plot_ui.points(self.series.velocity_points());
                    });
            });

        if let Some(view) = &self.histogram {
            egui::Window::new("Gaussian histogram")
                .open(&mut self.show_histogram)
                .default_size([650.0, 420.0])
                .show(ctx, |ui| {
                    ui.label("Inverse transform method - Gaussian");
                    Plot::new("gaussian_histogram")
                        .legend(Legend::default())
                        .x_axis_label("x")
                        .y_axis_label("P(x)")
                        .show(ui, |plot_ui| {
                            let bars = view
                                .bars
                                .iter()
                                .map(|&(x, h)| Bar::new(x, h).width(view.bin_width))
                                .collect();
                            plot_ui.bar_chart(BarChart::new(bars).name("Histogram"));
                            plot_ui.line(
                                Line::new(PlotPoints::from(view.pdf.clone()))
                                    .name("Theoretical distribution")
                                    .width(2.0),
                            );
                        });
                });
        }
    }
}
