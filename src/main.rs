use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::spawn;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use eframe::egui::{Align2, Button, Color32, Key, RichText, ScrollArea, Spinner, TextEdit, Ui, Vec2};
use eframe::{egui, App, AppCreator, CreationContext};

use fairjudge::choice::ChoiceList;
use fairjudge::config::Config;
use fairjudge::form::{Criterion, EvaluationForm, Field, SubmitStatus};
use fairjudge::roster::Roster;
use fairjudge::score::ScoreScale;
use fairjudge::{HttpPasswordGate, PasswordGate, ScoreSink, ScriptEndpoint};

use crate::egui::{Context, Visuals};

mod widgets;

struct FairJudgeApp {
    form: Arc<Mutex<EvaluationForm>>,
    pickers: HashMap<Field, ChoiceList>,
    gate: Arc<dyn PasswordGate>,
    sink: Arc<dyn ScoreSink>,
}

impl FairJudgeApp {
    pub fn new(form: EvaluationForm, gate: Arc<dyn PasswordGate>, sink: Arc<dyn ScoreSink>) -> Self {
        Self {
            form: Arc::new(Mutex::new(form)),
            pickers: HashMap::new(),
            gate,
            sink,
        }
    }

    /// Runs the password check and the dispatch on a worker thread and hands
    /// the outcome back to the form.
    fn launch(&self, ctx: &Context, form: &mut EvaluationForm) {
        let Some(pending) = form.begin_submit() else {
            return;
        };

        let form_arc = Arc::clone(&self.form);
        let gate = Arc::clone(&self.gate);
        let sink = Arc::clone(&self.sink);
        let ctx = ctx.clone();

        spawn(move || {
            let outcome = pending.run(gate.as_ref(), sink.as_ref());

            let mut form = form_arc.lock().unwrap_or_else(PoisonError::into_inner);
            form.finish_submit(outcome, Instant::now());
            drop(form);

            ctx.request_repaint();
        });
    }

    fn choice_row(&mut self, ui: &mut Ui, form: &mut EvaluationForm, field: Field) {
        let picker = self
            .pickers
            .entry(field)
            .or_insert_with(|| ChoiceList::new(Vec::new()));
        picker.set_candidates(form.candidates(field));

        let changed = widgets::choice_field(ui, field, field.label(), hint(field), form.value(field), picker);
        if let Some(value) = changed {
            form.set_field(field, &value);
        }
    }

    /// Paints the whole form. Returns whether the submit button was clicked.
    fn paint(&mut self, ctx: &Context, form: &mut EvaluationForm) -> bool {
        let mut submit = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("Evaluation form");
                    ui.label("Science fair project evaluation");
                });
                ui.separator();

                self.choice_row(ui, form, Field::Email);
                ui.add_space(8.0);
                self.choice_row(ui, form, Field::JudgeName);
                ui.add_space(8.0);

                let toggle = if form.show_all_projects {
                    "Show ONLY the projects assigned to you"
                } else {
                    "Show ALL projects"
                };
                if ui.link(toggle).clicked() {
                    form.show_all_projects = !form.show_all_projects;
                }

                self.choice_row(ui, form, Field::Title);

                if !form.show_all_projects {
                    if let Some(judge) = form.selected_judge() {
                        let count = form.visible_projects().len();
                        let text = format!("Showing {count} projects assigned to {}", judge.display_name());
                        ui.label(RichText::new(text).small().weak());
                    }
                }

                if form.project_has_remarks() {
                    ui.label(
                        RichText::new("The organisers hold remarks about this team. Ask them before scoring.")
                            .small()
                            .color(Color32::LIGHT_RED),
                    );
                }

                ui.add_space(8.0);
                self.choice_row(ui, form, Field::Team);
                ui.separator();

                for criterion in Criterion::ALL {
                    let changed = widgets::score_field(ui, criterion.label(), form.score(criterion), form.scale());
                    if let Some(value) = changed {
                        form.set_score(criterion, &value);
                    }
                    ui.add_space(6.0);
                }

                ui.horizontal(|ui| {
                    ui.label("Final score:");
                    ui.label(RichText::new(form.total().to_string()).color(Color32::LIGHT_GREEN));
                });
                ui.separator();

                ui.label(RichText::new("Additional remarks").strong());
                ui.add(
                    TextEdit::multiline(&mut form.remarks)
                        .desired_rows(4)
                        .desired_width(f32::INFINITY)
                        .hint_text("Absent students, notes about the presentation, etc."),
                );

                ui.label(RichText::new("Password").strong());
                ui.label(
                    RichText::new("Use the password the organisers sent you to submit")
                        .small()
                        .color(Color32::LIGHT_RED),
                );
                ui.add(
                    TextEdit::singleline(&mut form.password)
                        .password(true)
                        .hint_text("Password")
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(8.0);

                let submitting = form.status() == SubmitStatus::Submitting;
                ui.horizontal(|ui| {
                    let label = if submitting { "Sending..." } else { "Submit evaluation" };
                    if ui.add_enabled(!submitting, Button::new(label)).clicked() {
                        submit = true;
                    }
                    if submitting {
                        ui.add(Spinner::new());
                    }
                });

                match form.status() {
                    SubmitStatus::Success(_) => {
                        ui.label(RichText::new("Evaluation sent!").color(Color32::LIGHT_GREEN));
                    }
                    SubmitStatus::Error(_) => {
                        ui.label(
                            RichText::new("Error sending the evaluation. Please try again.")
                                .color(Color32::LIGHT_RED),
                        );
                    }
                    SubmitStatus::Idle | SubmitStatus::Submitting => {}
                }
            });
        });

        if let Some(notice) = form.notice().map(str::to_string) {
            let mut dismissed = ctx.input(|i| i.key_pressed(Key::Escape));

            egui::Window::new("Alert")
                .collapsible(false)
                .resizable(false)
                .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(notice);
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });

            if dismissed {
                form.dismiss_notice();
            }
        }

        submit
    }
}

impl App for FairJudgeApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let form_arc = Arc::clone(&self.form);
        let mut form = form_arc.lock().unwrap_or_else(PoisonError::into_inner);

        form.tick(Instant::now());

        if self.paint(ctx, &mut form) {
            self.launch(ctx, &mut form);
        }

        // keep repainting until the banner has faded
        if matches!(form.status(), SubmitStatus::Success(_) | SubmitStatus::Error(_)) {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

fn hint(field: Field) -> &'static str {
    match field {
        Field::Email => "your.name@email.com",
        Field::JudgeName => "Select or type your name",
        Field::Title => "Select or type the title",
        Field::Team => "E.g. G1, G2",
    }
}

fn create_app(cc: &CreationContext<'_>, app: FairJudgeApp) -> Box<dyn App> {
    cc.egui_ctx.set_visuals(Visuals::dark());
    Box::new(app)
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load()?;
    let roster = Roster::load(&config.roster_path)
        .with_context(|| format!("cannot load roster from {}", config.roster_path.display()))?;
    let scale = ScoreScale::new(config.max_score)?;

    log::info!(
        "loaded {} judges and {} projects",
        roster.judges.len(),
        roster.projects.len()
    );

    let gate: Arc<dyn PasswordGate> = Arc::new(HttpPasswordGate::new(config.validate_url.clone()));
    let sink: Arc<dyn ScoreSink> = Arc::new(ScriptEndpoint::new(config.script_url()));
    let app = FairJudgeApp::new(EvaluationForm::new(roster, scale), gate, sink);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Science fair evaluation")
            .with_inner_size([560.0, 900.0]),
        ..Default::default()
    };

    let app_name = "fairjudge";
    let app_creator: AppCreator = Box::new(|ctx| create_app(ctx, app));
    eframe::run_native(app_name, native_options, app_creator)
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;

    Ok(())
}
