// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use eframe::egui;
use std::collections::HashSet;
use std::path::PathBuf;

use vizquest::{
    ColumnProfile, DatasetSummary, ErrorReporter, FollowUpQuestion, ObservationsPerGroup,
    ProfilingConfig, QuestionnaireSession, Recommendation, Relation, RenderingContext,
    VariableOrdering, VisualizationPurpose, VizQuestError, VizQuestSystem,
};
use vizquest::{DatasetProfiler, GroupCount};

fn main() -> std::result::Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_title("VizQuest Studio"),
        ..Default::default()
    };
    eframe::run_native(
        "VizQuest Studio",
        options,
        Box::new(|_cc| Ok(Box::new(StudioApp::new()))),
    )
}

#[derive(Debug, Clone, PartialEq)]
enum ActiveTab {
    Summary,
    Questionnaire,
    Profiles,
}

struct StudioApp {
    system: Option<VizQuestSystem>,
    selected_file: Option<PathBuf>,
    profiles: Vec<ColumnProfile>,
    dataset_summary: Option<DatasetSummary>,
    selected_columns: HashSet<String>,
    session: Option<QuestionnaireSession>,
    recommendation: Option<Recommendation>,
    profiling_config: ProfilingConfig,
    active_tab: ActiveTab,
    show_config: bool,
    error_message: Option<String>,
    error_reporter: ErrorReporter,
}

impl StudioApp {
    fn new() -> Self {
        let catalog_paths = [
            "config/chart_catalog.yml",
            "crates/vizquest/config/chart_catalog.yml",
            "../../crates/vizquest/config/chart_catalog.yml",
        ];
        let system = catalog_paths
            .iter()
            .find_map(|path| VizQuestSystem::with_config(path, ProfilingConfig::default()).ok());
        if system.is_none() {
            eprintln!("Failed to load chart catalog from any of the following paths:");
            for path in &catalog_paths {
                eprintln!("- {path}");
            }
        }
        Self {
            system,
            selected_file: None,
            profiles: Vec::new(),
            dataset_summary: None,
            selected_columns: HashSet::new(),
            session: None,
            recommendation: None,
            profiling_config: ProfilingConfig::default(),
            active_tab: ActiveTab::Summary,
            show_config: false,
            error_message: None,
            error_reporter: ErrorReporter::new(),
        }
    }

    fn process_file(&mut self, file_path: PathBuf) {
        self.error_message = None;
        self.profiles.clear();
        self.dataset_summary = None;
        self.selected_columns.clear();
        self.session = None;
        self.recommendation = None;

        let profiler = DatasetProfiler::with_config(self.profiling_config.clone());
        match profiler.profile_csv(&file_path) {
            Ok(profiles) => {
                tracing::info!(path = %file_path.display(), columns = profiles.len(), "dataset profiled");
                self.dataset_summary = Some(profiler.get_dataset_summary(&profiles));
                self.profiles = profiles;
                self.selected_file = Some(file_path);
                self.active_tab = ActiveTab::Questionnaire;
            }
            Err(e) => {
                let error = VizQuestError::from(e);
                self.error_message = Some(self.error_reporter.report(&error));
            }
        }
    }

    fn rebuild_session(&mut self) {
        self.recommendation = None;
        let Some(summary) = &self.dataset_summary else {
            self.session = None;
            return;
        };
        let selection: Vec<&ColumnProfile> = self
            .profiles
            .iter()
            .filter(|p| self.selected_columns.contains(&p.name))
            .collect();
        self.session = QuestionnaireSession::new(summary.size, &selection).ok();
    }

    fn run_recommendation(&mut self) {
        self.recommendation = None;
        self.error_message = None;
        let (Some(system), Some(session)) = (&self.system, &self.session) else {
            return;
        };
        let result = session
            .submission()
            .map_err(VizQuestError::from)
            .and_then(|submission| system.recommend(&submission));
        match result {
            Ok(recommendation) => self.recommendation = Some(recommendation),
            Err(e) => self.error_message = Some(self.error_reporter.report(&e)),
        }
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("VizQuest Studio");
                ui.separator();
                if ui.button("Select CSV File").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("CSV files", &["csv"])
                        .pick_file()
                    {
                        self.process_file(path);
                    }
                }
                if let Some(ref path) = self.selected_file {
                    ui.label(format!("File: {}", path.display()));
                }
            });
        });

        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Columns: {}", self.profiles.len()));
                ui.label(format!("Selected: {}", self.selected_columns.len()));
                if let Some(ref summary) = self.dataset_summary {
                    ui.label(format!("Records: {}", summary.record_count));
                    ui.label(format!("Size: {}", summary.size));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.toggle_value(&mut self.show_config, "Config");
                });
            });
        });

        if self.show_config {
            egui::SidePanel::left("config_panel").show(ctx, |ui| {
                ui.heading("Configuration");
                ui.collapsing("Data Profiling", |ui| {
                    ui.label("Max categorical cardinality:");
                    ui.add(egui::Slider::new(
                        &mut self.profiling_config.max_categorical_cardinality,
                        10..=100,
                    ));
                    ui.label("Max sample values:");
                    ui.add(egui::Slider::new(
                        &mut self.profiling_config.max_sample_values,
                        5..=100,
                    ));
                    ui.label("Numeric confidence threshold:");
                    ui.add(egui::Slider::new(
                        &mut self.profiling_config.numeric_confidence_threshold,
                        0.0..=1.0,
                    ));
                    ui.label("Temporal confidence threshold:");
                    ui.add(egui::Slider::new(
                        &mut self.profiling_config.temporal_confidence_threshold,
                        0.0..=1.0,
                    ));
                });
                if ui.button("Reset to Defaults").clicked() {
                    self.profiling_config = ProfilingConfig::default();
                }
                ui.label("Changes apply the next time a file is loaded.");
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(ref error) = self.error_message {
                ui.colored_label(egui::Color32::RED, "Error:");
                ui.separator();
                ui.monospace(error);
                ui.separator();
            }

            if self.profiles.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Welcome to VizQuest Studio");
                });
                return;
            }

            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.active_tab, ActiveTab::Summary, "Summary");
                ui.selectable_value(
                    &mut self.active_tab,
                    ActiveTab::Questionnaire,
                    "Questionnaire",
                );
                ui.selectable_value(&mut self.active_tab, ActiveTab::Profiles, "Data Profiles");
            });
            ui.separator();

            match self.active_tab {
                ActiveTab::Summary => self.render_summary_tab(ui),
                ActiveTab::Questionnaire => self.render_questionnaire_tab(ui),
                ActiveTab::Profiles => self.render_profiles_tab(ui),
            }
        });
    }
}

impl StudioApp {
    fn render_summary_tab(&self, ui: &mut egui::Ui) {
        if let Some(ref summary) = self.dataset_summary {
            ui.heading("Dataset Summary");
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.strong("Columns");
                    ui.label(format!("Total: {}", summary.total_columns));
                    ui.label(format!("Numeric: {}", summary.numeric_count));
                    ui.label(format!("Categorical: {}", summary.categorical_count));
                    ui.label(format!("Temporal: {}", summary.temporal_count));
                });
                ui.separator();
                ui.vertical(|ui| {
                    ui.strong("Records");
                    ui.label(format!("Count: {}", summary.record_count));
                    ui.label(format!("Size class: {}", summary.size));
                    ui.label(format!("Issues: {}", summary.total_issues));
                });
            });
        }
        if let Some(ref system) = self.system {
            ui.separator();
            ui.heading("Chart Catalog");
            ui.monospace(system.catalog().stats().summary());
        }
    }

    fn render_questionnaire_tab(&mut self, ui: &mut egui::Ui) {
        ui.heading("Variables");
        let mut selection_changed = false;
        egui::ScrollArea::vertical()
            .id_salt("variables")
            .max_height(140.0)
            .show(ui, |ui| {
                for profile in &self.profiles {
                    let mut checked = self.selected_columns.contains(&profile.name);
                    if ui
                        .checkbox(
                            &mut checked,
                            format!("{} ({:?})", profile.name, profile.column_type),
                        )
                        .changed()
                    {
                        if checked {
                            self.selected_columns.insert(profile.name.clone());
                        } else {
                            self.selected_columns.remove(&profile.name);
                        }
                        selection_changed = true;
                    }
                }
            });
        if selection_changed {
            self.rebuild_session();
        }

        let Some(session) = self.session.as_mut() else {
            ui.separator();
            ui.label("Select at least one variable to start the questionnaire.");
            return;
        };

        ui.separator();
        let answers = session.answers();
        ui.horizontal(|ui| {
            ui.strong("Detected:");
            ui.label(format!("{}", answers.data_kind));
            ui.separator();
            ui.label(format!("{}", answers.dimensionality));
        });

        let mut answers_changed = false;
        for question in session.active_questions() {
            match question {
                FollowUpQuestion::VariableOrdering => {
                    let mut value = session.answers().ordering;
                    egui::ComboBox::from_label("Is any variable ordered?")
                        .selected_text(format!("{value:?}"))
                        .show_ui(ui, |ui| {
                            for option in [
                                VariableOrdering::Yes,
                                VariableOrdering::No,
                                VariableOrdering::NotApplicable,
                            ] {
                                ui.selectable_value(&mut value, option, format!("{option:?}"));
                            }
                        });
                    if value != session.answers().ordering {
                        session.set_ordering(value);
                        answers_changed = true;
                    }
                }
                FollowUpQuestion::Relation => {
                    let mut value = session.answers().relation;
                    egui::ComboBox::from_label("Relation between variables?")
                        .selected_text(format!("{value:?}"))
                        .show_ui(ui, |ui| {
                            for option in [
                                Relation::Independent,
                                Relation::Nested,
                                Relation::Subgroup,
                                Relation::Adjacency,
                                Relation::NotApplicable,
                            ] {
                                ui.selectable_value(&mut value, option, format!("{option:?}"));
                            }
                        });
                    if value != session.answers().relation {
                        session.set_relation(value);
                        answers_changed = true;
                    }
                }
                FollowUpQuestion::ObservationsPerGroup => {
                    let mut value = session.answers().observations;
                    egui::ComboBox::from_label("One or more observations per group?")
                        .selected_text(format!("{value:?}"))
                        .show_ui(ui, |ui| {
                            for option in [
                                ObservationsPerGroup::One,
                                ObservationsPerGroup::Several,
                                ObservationsPerGroup::NotApplicable,
                            ] {
                                ui.selectable_value(&mut value, option, format!("{option:?}"));
                            }
                        });
                    if value != session.answers().observations {
                        session.set_observations(value);
                        answers_changed = true;
                    }
                }
                FollowUpQuestion::GroupCount => {
                    let mut value = session.group_count();
                    egui::ComboBox::from_label("Do you foresee a high number of groups?")
                        .selected_text(format!("{value:?}"))
                        .show_ui(ui, |ui| {
                            for option in
                                [GroupCount::High, GroupCount::Low, GroupCount::NotApplicable]
                            {
                                ui.selectable_value(&mut value, option, format!("{option:?}"));
                            }
                        });
                    if value != session.group_count() {
                        session.set_group_count(value);
                        answers_changed = true;
                    }
                }
            }
        }
        if answers_changed {
            self.recommendation = None;
        }

        ui.separator();
        ui.strong("Visualization purpose");
        let eligible = session.eligible_purposes();
        let current_purpose = session.purpose();
        ui.horizontal_wrapped(|ui| {
            for purpose in VisualizationPurpose::ALL {
                let enabled = eligible.contains(purpose);
                let selected = current_purpose == Some(purpose);
                let response = ui.add_enabled(
                    enabled,
                    egui::RadioButton::new(selected, purpose.to_string()),
                );
                if response.clicked() && session.choose_purpose(purpose).is_ok() {
                    self.recommendation = None;
                }
            }
        });

        ui.separator();
        let mut context = session.context();
        egui::ComboBox::from_label("Rendering context")
            .selected_text(
                context
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "Choose...".to_string()),
            )
            .show_ui(ui, |ui| {
                for option in RenderingContext::ALL {
                    ui.selectable_value(&mut context, Some(option), option.to_string());
                }
            });
        if let Some(context) = context {
            if session.context() != Some(context) {
                session.choose_context(context);
                self.recommendation = None;
            }
        }

        ui.separator();
        let ready = session.purpose().is_some() && session.context().is_some();
        if !ready {
            ui.colored_label(
                egui::Color32::LIGHT_RED,
                "Choose a purpose and a context to get a recommendation.",
            );
        }
        ui.horizontal(|ui| {
            if ui
                .add_enabled(ready, egui::Button::new("Recommend chart"))
                .clicked()
            {
                self.run_recommendation();
            }
            if let Some(session) = &self.session {
                if ready {
                    if ui.button("Copy submission JSON").clicked() {
                        if let Ok(json) =
                            session.submission().map(|s| s.export_json().ok())
                        {
                            if let Some(json) = json {
                                ui.ctx().copy_text(json);
                            }
                        }
                    }
                }
            }
        });

        if let Some(ref recommendation) = self.recommendation {
            ui.separator();
            ui.group(|ui| {
                ui.strong(format!("Recommended: {}", recommendation.kind));
                ui.label(&recommendation.description);
                if !recommendation.tags.is_empty() {
                    ui.label(format!("Tags: {}", recommendation.tags.join(", ")));
                }
            });
        }
    }

    fn render_profiles_tab(&self, ui: &mut egui::Ui) {
        ui.heading("Data Profiles");
        egui::ScrollArea::vertical().show(ui, |ui| {
            for (i, profile) in self.profiles.iter().enumerate() {
                ui.push_id(i, |ui| {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            ui.strong(&profile.name);
                            ui.label(format!("({:?})", profile.column_type));
                            ui.label(format!(
                                "confidence {:.0}%",
                                profile.type_confidence * 100.0
                            ));
                        });
                        ui.horizontal(|ui| {
                            ui.label(format!("Count: {}", profile.total_count));
                            ui.label(format!("Null: {:.1}%", profile.null_percentage * 100.0));
                            if let Some(cardinality) = profile.cardinality {
                                ui.label(format!("Unique: {cardinality}"));
                            }
                        });
                        if !profile.sample_values.is_empty() {
                            egui::CollapsingHeader::new("Samples")
                                .id_salt(format!("samples_{i}"))
                                .show(ui, |ui| {
                                    ui.monospace(profile.sample_values.join(", "));
                                });
                        }
                        for issue in &profile.issues {
                            ui.colored_label(egui::Color32::YELLOW, issue);
                        }
                    });
                });
                ui.separator();
            }
        });
    }
}
