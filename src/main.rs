use iced::widget::{button, column, container, image, text, Column};
use iced::{Alignment, Length};
use iced::{Element, Task, Theme};
use rfd::FileDialog;
use std::sync::Arc;

mod analysis;
mod config;
mod error;
mod state;
mod verdict;
mod vision;

use analysis::Analysis;
use config::Settings;
use error::AnalysisError;
use state::screen::Screen;
use vision::Classifier;

/// Extensions offered in the photo picker
const PHOTO_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff"];

/// Main application state
struct SeaFood {
    settings: Settings,
    /// Loaded once at startup, shared with every analysis task
    classifier: Option<Arc<dyn Classifier>>,
    /// Set when the model could not be loaded
    model_error: Option<String>,
    screen: Screen,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Background model load finished
    ModelLoaded(Result<Arc<dyn Classifier>, AnalysisError>),
    /// User clicked the "Choose Photo" button
    PickPhoto,
    /// Background analysis finished for the given request
    AnalysisComplete(u64, Result<Analysis, AnalysisError>),
}

impl SeaFood {
    /// Create a new instance of the application and start loading the model
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load_or_default();

        log::info!("🌭 SeaFood starting, looking for \"{}\"", verdict::KEYWORD);

        let load = Task::perform(
            analysis::load_classifier(settings.model.clone()),
            Message::ModelLoaded,
        );

        (
            SeaFood {
                settings,
                classifier: None,
                model_error: None,
                screen: Screen::new(),
            },
            load,
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ModelLoaded(Ok(classifier)) => {
                log::info!("✅ Classifier ready: {:?}", classifier);
                self.classifier = Some(classifier);
                Task::none()
            }
            Message::ModelLoaded(Err(e)) => {
                log::error!("❌ {}", e);
                self.model_error = Some(e.to_string());
                Task::none()
            }
            Message::PickPhoto => {
                let Some(classifier) = self.classifier.clone() else {
                    return Task::none();
                };

                // Show the native file picker dialog
                let mut dialog = FileDialog::new()
                    .set_title("Select a Photo")
                    .add_filter("Images", &PHOTO_EXTENSIONS);
                if let Some(pictures) = dirs::picture_dir() {
                    dialog = dialog.set_directory(pictures);
                }

                let Some((request, photo)) = self.screen.pick(dialog.pick_file()) else {
                    log::debug!("Photo picker cancelled");
                    return Task::none();
                };

                log::info!("🔍 Analyzing {}", photo.display());

                Task::perform(analysis::analyze_async(photo, classifier), move |outcome| {
                    Message::AnalysisComplete(request, outcome)
                })
            }
            Message::AnalysisComplete(request, outcome) => {
                self.screen.finish(request, outcome);
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let ready = self.classifier.is_some() && !self.screen.is_busy();

        let mut content: Column<Message> = column![
            text(&self.screen.title).size(48),
            button("Choose Photo")
                .on_press_maybe(ready.then_some(Message::PickPhoto))
                .padding(10),
        ]
        .spacing(20)
        .padding(40)
        .align_x(Alignment::Center);

        if let Some(photo) = &self.screen.photo {
            let shown: image::Image<image::Handle> =
                image::Image::new(image::Handle::from_path(photo));
            content = content.push(shown.width(Length::Fill).height(Length::FillPortion(3)));
        }

        let ranked = self
            .screen
            .observations
            .iter()
            .take(self.settings.ranked_results_shown)
            .fold(Column::new().spacing(4), |col, obs| {
                col.push(text(format!("{}  {:.1}%", obs.label, obs.confidence * 100.0)).size(14))
            });
        content = content.push(ranked);

        content = content.push(text(self.status()).size(16));

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Status line under the photo
    fn status(&self) -> String {
        if let Some(e) = &self.model_error {
            return format!("Model unavailable: {}", e);
        }
        if self.classifier.is_none() {
            return "Loading model...".to_string();
        }
        if self.screen.is_busy() {
            return "Analyzing...".to_string();
        }
        if let Some(e) = &self.screen.error {
            return e.clone();
        }
        if self.screen.photo.is_none() {
            return "Pick a photo to find out.".to_string();
        }
        String::new()
    }

    /// Window title mirrors the verdict
    fn title(&self) -> String {
        self.screen.title.clone()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application(SeaFood::title, SeaFood::update, SeaFood::view)
        .theme(SeaFood::theme)
        .centered()
        .run_with(SeaFood::new)
}
