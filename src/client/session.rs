use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::client::api::NarratorApi;
use crate::client::progress::{ProgressTicker, PROGRESS_INTERVAL};
use crate::error::{Error, Result};
use crate::models::{
    AnalysisRequest, AnalysisResult, ScriptField, ScriptPreferences, ThumbnailRequest,
    VideoScript,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Input,
    Analyzing,
    Extracting,
    Generating,
    Producing,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::Input,
        Step::Analyzing,
        Step::Extracting,
        Step::Generating,
        Step::Producing,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Step::Input => "Project Input",
            Step::Analyzing => "AI Analysis",
            Step::Extracting => "Intent Extraction",
            Step::Generating => "Script Generation",
            Step::Producing => "Video Production",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Complete,
    InProgress,
    Current,
    Pending,
}

// Only `save_script` turns a draft back into the committed script
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptDraft {
    script: VideoScript,
}

impl ScriptDraft {
    fn new(script: VideoScript) -> Self {
        Self { script }
    }

    pub fn get(&self, field: ScriptField) -> &str {
        self.script.get(field)
    }

    pub fn script(&self) -> &VideoScript {
        &self.script
    }
}

pub struct Session<A> {
    api: A,
    github_url: String,
    preferences: ScriptPreferences,
    analyzed_url: Option<String>,
    current_step: Step,
    in_flight: bool,
    analysis: Option<AnalysisResult>,
    script: Option<VideoScript>,
    draft: Option<ScriptDraft>,
    thumbnail_url: Option<String>,
    generating_thumbnail: bool,
    progress: Arc<watch::Sender<u8>>,
    tick_interval: Duration,
    error: Option<String>,
}

impl<A: NarratorApi> Session<A> {
    pub fn new(api: A) -> Self {
        let (progress, _) = watch::channel(0);
        Self {
            api,
            github_url: String::new(),
            preferences: ScriptPreferences::default(),
            analyzed_url: None,
            current_step: Step::Input,
            in_flight: false,
            analysis: None,
            script: None,
            draft: None,
            thumbnail_url: None,
            generating_thumbnail: false,
            progress: Arc::new(progress),
            tick_interval: PROGRESS_INTERVAL,
            error: None,
        }
    }

    pub fn with_tick_interval(mut self, every: Duration) -> Self {
        self.tick_interval = every;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn set_github_url(&mut self, url: impl Into<String>) {
        self.github_url = url.into();
    }

    pub fn set_preferences(&mut self, preferences: ScriptPreferences) {
        self.preferences = preferences;
    }

    pub fn preferences(&self) -> ScriptPreferences {
        self.preferences
    }

    pub fn current_step(&self) -> Step {
        self.current_step
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn step_status(&self, step: Step) -> StepStatus {
        match step.cmp(&self.current_step) {
            std::cmp::Ordering::Less => StepStatus::Complete,
            std::cmp::Ordering::Equal if self.in_flight => StepStatus::InProgress,
            std::cmp::Ordering::Equal => StepStatus::Current,
            std::cmp::Ordering::Greater => StepStatus::Pending,
        }
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn script(&self) -> Option<&VideoScript> {
        self.script.as_ref()
    }

    pub fn draft(&self) -> Option<&ScriptDraft> {
        self.draft.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }

    pub fn is_generating_thumbnail(&self) -> bool {
        self.generating_thumbnail
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn video_progress(&self) -> u8 {
        *self.progress.borrow()
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    fn reject(&mut self, message: &str) -> Error {
        self.error = Some(message.to_string());
        Error::Validation(message.to_string())
    }

    fn report(&mut self, context: &str, hint: &str, err: &Error) {
        tracing::error!("{}: {}", context, err);
        let detail = err.to_string();
        // The proxy's 500 bodies already carry the same prefix
        let message = if detail.starts_with(context) {
            detail
        } else {
            format!("{}: {}.{}", context, detail.trim_end_matches('.'), hint)
        };
        self.error = Some(message);
    }

    pub async fn start_analysis(&mut self) -> Result<()> {
        let url = self.github_url.trim().to_string();
        if url.is_empty() {
            return Err(self.reject("Please enter a GitHub URL."));
        }

        self.error = None;
        self.in_flight = true;
        self.current_step = Step::Analyzing;
        self.analysis = None;
        self.script = None;
        self.thumbnail_url = None;
        self.draft = None;
        self.progress.send_replace(0);

        let request = AnalysisRequest::new(url.clone(), self.preferences);
        let result = self.api.analyze(&request).await;
        self.in_flight = false;

        match result {
            Ok(response) => {
                // Analysis and script arrive together, so the intermediate
                // steps are skipped
                self.analysis = Some(response.analysis_result);
                self.script = Some(response.generated_script);
                self.analyzed_url = Some(url);
                self.current_step = Step::Producing;
                Ok(())
            }
            Err(e) => {
                self.report("Analysis failed", " Please check the URL and try again.", &e);
                self.current_step = Step::Input;
                self.analysis = None;
                self.script = None;
                self.analyzed_url = None;
                Err(e)
            }
        }
    }

    // Only the script is replaced; the analysis that comes back with it is
    // dropped.
    pub async fn regenerate_script(&mut self) -> Result<()> {
        let url = match (&self.analysis, &self.analyzed_url) {
            (Some(_), Some(url)) => Some(url.clone()),
            _ => None,
        };
        let Some(url) = url else {
            return Err(self.reject("Please perform an initial analysis first."));
        };

        self.in_flight = true;
        self.current_step = Step::Generating;
        self.draft = None;

        let request = AnalysisRequest::new(url, self.preferences);
        let result = self.api.analyze(&request).await;
        self.in_flight = false;
        self.current_step = Step::Producing;

        match result {
            Ok(response) => {
                if self.analysis.as_ref() != Some(&response.analysis_result) {
                    tracing::debug!("Regeneration returned a different analysis, keeping the original");
                }
                self.script = Some(response.generated_script);
                Ok(())
            }
            Err(e) => {
                self.report("Script regeneration failed", "", &e);
                Err(e)
            }
        }
    }

    pub fn edit_script(&mut self) -> Result<()> {
        let Some(script) = self.script.clone() else {
            return Err(self.reject("Please generate a script first before editing it."));
        };
        self.draft = Some(ScriptDraft::new(script));
        Ok(())
    }

    pub fn update_draft(&mut self, field: ScriptField, value: impl Into<String>) -> Result<()> {
        match &mut self.draft {
            Some(draft) => {
                draft.script.set(field, value.into());
                Ok(())
            }
            None => Err(Error::Validation("Not editing a script.".to_string())),
        }
    }

    pub fn save_script(&mut self) -> Result<()> {
        let draft = self
            .draft
            .take()
            .ok_or_else(|| Error::Validation("Not editing a script.".to_string()))?;
        self.script = Some(draft.script);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.draft = None;
    }

    pub async fn generate_thumbnail(&mut self) -> Result<()> {
        let (title, visual) = match &self.script {
            None => (None, None),
            Some(script) => (
                Some(script.title.clone()),
                script.scenes.first().map(|scene| scene.visual.clone()),
            ),
        };
        let request = match (title, visual) {
            (None, _) => {
                return Err(self.reject("Please generate a script first before generating video."))
            }
            (Some(_), None) => return Err(self.reject("The script has no scenes to illustrate.")),
            (Some(title), Some(visual)) => ThumbnailRequest {
                script_title: Some(title),
                scene_visual: Some(visual),
            },
        };

        self.generating_thumbnail = true;
        self.thumbnail_url = None;
        self.progress.send_replace(0);

        let ticker = ProgressTicker::start(self.progress.clone(), self.tick_interval);
        let result = self.api.generate_thumbnail(&request).await;
        drop(ticker);
        self.generating_thumbnail = false;

        match result {
            Ok(response) => {
                self.thumbnail_url = Some(response.image_url);
                self.progress.send_replace(100);
                Ok(())
            }
            Err(e) => {
                self.report("Video thumbnail generation failed", "", &e);
                self.thumbnail_url = None;
                self.progress.send_replace(0);
                Err(e)
            }
        }
    }
}
