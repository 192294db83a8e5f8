use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SceneType {
    Hook,
    Problem,
    Solution,
    Demo,
    #[serde(alias = "call_to_action")]
    Cta,
    #[default]
    #[serde(other)]
    Other,
}

impl std::fmt::Display for SceneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneType::Hook => write!(f, "Hook"),
            SceneType::Problem => write!(f, "Problem"),
            SceneType::Solution => write!(f, "Solution"),
            SceneType::Demo => write!(f, "Demo"),
            SceneType::Cta => write!(f, "Call to Action"),
            SceneType::Other => write!(f, "Scene"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Scene {
    #[serde(rename = "type")]
    pub scene_type: SceneType,
    #[serde(rename = "duration")]
    pub duration_secs: f64,
    pub visual: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct VideoScript {
    pub title: String,
    pub hook: String,
    pub problem: String,
    pub solution: String,
    pub demo: String,
    pub call_to_action: String,
    #[serde(rename = "duration")]
    pub duration_secs: f64,
    pub emotional_tone: String,
    pub pacing: String,
    pub scenes: Vec<Scene>,
}

impl VideoScript {
    pub fn scene_total_secs(&self) -> f64 {
        self.scenes.iter().map(|s| s.duration_secs).sum()
    }

    pub fn get(&self, field: ScriptField) -> &str {
        match field {
            ScriptField::Title => &self.title,
            ScriptField::Hook => &self.hook,
            ScriptField::Problem => &self.problem,
            ScriptField::Solution => &self.solution,
            ScriptField::Demo => &self.demo,
            ScriptField::CallToAction => &self.call_to_action,
        }
    }

    pub fn set(&mut self, field: ScriptField, value: String) {
        let slot = match field {
            ScriptField::Title => &mut self.title,
            ScriptField::Hook => &mut self.hook,
            ScriptField::Problem => &mut self.problem,
            ScriptField::Solution => &mut self.solution,
            ScriptField::Demo => &mut self.demo,
            ScriptField::CallToAction => &mut self.call_to_action,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptField {
    Title,
    Hook,
    Problem,
    Solution,
    Demo,
    CallToAction,
}

impl ScriptField {
    pub const ALL: [ScriptField; 6] = [
        ScriptField::Title,
        ScriptField::Hook,
        ScriptField::Problem,
        ScriptField::Solution,
        ScriptField::Demo,
        ScriptField::CallToAction,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ScriptField::Title => "Title",
            ScriptField::Hook => "Hook",
            ScriptField::Problem => "Problem",
            ScriptField::Solution => "Solution",
            ScriptField::Demo => "Demo",
            ScriptField::CallToAction => "Call To Action",
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn script(title: &str) -> VideoScript {
        VideoScript {
            title: title.to_string(),
            hook: "Ever lost a widget?".into(),
            problem: "Widgets go missing.".into(),
            solution: "Widget tracks them.".into(),
            demo: "A terminal finding widgets.".into(),
            call_to_action: "Star it on GitHub.".into(),
            duration_secs: 90.0,
            emotional_tone: "enthusiastic".into(),
            pacing: "dynamic".into(),
            scenes: vec![
                Scene {
                    scene_type: SceneType::Hook,
                    duration_secs: 10.0,
                    visual: "A glowing widget in the dark".into(),
                },
                Scene {
                    scene_type: SceneType::Cta,
                    duration_secs: 80.0,
                    visual: "Logo and repository link".into(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_type_tolerates_unknown_values() {
        let scene: Scene =
            serde_json::from_str(r#"{"type": "intro", "duration": 5, "visual": "x"}"#).unwrap();
        assert_eq!(scene.scene_type, SceneType::Other);

        let scene: Scene =
            serde_json::from_str(r#"{"type": "call_to_action", "duration": 5.5, "visual": "x"}"#)
                .unwrap();
        assert_eq!(scene.scene_type, SceneType::Cta);
        assert_eq!(scene.duration_secs, 5.5);
    }

    #[test]
    fn test_script_field_access() {
        let mut script = fixtures::script("Widget");
        script.set(ScriptField::CallToAction, "Try it now".into());
        assert_eq!(script.get(ScriptField::CallToAction), "Try it now");
        assert_eq!(script.get(ScriptField::Title), "Widget");
        assert_eq!(script.scene_total_secs(), 90.0);
    }
}
