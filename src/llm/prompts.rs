use serde_json::{json, Value};

use crate::models::{RepositoryMetadata, ScriptPreferences};

pub const NO_DESCRIPTION: &str = "No description provided.";

#[derive(Debug, Clone)]
pub struct NarrationRequest {
    pub context: RepositoryContext,
    pub preferences: ScriptPreferences,
}

#[derive(Debug, Clone, Default)]
pub struct RepositoryContext {
    pub repository_name: String,
    pub repository_description: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub last_update: String,
    pub readme: String,
}

impl RepositoryContext {
    pub fn new(metadata: &RepositoryMetadata, readme: String) -> Self {
        Self {
            repository_name: metadata.name.clone(),
            repository_description: metadata.description.clone(),
            stars: metadata.stargazers_count,
            forks: metadata.forks_count,
            last_update: metadata.last_update(),
            readme,
        }
    }
}

impl NarrationRequest {
    pub fn new(context: RepositoryContext, preferences: ScriptPreferences) -> Self {
        Self { context, preferences }
    }

    pub fn to_prompt(&self) -> String {
        let ctx = &self.context;
        let prefs = &self.preferences;
        let description = ctx
            .repository_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(NO_DESCRIPTION);

        let mut prompt = String::from(
            "You are CodeNarrator AI. Your task is to analyze a GitHub project and generate \
             a structured analysis report and a video script for a technical trailer.\n\n",
        );

        prompt.push_str(&format!("Project Name: {}\n", ctx.repository_name));
        prompt.push_str(&format!("Project Description: {}\n", description));
        prompt.push_str(&format!("Stars: {}\n", ctx.stars));
        prompt.push_str(&format!("Forks: {}\n", ctx.forks));
        prompt.push_str(&format!("Last Updated: {}\n\n", ctx.last_update));

        prompt.push_str("README Content:\n```\n");
        prompt.push_str(&ctx.readme);
        prompt.push_str("\n```\n\n");

        prompt.push_str("Based on the above information, please provide:\n");
        prompt.push_str(
            "1. **Project Analysis:**\n\
             * **goal:** The main objective or purpose of the project.\n\
             * **pain_points:** Key problems or challenges the project aims to solve.\n\
             * **solution:** How the project addresses these pain points.\n\
             * **key_features:** Main functionalities or highlights.\n\
             * **tech_stack:** Primary technologies used.\n\
             * **target_audience:** Who the project is for.\n\
             * **market_position:** How it stands in the market (e.g., innovative, niche, established).\n\
             * **competitive_advantage:** What makes it unique or better than alternatives.\n\
             * **complexity_level:** (e.g., \"Beginner\", \"Intermediate\", \"Advanced\")\n\
             * **confidence_score:** A confidence score (0-100) for your analysis.\n",
        );
        prompt.push_str(&format!(
            "2. **Video Script (for a {}-second technical trailer):**\n",
            prefs.duration_secs
        ));
        prompt.push_str(
            "* **title:** Catchy title for the video.\n\
             * **hook:** An engaging opening line to grab attention.\n\
             * **problem:** A concise description of the problem the project solves.\n\
             * **solution:** A clear explanation of the project's solution.\n\
             * **demo:** A brief description of what would be shown in a demo.\n\
             * **call_to_action:** What viewers should do next.\n",
        );
        prompt.push_str(&format!(
            "* **duration:** Total video duration in seconds (e.g., {}).\n",
            prefs.duration_secs
        ));
        prompt.push_str(&format!("* **emotional_tone:** \"{}\"\n", prefs.emotional_tone));
        prompt.push_str(&format!("* **pacing:** \"{}\"\n", prefs.pacing));
        prompt.push_str(
            "* **scenes:** An array of scene objects, each with:\n\
             \x20   * **type:** (e.g., \"hook\", \"problem\", \"solution\", \"demo\", \"cta\")\n\
             \x20   * **duration:** Duration of the scene in seconds.\n\
             \x20   * **visual:** A brief description of the visual content for the scene.\n\n",
        );

        prompt.push_str(
            "Ensure the response is a single JSON object with the two members \"analysisResult\" \
             and \"generatedScript\", adhering to the response schema. The video script should be \
             compelling and easy to understand for a general audience, making complex technical \
             concepts accessible.\n",
        );
        prompt
    }

    pub fn estimate_tokens(&self) -> usize {
        // Rough estimate: ~4 characters per token
        (self.context.readme.len() + 2_500) / 4
    }
}

pub fn response_schema() -> Value {
    let string = json!({ "type": "STRING" });
    let strings = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    let number = json!({ "type": "NUMBER" });

    json!({
        "type": "OBJECT",
        "properties": {
            "analysisResult": {
                "type": "OBJECT",
                "properties": {
                    "goal": string,
                    "pain_points": strings,
                    "solution": string,
                    "key_features": strings,
                    "tech_stack": strings,
                    "target_audience": string,
                    "market_position": string,
                    "competitive_advantage": string,
                    "complexity_level": string,
                    "confidence_score": number
                },
                "required": [
                    "goal", "pain_points", "solution", "key_features", "tech_stack",
                    "target_audience", "market_position", "competitive_advantage",
                    "complexity_level", "confidence_score"
                ]
            },
            "generatedScript": {
                "type": "OBJECT",
                "properties": {
                    "title": string,
                    "hook": string,
                    "problem": string,
                    "solution": string,
                    "demo": string,
                    "call_to_action": string,
                    "duration": number,
                    "emotional_tone": string,
                    "pacing": string,
                    "scenes": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "type": string,
                                "duration": number,
                                "visual": string
                            },
                            "required": ["type", "duration", "visual"]
                        }
                    }
                },
                "required": [
                    "title", "hook", "problem", "solution", "demo", "call_to_action",
                    "duration", "emotional_tone", "pacing", "scenes"
                ]
            }
        },
        "required": ["analysisResult", "generatedScript"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmotionalTone, Pacing};

    fn request(description: Option<&str>, readme: &str) -> NarrationRequest {
        NarrationRequest::new(
            RepositoryContext {
                repository_name: "widget".into(),
                repository_description: description.map(str::to_string),
                stars: 10,
                forks: 2,
                last_update: "1/1/2024".into(),
                readme: readme.into(),
            },
            ScriptPreferences::new(60, EmotionalTone::Informative, Pacing::Steady),
        )
    }

    #[test]
    fn test_prompt_embeds_repository_facts() {
        let readme = "# Widget\n\n".to_string() + &"line\n".repeat(2_000);
        let prompt = request(Some("Tracks widgets"), &readme).to_prompt();
        assert!(prompt.contains("Project Name: widget"));
        assert!(prompt.contains("Project Description: Tracks widgets"));
        assert!(prompt.contains("Stars: 10"));
        assert!(prompt.contains("Forks: 2"));
        assert!(prompt.contains("Last Updated: 1/1/2024"));
        assert!(prompt.contains(&readme));
        assert!(prompt.contains("60-second technical trailer"));
        assert!(prompt.contains("\"informative\""));
        assert!(prompt.contains("\"steady\""));
    }

    #[test]
    fn test_prompt_placeholder_description() {
        let prompt = request(None, "").to_prompt();
        assert!(prompt.contains("Project Description: No description provided."));
    }

    #[test]
    fn test_schema_requires_both_members() {
        let schema = response_schema();
        assert_eq!(schema["required"], json!(["analysisResult", "generatedScript"]));
        assert_eq!(
            schema["properties"]["analysisResult"]["required"].as_array().map(Vec::len),
            Some(10)
        );
        assert_eq!(
            schema["properties"]["generatedScript"]["required"].as_array().map(Vec::len),
            Some(10)
        );
        assert_eq!(
            schema["properties"]["generatedScript"]["properties"]["scenes"]["items"]["required"],
            json!(["type", "duration", "visual"])
        );
    }
}
