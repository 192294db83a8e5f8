use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use codenarrator::client::{NarratorApi, Step, StepStatus};
use codenarrator::models::{EmotionalTone, Pacing, ScriptField, ScriptPreferences};
use codenarrator::server::{self, AppState};
use codenarrator::{ClientConfig, Config, ProxyClient, Session};

#[derive(Parser, Debug)]
#[command(name = "codenarrator")]
#[command(version = "0.1.0")]
#[command(about = "Turn a GitHub repository into a project analysis and a trailer script")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP proxy in front of GitHub and Gemini
    Serve {
        /// Listen address (defaults to BIND_ADDR or 0.0.0.0:3000)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Analyze a repository through a running proxy
    Narrate(NarrateArgs),
}

#[derive(clap::Args, Debug)]
struct NarrateArgs {
    /// GitHub repository URL
    #[arg(short, long)]
    url: String,

    /// Trailer length in seconds (30-180)
    #[arg(short, long, default_value = "90")]
    duration: u32,

    /// Emotional tone (enthusiastic, professional, inspirational, humorous, informative)
    #[arg(long, default_value = "enthusiastic")]
    tone: EmotionalTone,

    /// Pacing (dynamic, moderate, steady, slow)
    #[arg(long, default_value = "dynamic")]
    pacing: Pacing,

    /// Proxy base URL
    #[arg(long, env = "CODENARRATOR_PROXY_URL")]
    proxy: Option<String>,

    /// Output format (json, text, markdown)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Ask for a second script after the first one arrives
    #[arg(long)]
    regenerate: bool,

    /// Edit a script field before output, e.g. --set title="Widget, Reborn"
    #[arg(long = "set", value_parser = parse_field_edit)]
    edits: Vec<(ScriptField, String)>,

    /// Also generate a thumbnail for the script
    #[arg(long)]
    thumbnail: bool,
}

fn parse_field_edit(raw: &str) -> Result<(ScriptField, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {}", raw))?;
    let field = match name.trim().to_lowercase().replace('-', "_").as_str() {
        "title" => ScriptField::Title,
        "hook" => ScriptField::Hook,
        "problem" => ScriptField::Problem,
        "solution" => ScriptField::Solution,
        "demo" => ScriptField::Demo,
        "call_to_action" | "cta" => ScriptField::CallToAction,
        other => return Err(format!("unknown script field: {}", other)),
    };
    Ok((field, value.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("codenarrator=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    match args.command {
        Command::Serve { bind } => {
            let config = Config::from_env()?;
            let bind = bind.unwrap_or_else(|| config.bind_addr.clone());
            let state = AppState::from_config(&config)?;
            server::run_server(&bind, state).await?;
        }
        Command::Narrate(args) => narrate(args).await?,
    }

    Ok(())
}

async fn narrate(args: NarrateArgs) -> anyhow::Result<()> {
    let mut config = ClientConfig::from_env();
    if let Some(proxy) = &args.proxy {
        config.proxy_url = proxy.clone();
    }

    let mut session = Session::new(ProxyClient::new(&config)?);
    session.set_github_url(args.url.clone());
    session.set_preferences(ScriptPreferences::new(args.duration, args.tone, args.pacing));

    let progress = spinner("Analyzing repository...");
    let result = session.start_analysis().await;
    progress.finish_and_clear();
    if result.is_err() {
        anyhow::bail!(session.error().unwrap_or("Analysis failed").to_string());
    }
    tracing::info!("{}", render_steps(&session));

    if args.regenerate {
        let progress = spinner("Regenerating script...");
        let result = session.regenerate_script().await;
        progress.finish_and_clear();
        if result.is_err() {
            tracing::warn!("{}", session.error().unwrap_or("Script regeneration failed"));
        }
    }

    if !args.edits.is_empty() {
        session.edit_script()?;
        for (field, value) in &args.edits {
            session.update_draft(*field, value.clone())?;
        }
        session.save_script()?;
    }

    if args.thumbnail {
        generate_thumbnail(&mut session).await;
    }

    output_session(&session, &args)
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

async fn generate_thumbnail<A: NarratorApi>(session: &mut Session<A>) {
    let bar = ProgressBar::new(100);
    if let Ok(style) = ProgressStyle::with_template("Generating thumbnail [{bar:40}] {pos}%") {
        bar.set_style(style);
    }

    let mut progress = session.subscribe_progress();
    let render = {
        let bar = bar.clone();
        tokio::spawn(async move {
            while progress.changed().await.is_ok() {
                let value = *progress.borrow_and_update();
                bar.set_position(value as u64);
            }
        })
    };

    let result = session.generate_thumbnail().await;
    render.abort();
    bar.set_position(session.video_progress() as u64);
    bar.finish_and_clear();

    if result.is_err() {
        tracing::warn!("{}", session.error().unwrap_or("Video thumbnail generation failed"));
    }
}

fn render_steps<A: NarratorApi>(session: &Session<A>) -> String {
    Step::ALL
        .iter()
        .map(|step| {
            let marker = match session.step_status(*step) {
                StepStatus::Complete => "✓",
                StepStatus::InProgress => "…",
                StepStatus::Current => "●",
                StepStatus::Pending => "○",
            };
            format!("{} {}", marker, step.title())
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn output_session<A: NarratorApi>(session: &Session<A>, args: &NarrateArgs) -> anyhow::Result<()> {
    let output = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(&serde_json::json!({
            "analysisResult": session.analysis(),
            "generatedScript": session.script(),
            "thumbnailUrl": session.thumbnail_url(),
        }))?,
        "markdown" => format_markdown(session),
        _ => format_text(session),
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_text<A: NarratorApi>(session: &Session<A>) -> String {
    let mut output = String::new();

    if let Some(analysis) = session.analysis() {
        let insights = &analysis.insights;
        let stats = &analysis.stats;

        output.push_str("\n=== Project Analysis ===\n\n");
        output.push_str(&format!(
            "Confidence: {:.0}/100  Complexity: {}\n",
            insights.confidence_score, insights.complexity_level
        ));
        output.push_str(&format!(
            "Stars: {}  Forks: {}  Contributors: {}  Last update: {}\n",
            stats.stars, stats.forks, stats.contributors, stats.last_update
        ));
        if !stats.readme_excerpt.is_empty() {
            output.push_str(&format!("README: {}\n", stats.readme_excerpt.replace('\n', " ")));
        }

        output.push_str(&format!("\nGoal: {}\n", insights.goal));
        output.push_str("\nPain Points:\n");
        for point in &insights.pain_points {
            output.push_str(&format!("  - {}\n", point));
        }
        output.push_str(&format!("\nSolution: {}\n", insights.solution));
        output.push_str("\nKey Features:\n");
        for feature in &insights.key_features {
            output.push_str(&format!("  + {}\n", feature));
        }
        output.push_str(&format!("\nTech Stack: {}\n", insights.tech_stack.join(", ")));
        output.push_str(&format!("Target Audience: {}\n", insights.target_audience));
        output.push_str(&format!("Market Position: {}\n", insights.market_position));
        output.push_str(&format!(
            "Competitive Advantage: {}\n",
            insights.competitive_advantage
        ));
    }

    if let Some(script) = session.script() {
        output.push_str(&format!(
            "\n=== Video Script ({}s, {}, {}) ===\n\n",
            script.duration_secs, script.emotional_tone, script.pacing
        ));
        for field in ScriptField::ALL {
            output.push_str(&format!("{}: {}\n", field.label(), script.get(field)));
        }

        output.push_str("\nScenes:\n");
        for (i, scene) in script.scenes.iter().enumerate() {
            output.push_str(&format!(
                "  {}. [{}] {}s: {}\n",
                i + 1,
                scene.scene_type,
                scene.duration_secs,
                scene.visual
            ));
        }
    }

    if let Some(url) = session.thumbnail_url() {
        output.push_str(&format!("\nThumbnail: {}\n", truncate_url(url)));
    }

    if let Some(error) = session.error() {
        output.push_str(&format!("\n! {}\n", error));
    }

    output
}

fn format_markdown<A: NarratorApi>(session: &Session<A>) -> String {
    let mut output = String::new();

    if let Some(analysis) = session.analysis() {
        let insights = &analysis.insights;
        let stats = &analysis.stats;

        output.push_str("# Project Analysis\n\n");
        output.push_str("| Metric | Value |\n|--------|-------|\n");
        output.push_str(&format!("| Stars | {} |\n", stats.stars));
        output.push_str(&format!("| Forks | {} |\n", stats.forks));
        output.push_str(&format!("| Contributors | {} |\n", stats.contributors));
        output.push_str(&format!("| Last Update | {} |\n", stats.last_update));
        output.push_str(&format!("| Complexity | {} |\n", insights.complexity_level));
        output.push_str(&format!(
            "| Confidence | {:.0}/100 |\n",
            insights.confidence_score
        ));

        output.push_str(&format!("\n## Goal\n\n{}\n", insights.goal));
        output.push_str("\n## Pain Points\n\n");
        for point in &insights.pain_points {
            output.push_str(&format!("- {}\n", point));
        }
        output.push_str(&format!("\n## Solution\n\n{}\n", insights.solution));
        output.push_str("\n## Key Features\n\n");
        for feature in &insights.key_features {
            output.push_str(&format!("- {}\n", feature));
        }
        output.push_str(&format!(
            "\n## Tech Stack\n\n{}\n",
            insights.tech_stack.join(", ")
        ));
    }

    if let Some(script) = session.script() {
        output.push_str(&format!("\n# {}\n\n", script.title));
        for field in ScriptField::ALL.iter().skip(1) {
            output.push_str(&format!("**{}:** {}\n\n", field.label(), script.get(*field)));
        }

        output.push_str("| # | Scene | Duration | Visual |\n");
        output.push_str("|---|-------|----------|--------|\n");
        for (i, scene) in script.scenes.iter().enumerate() {
            output.push_str(&format!(
                "| {} | {} | {}s | {} |\n",
                i + 1,
                scene.scene_type,
                scene.duration_secs,
                scene.visual
            ));
        }
    }

    if let Some(url) = session.thumbnail_url() {
        output.push_str(&format!("\n![Thumbnail]({})\n", url));
    }

    output
}

fn truncate_url(url: &str) -> String {
    match url.char_indices().nth(80) {
        Some((cut, _)) => format!("{}...", &url[..cut]),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_narrate_flags() {
        let args = Args::try_parse_from([
            "codenarrator",
            "narrate",
            "--url",
            "https://github.com/acme/widget",
            "--tone",
            "humorous",
            "--regenerate",
            "--set",
            "cta=Clone it today",
            "--thumbnail",
        ])
        .unwrap();

        let Command::Narrate(narrate) = args.command else {
            panic!("expected narrate");
        };
        assert_eq!(narrate.duration, 90);
        assert_eq!(narrate.tone, EmotionalTone::Humorous);
        assert_eq!(narrate.pacing, Pacing::Dynamic);
        assert!(narrate.regenerate && narrate.thumbnail);
        assert_eq!(
            narrate.edits,
            vec![(ScriptField::CallToAction, "Clone it today".to_string())]
        );
    }

    #[test]
    fn test_parse_field_edit() {
        assert_eq!(
            parse_field_edit("Title=Widget, Reborn").unwrap(),
            (ScriptField::Title, "Widget, Reborn".to_string())
        );
        assert_eq!(
            parse_field_edit("call-to-action=a=b").unwrap(),
            (ScriptField::CallToAction, "a=b".to_string())
        );
        assert!(parse_field_edit("title").is_err());
        assert!(parse_field_edit("scenes=x").is_err());
    }

    #[test]
    fn test_truncate_url() {
        assert_eq!(truncate_url("data:x"), "data:x");
        let long = format!("data:image/png;base64,{}", "A".repeat(100));
        let short = truncate_url(&long);
        assert_eq!(short.chars().count(), 83);
        assert!(short.ends_with("..."));
    }
}
