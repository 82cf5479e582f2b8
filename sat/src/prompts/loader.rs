//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use planstore::{PhaseKey, Plan};
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// One line of the plan-so-far rendering in the question prompt
///
/// Every phase appears in order; phases without a finalized answer are
/// marked pending so the template shows an explicit "sin definir" line.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressLine {
    pub explanation: String,
    pub answer: String,
    pub pending: bool,
}

impl ProgressLine {
    /// Render the plan as one progress line per phase, in order
    pub fn from_plan(plan: &Plan) -> Vec<Self> {
        debug!(finalized = plan.finalized_count(), "ProgressLine::from_plan: called");
        plan.iter()
            .map(|(phase, answer)| Self {
                explanation: phase.explanation().to_string(),
                answer: answer.unwrap_or_default().to_string(),
                pending: answer.is_none(),
            })
            .collect()
    }
}

/// Context for rendering the question prompt
#[derive(Debug, Clone, Serialize)]
pub struct QuestionContext {
    pub goal: String,
    pub phase_explanation: String,
    pub progress: Vec<ProgressLine>,
}

impl QuestionContext {
    /// Build the context for the active phase
    pub fn new(phase: PhaseKey, goal: &str, plan: &Plan) -> Self {
        debug!(?phase, goal_len = goal.len(), "QuestionContext::new: called");
        Self {
            goal: goal.to_string(),
            phase_explanation: phase.explanation().to_string(),
            progress: ProgressLine::from_plan(plan),
        }
    }
}

/// Context for rendering the evaluation prompt
#[derive(Debug, Clone, Serialize)]
pub struct EvaluateContext {
    pub goal: String,
    pub phase_explanation: String,
    pub answer: String,
}

impl EvaluateContext {
    /// Build the context for judging one answer
    pub fn new(phase: PhaseKey, goal: &str, answer: &str) -> Self {
        debug!(?phase, answer_len = answer.len(), "EvaluateContext::new: called");
        Self {
            goal: goal.to_string(),
            phase_explanation: phase.explanation().to_string(),
            answer: answer.to_string(),
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.satmission/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader rooted at the given directory
    ///
    /// Templates in `<root>/.satmission/prompts/{name}.pmt` override
    /// the embedded defaults.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        debug!(?root, "PromptLoader::new: called");
        let user_dir = root.join(".satmission/prompts");

        let user_dir_exists = user_dir.exists();
        debug!(?user_dir, %user_dir_exists, "PromptLoader::new: checking override directory");

        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);

        Self {
            hbs,
            user_dir: if user_dir_exists { Some(user_dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs, user_dir: None }
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `.satmission/prompts/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: not found in user override");
        }

        embedded::get_embedded(name)
            .map(String::from)
            .ok_or_else(|| eyre!("No template named '{}'", name))
    }

    /// Render the question prompt for the active phase
    pub fn render_question(&self, ctx: &QuestionContext) -> Result<String> {
        debug!("PromptLoader::render_question: called");
        let template = self.load_template("question")?;
        self.hbs
            .render_template(&template, ctx)
            .map_err(|e| eyre!("Failed to render question prompt: {}", e))
    }

    /// Render the evaluation prompt for one submitted answer
    pub fn render_evaluate(&self, ctx: &EvaluateContext) -> Result<String> {
        debug!("PromptLoader::render_evaluate: called");
        let template = self.load_template("evaluate")?;
        self.hbs
            .render_template(&template, ctx)
            .map_err(|e| eyre!("Failed to render evaluate prompt: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> Plan {
        let mut plan = Plan::new();
        plan.finalize(PhaseKey::S, "Tocar tres canciones completas").unwrap();
        plan
    }

    #[test]
    fn test_render_question_includes_goal_and_progress() {
        let loader = PromptLoader::embedded_only();
        let ctx = QuestionContext::new(PhaseKey::M, "Aprender guitarra", &sample_plan());

        let rendered = loader.render_question(&ctx).unwrap();

        assert!(rendered.contains("Aprender guitarra"));
        assert!(rendered.contains("Tocar tres canciones completas"));
        assert!(rendered.contains("Medible"));
        // Unset phases show the explicit pending marker
        assert!(rendered.contains("aún sin definir"));
    }

    #[test]
    fn test_render_question_empty_plan_marks_all_pending() {
        let loader = PromptLoader::embedded_only();
        let ctx = QuestionContext::new(PhaseKey::S, "Correr un maratón", &Plan::new());

        let rendered = loader.render_question(&ctx).unwrap();

        assert_eq!(rendered.matches("aún sin definir").count(), 5);
    }

    #[test]
    fn test_render_evaluate_includes_answer() {
        let loader = PromptLoader::embedded_only();
        let ctx = EvaluateContext::new(PhaseKey::T, "Aprender guitarra", "Para diciembre de este año");

        let rendered = loader.render_evaluate(&ctx).unwrap();

        assert!(rendered.contains("Para diciembre de este año"));
        assert!(rendered.contains("Temporal"));
        assert!(rendered.contains("\"approved\": boolean"));
    }

    #[test]
    fn test_user_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let override_dir = dir.path().join(".satmission/prompts");
        std::fs::create_dir_all(&override_dir).unwrap();
        std::fs::write(override_dir.join("question.pmt"), "OVERRIDE {{goal}}").unwrap();

        let loader = PromptLoader::new(dir.path());
        let ctx = QuestionContext::new(PhaseKey::S, "Meta", &Plan::new());

        let rendered = loader.render_question(&ctx).unwrap();
        assert_eq!(rendered, "OVERRIDE Meta");
    }

    #[test]
    fn test_missing_override_falls_back_to_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let loader = PromptLoader::new(dir.path());
        let ctx = EvaluateContext::new(PhaseKey::S, "Meta", "Respuesta");
        assert!(loader.render_evaluate(&ctx).is_ok());
    }
}
