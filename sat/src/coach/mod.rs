//! The S.A.T. coaching client
//!
//! Translates phase-specific coaching requests into LLM calls and
//! translates the replies into typed results. Every failure mode
//! (transport, API, malformed reply) collapses into a valid in-band
//! result: a fixed diagnostic question sentence, or a rejection
//! verdict with fixed feedback. The sequencer never sees an error
//! from this layer.

use std::sync::Arc;

use planstore::{PhaseKey, Plan};
use tracing::{debug, warn};

use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{EvaluateContext, PromptLoader, QuestionContext};

mod verdict;

pub use verdict::Verdict;

/// System persona for question generation
const QUESTION_PERSONA: &str = "Eres S.A.T., un sistema de inteligencia artificial que ayuda a los agentes a \
     transformar sus metas en planes de acción usando la metodología S.M.A.R.T. Tu tono es como el de una IA \
     de una película de espías: directo, profesional y enfocado en la misión.";

/// System persona for answer evaluation
const EVALUATE_PERSONA: &str = "Eres S.A.T., un sistema de inteligencia artificial experto en la metodología \
     S.M.A.R.T. Tu rol es analizar la respuesta de un agente y determinar si cumple con los criterios de la \
     fase actual. Eres estricto pero justo.";

/// Shown instead of a question when the service cannot produce one
pub const QUESTION_FALLBACK: &str = "Error de conexión con el sistema S.A.T. Intenta de nuevo.";

/// Feedback of the rejection verdict returned on any evaluation failure
pub const EVALUATE_FALLBACK: &str = "Error de comunicación con la unidad de análisis. No se pudo procesar la \
     respuesta. Revisa tu conexión y vuelve a intentarlo.";

/// Max tokens for a generated question
const QUESTION_MAX_TOKENS: u32 = 1024;

/// Max tokens for an evaluation verdict
const EVALUATE_MAX_TOKENS: u32 = 1024;

/// JSON schema the evaluation reply must match
///
/// The `type` values are the Gemini API's uppercase Schema enum names,
/// not lowercase JSON-Schema keywords; the endpoint only accepts the
/// former on `generationConfig.responseSchema`.
fn verdict_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "approved": { "type": "BOOLEAN" },
            "feedback": { "type": "STRING" },
        },
        "required": ["approved", "feedback"],
    })
}

/// The coaching client used by the sequencer
pub struct Coach {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
}

impl Coach {
    /// Create a coach over the given LLM client
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader) -> Self {
        debug!("Coach::new: called");
        Self { llm, prompts }
    }

    /// Generate the coaching question for the active phase
    ///
    /// Embeds the goal, the phase's criterion explanation, and the
    /// plan so far (unset phases marked explicitly). Fail-soft: on any
    /// failure the fixed diagnostic sentence is returned so the UI
    /// always has something to display.
    pub async fn question(&self, phase: PhaseKey, goal: &str, plan: &Plan) -> String {
        debug!(?phase, goal_len = goal.len(), "Coach::question: called");
        let ctx = QuestionContext::new(phase, goal, plan);
        let prompt = match self.prompts.render_question(&ctx) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Coach::question: template render failed");
                return QUESTION_FALLBACK.to_string();
            }
        };

        let request = CompletionRequest::text(QUESTION_PERSONA, prompt, QUESTION_MAX_TOKENS);
        match self.llm.complete(request).await {
            Ok(response) => match response.content {
                Some(text) if !text.trim().is_empty() => {
                    debug!(text_len = text.len(), "Coach::question: got question");
                    text.trim().to_string()
                }
                _ => {
                    warn!("Coach::question: empty reply, using fallback");
                    QUESTION_FALLBACK.to_string()
                }
            },
            Err(e) => {
                warn!(error = %e, "Coach::question: LLM call failed, using fallback");
                QUESTION_FALLBACK.to_string()
            }
        }
    }

    /// Judge whether the answer satisfies the phase's criterion
    ///
    /// The service is asked for the constrained `{approved, feedback}`
    /// shape. Fail-soft: transport, API, and parse failures all yield a
    /// rejection with fixed feedback, which keeps the user in the retry
    /// loop rather than advancing on bad data.
    pub async fn evaluate(&self, phase: PhaseKey, goal: &str, answer: &str) -> Verdict {
        debug!(?phase, answer_len = answer.len(), "Coach::evaluate: called");
        let ctx = EvaluateContext::new(phase, goal, answer);
        let prompt = match self.prompts.render_evaluate(&ctx) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Coach::evaluate: template render failed");
                return Verdict {
                    approved: false,
                    feedback: EVALUATE_FALLBACK.to_string(),
                };
            }
        };

        let request = CompletionRequest::structured(EVALUATE_PERSONA, prompt, EVALUATE_MAX_TOKENS, verdict_schema());
        let raw = match self.llm.complete(request).await {
            Ok(response) => response.content.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Coach::evaluate: LLM call failed, rejecting");
                return Verdict {
                    approved: false,
                    feedback: EVALUATE_FALLBACK.to_string(),
                };
            }
        };

        match Verdict::parse(&raw) {
            Some(verdict) => {
                debug!(approved = verdict.approved, "Coach::evaluate: parsed verdict");
                verdict
            }
            None => {
                warn!(raw_len = raw.len(), "Coach::evaluate: unparsable reply, rejecting");
                Verdict {
                    approved: false,
                    feedback: EVALUATE_FALLBACK.to_string(),
                }
            }
        }
    }
}
