//! Adaptive question provider.
//!
//! Negotiates with the external text generator to produce a balanced
//! question set: exact per-trait coverage or nothing. Partial per-trait
//! success is not acceptable because downstream scoring requires every trait
//! to be measurable, so any trait failing its quota fails the whole request
//! and the caller falls back to the question bank.

use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::AssessmentConfig;
use crate::domain::assessment::{
    trait_quotas, BehaviorSnapshot, Direction, Question, QuestionSet, QuestionSource, TraitKind,
};
use crate::ports::{GenerationRequest, TextGenerator};

use super::parse::extract_candidates;

/// Known phrasings of an unusable "service unavailable" style response.
const UNUSABLE_PHRASES: &[&str] = &[
    "service unavailable",
    "temporarily unavailable",
    "currently unavailable",
    "i'm unable to",
    "i am unable to",
    "i cannot assist",
    "try again later",
    "overloaded",
];

const SYSTEM_PROMPT: &str = "You write first-person self-assessment statements for a \
personality questionnaire. Respond with a JSON array only; no commentary. Each element \
is {\"text\": string, \"trait\": string, \"direction\": 1 or -1}. Direction -1 marks a \
reverse-scored statement.";

/// Produces generated question sets with exact per-trait coverage.
pub struct AdaptiveQuestionProvider {
    generator: Arc<dyn TextGenerator>,
    max_attempts: u32,
}

impl AdaptiveQuestionProvider {
    /// Creates a provider with a bounded per-trait retry policy.
    pub fn new(generator: Arc<dyn TextGenerator>, max_attempts: u32) -> Self {
        Self {
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Creates a provider whose retry bound comes from configuration.
    pub fn from_config(generator: Arc<dyn TextGenerator>, config: &AssessmentConfig) -> Self {
        Self::new(generator, config.max_generation_attempts)
    }

    /// Requests a question set of `total` questions.
    ///
    /// Returns `None` when any trait cannot meet its quota after all
    /// attempts; the caller falls back to the bank. Never mixes generated
    /// and bank questions within one request.
    pub async fn provide(
        &self,
        total: usize,
        context: Option<&BehaviorSnapshot>,
    ) -> Option<QuestionSet> {
        let mut questions: Vec<Question> = Vec::with_capacity(total);

        for (trait_kind, quota) in trait_quotas(total) {
            if quota == 0 {
                continue;
            }
            match self.collect_for_trait(trait_kind, quota, context).await {
                Some(mut pool) => questions.append(&mut pool),
                None => {
                    warn!(
                        %trait_kind,
                        quota,
                        attempts = self.max_attempts,
                        "trait failed generation quota; discarding entire set"
                    );
                    return None;
                }
            }
        }

        questions.shuffle(&mut rand::thread_rng());
        Some(QuestionSet::new(questions))
    }

    /// Accumulates validated candidates for one trait across retries.
    async fn collect_for_trait(
        &self,
        trait_kind: TraitKind,
        quota: usize,
        context: Option<&BehaviorSnapshot>,
    ) -> Option<Vec<Question>> {
        let mut pool: Vec<Question> = Vec::with_capacity(quota);
        let mut seen_text: Vec<String> = Vec::new();

        for attempt in 1..=self.max_attempts {
            let nonce: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(8)
                .map(char::from)
                .collect();
            let request = GenerationRequest::new(self.build_prompt(trait_kind, quota, context, &nonce))
                .with_system_prompt(SYSTEM_PROMPT)
                .with_max_tokens(1024)
                .with_temperature(0.9);

            let content = match self.generator.generate(request).await {
                Ok(response) => response.content,
                Err(err) => {
                    warn!(%trait_kind, attempt, error = %err, "generation attempt failed");
                    continue;
                }
            };

            if is_unusable(&content) {
                warn!(%trait_kind, attempt, "generator returned an unusable response");
                continue;
            }

            for candidate in extract_candidates(&content) {
                if pool.len() >= quota {
                    break;
                }
                let text = candidate.text.trim();
                if text.is_empty() {
                    continue;
                }
                if TraitKind::parse(&candidate.trait_name) != Some(trait_kind) {
                    debug!(%trait_kind, got = %candidate.trait_name, "trait mismatch rejected");
                    continue;
                }
                let Ok(direction) = Direction::try_from_i32(candidate.direction) else {
                    continue;
                };
                let lowered = text.to_lowercase();
                if seen_text.contains(&lowered) {
                    continue;
                }
                seen_text.push(lowered);
                pool.push(Question {
                    text: text.to_string(),
                    trait_kind,
                    direction,
                    source: QuestionSource::Generated,
                });
            }

            if pool.len() >= quota {
                return Some(pool);
            }
        }

        None
    }

    fn build_prompt(
        &self,
        trait_kind: TraitKind,
        quota: usize,
        context: Option<&BehaviorSnapshot>,
        nonce: &str,
    ) -> String {
        let mut prompt = format!(
            "Write {} distinct self-assessment statements measuring the personality \
             trait \"{}\". Mix in at least one reverse-scored statement (direction -1). \
             Statements must be answerable on a five-point agreement scale.",
            quota + 2,
            trait_kind.label().to_lowercase(),
        );
        if let Some(snapshot) = context {
            // Aggregated signals only; no raw records reach the generator.
            prompt.push_str(&format!(
                " Tone context from the last {} days of activity: task completion ratio \
                 {:.2}, average focus quality {:.1}/5, about {:.0} tracked events per day.",
                snapshot.window_days,
                snapshot.task_completion_ratio,
                snapshot.avg_focus_quality,
                snapshot.daily_event_volume,
            ));
        }
        prompt.push_str(&format!(" Variation token: {}.", nonce));
        prompt
    }
}

/// Response-level denylist check.
fn is_unusable(content: &str) -> bool {
    let lowered = content.to_lowercase();
    UNUSABLE_PHRASES.iter().any(|p| lowered.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{GenerationResponse, GeneratorError, GeneratorInfo};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns scripted responses in order; repeats the last one when empty.
    struct ScriptedGenerator {
        responses: Mutex<Vec<Result<String, GeneratorError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedGenerator {
        fn new(responses: Vec<Result<String, GeneratorError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> Result<GenerationResponse, GeneratorError> {
            *self.calls.lock().unwrap() += 1;
            let mut responses = self.responses.lock().unwrap();
            let next = if responses.len() > 1 {
                responses.remove(0)
            } else {
                responses[0].clone()
            };
            next.map(|content| GenerationResponse {
                content,
                model: "scripted".to_string(),
            })
        }

        fn generator_info(&self) -> GeneratorInfo {
            GeneratorInfo::new("mock", "scripted")
        }
    }

    /// A full batch of valid candidates for whatever trait is requested is
    /// impossible to script per-trait-agnostically, so script per-trait JSON
    /// covering all five traits; trait mismatches are filtered out, leaving
    /// exactly the requested trait's statements.
    fn all_traits_batch(per_trait: usize) -> String {
        let mut items = Vec::new();
        for t in TraitKind::ALL {
            for i in 0..per_trait {
                items.push(format!(
                    r#"{{"text": "{} statement {}", "trait": "{}", "direction": {}}}"#,
                    t.label(),
                    i,
                    serde_json::to_string(&t).unwrap().trim_matches('"'),
                    if i % 3 == 0 { -1 } else { 1 },
                ));
            }
        }
        format!("[{}]", items.join(","))
    }

    fn provider(generator: ScriptedGenerator) -> (AdaptiveQuestionProvider, Arc<ScriptedGenerator>) {
        let generator = Arc::new(generator);
        (
            AdaptiveQuestionProvider::new(generator.clone(), 4),
            generator,
        )
    }

    #[tokio::test]
    async fn produces_exact_per_trait_coverage() {
        let (provider, _) = provider(ScriptedGenerator::new(vec![Ok(all_traits_batch(8))]));
        let set = provider.provide(30, None).await.unwrap();
        assert_eq!(set.len(), 30);
        let counts = set.trait_counts();
        for t in TraitKind::ALL {
            assert_eq!(counts.get(&t), Some(&6));
        }
        assert_eq!(set.uniform_source(), Some(QuestionSource::Generated));
    }

    #[tokio::test]
    async fn retries_then_fails_entire_set_when_one_trait_starves() {
        // Every response only covers openness; the second trait exhausts its
        // four attempts and the whole set is discarded.
        let openness_only = r#"[
            {"text": "I like new ideas 1", "trait": "openness", "direction": 1},
            {"text": "I like new ideas 2", "trait": "openness", "direction": 1},
            {"text": "I like new ideas 3", "trait": "openness", "direction": 1},
            {"text": "I like new ideas 4", "trait": "openness", "direction": 1},
            {"text": "I like new ideas 5", "trait": "openness", "direction": 1},
            {"text": "I like new ideas 6", "trait": "openness", "direction": 1}
        ]"#;
        let (provider, generator) =
            provider(ScriptedGenerator::new(vec![Ok(openness_only.to_string())]));
        assert!(provider.provide(30, None).await.is_none());
        // 1 attempt satisfied openness, 4 attempts exhausted conscientiousness.
        assert_eq!(generator.call_count(), 5);
    }

    #[tokio::test]
    async fn retry_bound_comes_from_configuration() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Err(
            GeneratorError::unavailable("down"),
        )]));
        let config = AssessmentConfig {
            max_generation_attempts: 2,
            ..Default::default()
        };
        let provider = AdaptiveQuestionProvider::from_config(generator.clone(), &config);
        assert!(provider.provide(5, None).await.is_none());
        // The configured bound, not the default, caps the attempts.
        assert_eq!(generator.call_count(), 2);
    }

    #[tokio::test]
    async fn generator_errors_consume_attempts() {
        let (provider, generator) = provider(ScriptedGenerator::new(vec![Err(
            GeneratorError::unavailable("down"),
        )]));
        assert!(provider.provide(5, None).await.is_none());
        // First trait burned all its attempts; later traits never queried.
        assert_eq!(generator.call_count(), 4);
    }

    #[tokio::test]
    async fn denylisted_response_counts_as_failed_attempt() {
        let (provider, _) = provider(ScriptedGenerator::new(vec![
            Ok("The service is temporarily unavailable, try again later.".to_string()),
            Ok(all_traits_batch(4)),
        ]));
        // First attempt rejected, second succeeds.
        let set = provider.provide(5, None).await.unwrap();
        assert_eq!(set.len(), 5);
    }

    #[tokio::test]
    async fn duplicate_and_invalid_candidates_are_rejected() {
        let noisy = r#"[
            {"text": "I plan my week.", "trait": "openness", "direction": 1},
            {"text": "I PLAN MY WEEK.", "trait": "openness", "direction": 1},
            {"text": "", "trait": "openness", "direction": 1},
            {"text": "Wrong trait", "trait": "neuroticism", "direction": 1},
            {"text": "Bad direction", "trait": "openness", "direction": 0},
            {"text": "A valid second statement.", "trait": "openness", "direction": -1}
        ]"#;
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(noisy.to_string())]));
        let provider = AdaptiveQuestionProvider::new(generator, 1);
        // Quota of 2 for one trait (total 2 puts 1 on each of the first two
        // traits, so ask per-trait through a small total instead).
        let result = provider.provide(5, None).await;
        // Only two usable openness candidates exist and the quota is 1, so
        // openness succeeds, but conscientiousness has none: set fails.
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn accumulates_across_attempts_within_a_trait() {
        let one_each = |i: u32| {
            format!(
                r#"[{{"text": "Openness statement {}", "trait": "openness", "direction": 1}}]"#,
                i
            )
        };
        let generator = ScriptedGenerator::new(vec![
            Ok(one_each(1)),
            Ok(one_each(2)),
            Ok(one_each(3)),
        ]);
        let generator = Arc::new(generator);
        let provider = AdaptiveQuestionProvider::new(generator, 4);
        // total=1 -> single openness question; but use quota 3 via a direct
        // trait collection to exercise accumulation.
        let pool = provider
            .collect_for_trait(TraitKind::Openness, 3, None)
            .await
            .unwrap();
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn prompt_includes_context_and_nonce() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(String::new())]));
        let provider = AdaptiveQuestionProvider::new(generator, 1);
        let snapshot = BehaviorSnapshot {
            task_completion_ratio: 0.75,
            avg_focus_quality: 4.2,
            daily_event_volume: 12.0,
            window_days: 7,
        };
        let prompt = provider.build_prompt(TraitKind::Agreeableness, 6, Some(&snapshot), "a1b2c3");
        assert!(prompt.contains("agreeableness"));
        assert!(prompt.contains("0.75"));
        assert!(prompt.contains("a1b2c3"));
    }

    #[test]
    fn unusable_detection_is_case_insensitive() {
        assert!(is_unusable("Service Unavailable"));
        assert!(is_unusable("the model is OVERLOADED right now"));
        assert!(!is_unusable(r#"[{"text": "ok", "trait": "openness", "direction": 1}]"#));
    }
}
