//! Personalized word recommendations
//!
//! Local scoring ranks catalog words by the learner's context preferences and
//! closeness to their estimated level. The LLM variant shows the model the
//! learner summary and the top local candidates and asks it to pick; its
//! answer is filtered back through the catalog, and any failure falls back to
//! the local ranking.

use crate::catalog::{Catalog, WordEntry};
use crate::core::error::{MentorError, Result};
use crate::llm::client::LlmClient;
use crate::profile::{difficulty_level_of, dominant_context_of, UserProfile};
use ordered_float::OrderedFloat;
use std::collections::HashSet;

/// How many local candidates the model gets to choose from
const CANDIDATE_POOL: usize = 15;

/// Score of one word for one learner; higher is better
pub fn score_word(entry: &WordEntry, profile: Option<&UserProfile>) -> f64 {
    let level = difficulty_level_of(profile);
    let preference: f64 = profile
        .map(|p| {
            entry
                .preference_keys()
                .iter()
                .filter_map(|key| p.context_preferences.get(key))
                .sum::<f64>()
        })
        .unwrap_or(0.0);
    let level_fit = 3.0 - (entry.difficulty as f64 - level).abs();
    preference + level_fit
}

/// Catalog words ranked for the learner, excluding already-completed words
pub fn rank_candidates<'a>(catalog: &'a Catalog, profile: Option<&UserProfile>) -> Vec<&'a WordEntry> {
    let completed: HashSet<String> = profile
        .map(|p| p.completed_words().into_iter().map(str::to_lowercase).collect())
        .unwrap_or_default();

    let mut ranked: Vec<&WordEntry> = catalog
        .entries()
        .iter()
        .filter(|e| !completed.contains(&e.word.to_lowercase()))
        .collect();
    ranked.sort_by(|a, b| {
        OrderedFloat(score_word(b, profile))
            .cmp(&OrderedFloat(score_word(a, profile)))
            .then_with(|| a.word.cmp(&b.word))
    });
    ranked
}

/// Top `count` words by local scoring
pub fn local_recommendations(catalog: &Catalog, profile: Option<&UserProfile>, count: usize) -> Vec<String> {
    rank_candidates(catalog, profile)
        .into_iter()
        .take(count)
        .map(|e| e.word.clone())
        .collect()
}

/// Prompt asking the model to pick words from the candidate list
pub fn build_prompt(profile: Option<&UserProfile>, candidates: &[&WordEntry], count: usize) -> String {
    let recent: Vec<&str> = profile
        .map(|p| p.word_history.iter().rev().take(10).map(|h| h.word.as_str()).collect())
        .unwrap_or_default();
    let completion = profile
        .and_then(|p| p.completion_rate())
        .map(|r| format!("{:.0}%", r * 100.0))
        .unwrap_or_else(|| "unknown".into());

    let candidate_lines: Vec<String> = candidates
        .iter()
        .map(|e| format!("- {} (difficulty {}, cluster {}): {}", e.word, e.difficulty, e.cluster, e.definition))
        .collect();

    format!(
        "{}\n\nLEARNER:\n- estimated level: {:.1}\n- strongest context: {}\n- completion rate: {}\n- recent words: {}\n\nCANDIDATES:\n{}\n\nPick {} words. Answer with a JSON array of words only:",
        RECOMMEND_SYSTEM_PROMPT,
        difficulty_level_of(profile),
        dominant_context_of(profile),
        completion,
        if recent.is_empty() { "none".to_string() } else { recent.join(", ") },
        candidate_lines.join("\n"),
        count
    )
}

/// Ask the model for recommendations
///
/// The reply is filtered to catalog words the learner has not completed;
/// short answers are topped up from the local ranking.
pub async fn recommend_words(
    client: &LlmClient,
    catalog: &Catalog,
    profile: Option<&UserProfile>,
    count: usize,
) -> Result<Vec<String>> {
    let ranked = rank_candidates(catalog, profile);
    let pool: Vec<&WordEntry> = ranked.iter().take(CANDIDATE_POOL).copied().collect();
    let prompt = build_prompt(profile, &pool, count);

    let response = client.complete(&prompt).await?;
    let json_str = extract_json_array(&response)?;
    let picked: Vec<String> = serde_json::from_str(json_str).map_err(|e| {
        MentorError::Generation(format!(
            "Failed to parse recommendations: {} - Response: {}",
            e, response
        ))
    })?;

    let allowed: HashSet<String> = ranked.iter().map(|e| e.word.to_lowercase()).collect();
    let mut seen = HashSet::new();
    let mut words: Vec<String> = picked
        .iter()
        .filter_map(|w| catalog.find(w))
        .filter(|e| allowed.contains(&e.word.to_lowercase()))
        .filter(|e| seen.insert(e.word.to_lowercase()))
        .map(|e| e.word.clone())
        .take(count)
        .collect();

    if words.is_empty() {
        return Err(MentorError::Generation(format!(
            "no usable recommendations in response: {}",
            response
        )));
    }

    for entry in ranked {
        if words.len() >= count {
            break;
        }
        if seen.insert(entry.word.to_lowercase()) {
            words.push(entry.word.clone());
        }
    }

    Ok(words)
}

/// LLM recommendations when a client is available, local ranking otherwise
pub async fn recommend_with_fallback(
    client: Option<&LlmClient>,
    catalog: &Catalog,
    profile: Option<&UserProfile>,
    count: usize,
) -> Vec<String> {
    if let Some(client) = client {
        match recommend_words(client, catalog, profile, count).await {
            Ok(words) => return words,
            Err(e) => tracing::warn!(error = %e, "llm recommendations failed, using local ranking"),
        }
    }
    local_recommendations(catalog, profile, count)
}

/// Extract a JSON array from an LLM response (handles surrounding text)
fn extract_json_array(response: &str) -> Result<&str> {
    let start = response
        .find('[')
        .ok_or_else(|| MentorError::Generation("No JSON array found in response".into()))?;
    let end = response
        .rfind(']')
        .filter(|&end| end > start)
        .ok_or_else(|| MentorError::Generation("No closing bracket found in response".into()))?;
    Ok(&response[start..=end])
}

/// Instructions for the recommendation prompt
const RECOMMEND_SYSTEM_PROMPT: &str = r#"You are a vocabulary coach choosing the next words for a learner.
Prefer words that match the learner's strongest context and sit slightly above their level.
Only choose from the CANDIDATES list. Do not repeat recent words.

OUTPUT FORMAT (JSON only, no explanation):
["word1", "word2", "word3"]"#;
