//! Model identifier → content category.
//!
//! Rule sets are checked in rank order (text, image, video, audio) and the
//! first match wins, so an identifier matching several sets always resolves
//! to the highest-ranked one.

use crate::types::ModelCategory;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

static RULES: Lazy<Vec<(ModelCategory, Regex)>> = Lazy::new(|| {
    let ranked: [(ModelCategory, &str); 4] = [
        (
            ModelCategory::Text,
            r"(?i)llama|mistral|mixtral|qwen|gemma|deepseek|falcon|\bphi[-_]?\d|gpt|vllm|\bllm\b|instruct|\bchat\b|coder",
        ),
        (
            ModelCategory::Image,
            r"(?i)flux|sdxl|stable[-_]?diffusion|\bsd[-_]?\d|kandinsky|controlnet|dall[-_]?e|playground|txt2img|img2img|\bimage\b",
        ),
        (
            ModelCategory::Video,
            r"(?i)video|\bsvd\b|animatediff|mochi|hunyuan|\bwan[-_]?\d|\bltx|cogvideo|txt2vid|img2vid",
        ),
        (
            ModelCategory::Audio,
            r"(?i)whisper|\btts\b|xtts|bark|musicgen|audio|speech|voice|\bstt\b",
        ),
    ];
    ranked
        .into_iter()
        .filter_map(|(category, pattern)| match Regex::new(pattern) {
            Ok(re) => Some((category, re)),
            Err(e) => {
                tracing::error!(category = category.as_str(), error = %e, "invalid categorizer rule");
                None
            }
        })
        .collect()
});

/// Tag a model identifier with its content category.
pub fn categorize(model_id: &str) -> ModelCategory {
    RULES
        .iter()
        .find(|(_, re)| re.is_match(model_id))
        .map(|(category, _)| *category)
        .unwrap_or(ModelCategory::Unknown)
}

/// Input skeleton for a category, used when the caller supplies none.
pub fn default_input(category: ModelCategory) -> Value {
    match category {
        ModelCategory::Text => json!({
            "prompt": "Hello, how are you?",
            "max_tokens": 100,
            "temperature": 0.7
        }),
        ModelCategory::Image => json!({
            "prompt": "A beautiful landscape at sunset",
            "width": 1024,
            "height": 1024,
            "num_inference_steps": 20
        }),
        ModelCategory::Video => json!({
            "prompt": "A drone shot over a coastline",
            "num_frames": 16,
            "fps": 8
        }),
        ModelCategory::Audio => json!({
            "audio": "https://github.com/runpod-workers/sample-inputs/raw/main/audio/gettysburg.wav",
            "transcription": "plain_text"
        }),
        ModelCategory::Unknown => json!({ "prompt": "" }),
    }
}
