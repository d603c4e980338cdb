//! Static model list served when registry discovery fails.

use crate::types::ModelDescriptor;

/// `(id, display name)` pairs, in presentation order.
pub const FALLBACK_MODELS: &[(&str, &str)] = &[
    ("llama-3.1-8b-instruct", "Llama 3.1 8B Instruct"),
    ("mistral-7b-instruct", "Mistral 7B Instruct"),
    ("qwen2.5-7b-instruct", "Qwen 2.5 7B Instruct"),
    ("flux-dev", "FLUX.1 Dev"),
    ("flux-schnell", "FLUX.1 Schnell"),
    ("sdxl", "Stable Diffusion XL"),
    ("stable-video-diffusion", "Stable Video Diffusion"),
    ("animatediff", "AnimateDiff"),
    ("whisper-large-v3", "Whisper Large v3"),
    ("faster-whisper", "Faster Whisper"),
    ("xtts-v2", "XTTS v2"),
    ("musicgen", "MusicGen"),
];

pub fn fallback_models() -> Vec<ModelDescriptor> {
    FALLBACK_MODELS
        .iter()
        .map(|(id, name)| ModelDescriptor::new(*id, *name))
        .collect()
}
