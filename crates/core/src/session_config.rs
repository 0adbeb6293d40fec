//! The fixed live-session configuration used by the walking guide.

use gemini_realtime::types::{
    Content, GenerationConfig, GoogleSearch, LiveConfig, ResponseModality, SpeechConfig, Tool,
    VoiceName,
};

pub const MODEL: &str = "models/gemini-2.0-flash-exp";
pub const VOICE: VoiceName = VoiceName::Kore;

/// Instructions for the model: talk in Kansai dialect to a blind user and
/// describe what the camera sees on a walk.
pub const SYSTEM_PROMPT: &str = include_str!("../prompts/system_prompt.md");

/// Audio responses in the `Kore` voice, with Google Search as the only tool.
pub fn guide_config() -> LiveConfig {
    LiveConfig {
        model: MODEL.to_string(),
        generation_config: GenerationConfig {
            response_modalities: ResponseModality::Audio,
            speech_config: Some(SpeechConfig::prebuilt(VOICE)),
        },
        system_instruction: Content::text(SYSTEM_PROMPT.trim_end()),
        // Search has a free-tier quota.
        tools: vec![Tool::GoogleSearch(GoogleSearch::default())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guide_config_matches_session_requirements() {
        let config = guide_config();
        assert_eq!(config.model, "models/gemini-2.0-flash-exp");
        assert_eq!(
            config.generation_config.response_modalities,
            ResponseModality::Audio
        );
        let voice = config
            .generation_config
            .speech_config
            .as_ref()
            .map(|s| s.voice_config.prebuilt_voice_config.voice_name);
        assert_eq!(voice, Some(VoiceName::Kore));
        assert_eq!(config.tools, vec![Tool::GoogleSearch(GoogleSearch {})]);
    }

    #[test]
    fn system_prompt_is_multiline_single_part() {
        let config = guide_config();
        assert_eq!(config.system_instruction.parts.len(), 1);
        let text = config.system_instruction.parts[0].text.as_deref().unwrap();
        assert!(text.starts_with("関西弁であなたから話しかけてください。"));
        assert_eq!(text.lines().count(), 8);
        assert!(!text.ends_with('\n'));
    }
}
