//! Narrative collaborator: chapter intros, boss lines, narrated prologue
//!
//! Text and audio come from an external [`NarrativeSource`]. The [`Narrator`]
//! wrapper never fails: every error becomes a fixed fallback line or
//! silence, so scene transitions always settle.

use thiserror::Error;

/// Intro used when the source answered with nothing
pub const INTRO_FALLBACK_EMPTY: &str = "O céu sangra ouro enquanto a fé se torna nossa carrasca.";
/// Intro used when the source failed
pub const INTRO_FALLBACK_ERROR: &str = "A luz desce como uma lâmina sobre os justos e os pecadores.";
/// Boss line used when the source answered with nothing
pub const BOSS_FALLBACK_EMPTY: &str = "Sua existência é um erro no design divino. Deixe-me corrigi-lo.";
/// Boss line used when the source failed
pub const BOSS_FALLBACK_ERROR: &str = "Sua fé é pequena demais para este julgamento.";

/// Narration PCM format
pub const NARRATION_SAMPLE_RATE: u32 = 24_000;
pub const NARRATION_CHANNELS: u16 = 1;

/// The prologue read over the story screen
pub const STORY_PASSAGE: &str = "Finalmente o apocalipse que estava na bíblia aconteceu, porem de um jeito bem diferente. \
Achávamos que as pessoas iriam ser arrebatadas e que os pecadores iriam permanecer na terra, \
mas não sabíamos que em cada igreja construída habitavam anjos que se fortaleciam com a fé de quem a frequentava. \
O ano era 2050, no dia do juízo final. Seres alados desceram do céu e devastaram as cidades, ficando apenas ruínas. \
Depois das explosões, os anjos adormecidos nas igrejas começaram a caçar os sobreviventes. \
Perdi tudo, família e amigos, e com eles a esperança e o principal, a fé.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NarrativeError {
    #[error("narrative service unavailable")]
    Unavailable,
    #[error("narrative service returned an empty response")]
    EmptyResponse,
    #[error("narrative backend error: {0}")]
    Backend(String),
    #[error("narration audio is malformed: {0}")]
    Audio(String),
}

/// Something that can produce narrative content
pub trait NarrativeSource {
    fn chapter_intro(&mut self, chapter: &str, character: &str) -> Result<String, NarrativeError>;

    fn boss_challenge(&mut self, boss: &str) -> Result<String, NarrativeError>;

    /// Raw little-endian 16-bit PCM for a passage
    fn narration(&mut self, passage: &str) -> Result<Vec<u8>, NarrativeError>;
}

/// Source for offline play: everything is unavailable
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineNarrative;

impl NarrativeSource for OfflineNarrative {
    fn chapter_intro(&mut self, _chapter: &str, _character: &str) -> Result<String, NarrativeError> {
        Err(NarrativeError::Unavailable)
    }

    fn boss_challenge(&mut self, _boss: &str) -> Result<String, NarrativeError> {
        Err(NarrativeError::Unavailable)
    }

    fn narration(&mut self, _passage: &str) -> Result<Vec<u8>, NarrativeError> {
        Err(NarrativeError::Unavailable)
    }
}

/// Decoded narration, samples normalized to [-1, 1)
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationAudio {
    /// Interleaved samples
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl NarrationAudio {
    pub fn silence() -> Self {
        Self {
            samples: Vec::new(),
            sample_rate: NARRATION_SAMPLE_RATE,
            channels: NARRATION_CHANNELS,
        }
    }

    /// Decode little-endian 16-bit PCM
    pub fn from_pcm16(bytes: &[u8], sample_rate: u32, channels: u16) -> Result<Self, NarrativeError> {
        if channels == 0 || sample_rate == 0 {
            return Err(NarrativeError::Audio(format!(
                "invalid format: {sample_rate} Hz, {channels} channels"
            )));
        }
        if bytes.len() % 2 != 0 {
            return Err(NarrativeError::Audio(format!("odd byte count {}", bytes.len())));
        }
        let frame_bytes = 2 * channels as usize;
        if bytes.len() % frame_bytes != 0 {
            return Err(NarrativeError::Audio(format!(
                "{} bytes is not a whole number of {channels}-channel frames",
                bytes.len()
            )));
        }

        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
            .collect();
        Ok(Self {
            samples,
            sample_rate,
            channels,
        })
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    pub fn duration_secs(&self) -> f32 {
        self.frames() as f32 / self.sample_rate.max(1) as f32
    }

    pub fn is_silent(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Fallback-applying front for a narrative source
pub struct Narrator<S: NarrativeSource> {
    source: S,
}

impl<S: NarrativeSource> Narrator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn chapter_intro(&mut self, chapter: &str, character: &str) -> String {
        resolve_text(
            self.source.chapter_intro(chapter, character),
            INTRO_FALLBACK_EMPTY,
            INTRO_FALLBACK_ERROR,
        )
    }

    pub fn boss_challenge(&mut self, boss: &str) -> String {
        resolve_text(self.source.boss_challenge(boss), BOSS_FALLBACK_EMPTY, BOSS_FALLBACK_ERROR)
    }

    /// Narration for `passage`, or silence if anything goes wrong
    pub fn narration(&mut self, passage: &str) -> NarrationAudio {
        let decoded = self.source.narration(passage).and_then(|bytes| {
            NarrationAudio::from_pcm16(&bytes, NARRATION_SAMPLE_RATE, NARRATION_CHANNELS)
        });
        match decoded {
            Ok(audio) => audio,
            Err(e) => {
                log::warn!("Narration unavailable, continuing silently: {e}");
                NarrationAudio::silence()
            }
        }
    }
}

fn resolve_text(result: Result<String, NarrativeError>, empty: &str, error: &str) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) | Err(NarrativeError::EmptyResponse) => empty.to_string(),
        Err(e) => {
            log::warn!("Narrative text failed: {e}");
            error.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays canned answers
    struct Canned {
        text: Result<String, NarrativeError>,
        audio: Result<Vec<u8>, NarrativeError>,
        asked: Vec<String>,
    }

    impl NarrativeSource for Canned {
        fn chapter_intro(&mut self, chapter: &str, character: &str) -> Result<String, NarrativeError> {
            self.asked.push(format!("{chapter}/{character}"));
            self.text.clone()
        }

        fn boss_challenge(&mut self, boss: &str) -> Result<String, NarrativeError> {
            self.asked.push(boss.to_string());
            self.text.clone()
        }

        fn narration(&mut self, _passage: &str) -> Result<Vec<u8>, NarrativeError> {
            self.audio.clone()
        }
    }

    fn canned(text: Result<String, NarrativeError>) -> Narrator<Canned> {
        Narrator::new(Canned {
            text,
            audio: Err(NarrativeError::Unavailable),
            asked: Vec::new(),
        })
    }

    #[test]
    fn test_generated_text_passes_through() {
        let mut narrator = canned(Ok("  As torres caem.\n".to_string()));
        assert_eq!(narrator.chapter_intro("Brasil", "Aziel"), "As torres caem.");
        assert_eq!(narrator.source_mut().asked, vec!["Brasil/Aziel".to_string()]);
    }

    #[test]
    fn test_empty_answer_uses_empty_fallback() {
        let mut narrator = canned(Ok("   ".to_string()));
        assert_eq!(narrator.chapter_intro("Nepal", "Tenzin"), INTRO_FALLBACK_EMPTY);
        assert_eq!(narrator.boss_challenge("O Olho do Vazio"), BOSS_FALLBACK_EMPTY);

        let mut narrator = canned(Err(NarrativeError::EmptyResponse));
        assert_eq!(narrator.boss_challenge("O Olho do Vazio"), BOSS_FALLBACK_EMPTY);
    }

    #[test]
    fn test_failure_uses_error_fallback() {
        let mut narrator = canned(Err(NarrativeError::Backend("429".to_string())));
        assert_eq!(narrator.chapter_intro("EUA", "Elias"), INTRO_FALLBACK_ERROR);
        assert_eq!(narrator.boss_challenge("Pastor da Ganância"), BOSS_FALLBACK_ERROR);

        let mut offline = Narrator::new(OfflineNarrative);
        assert_eq!(offline.chapter_intro("EUA", "Elias"), INTRO_FALLBACK_ERROR);
        assert!(offline.narration(STORY_PASSAGE).is_silent());
    }

    #[test]
    fn test_pcm16_decoding() {
        let bytes = [0x00, 0x00, 0x00, 0x40, 0x00, 0x80, 0xff, 0x7f];
        let audio = NarrationAudio::from_pcm16(&bytes, 24_000, 1).unwrap();
        assert_eq!(audio.samples, vec![0.0, 0.5, -1.0, 32767.0 / 32768.0]);
        assert_eq!(audio.frames(), 4);
    }

    #[test]
    fn test_pcm16_rejects_malformed_input() {
        assert!(NarrationAudio::from_pcm16(&[1, 2, 3], 24_000, 1).is_err());
        assert!(NarrationAudio::from_pcm16(&[0; 6], 24_000, 2).is_err());
        assert!(NarrationAudio::from_pcm16(&[0; 4], 24_000, 0).is_err());
    }

    #[test]
    fn test_narration_duration_and_fallback() {
        let mut narrator = Narrator::new(Canned {
            text: Ok(String::new()),
            audio: Ok(vec![0; 48_000]),
            asked: Vec::new(),
        });
        let audio = narrator.narration(STORY_PASSAGE);
        assert_eq!(audio.duration_secs(), 1.0);

        narrator.source_mut().audio = Ok(vec![0; 3]);
        assert!(narrator.narration(STORY_PASSAGE).is_silent());
    }
}
