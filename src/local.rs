//! 本地推理：通过共享资源注册表调用本地模型
//!
//! Local captioning path. The model itself sits behind [`CaptionEngine`];
//! this module owns prompt preparation, the one-instance-per-process rule and
//! bilingual parsing of whatever the engine returns.

use crate::caption::{BilingualParser, CaptionResult, Language};
use crate::resource::{ResourceRegistry, ResourceState, SharedHandle, SharedResource};
use crate::types::{GenerationParams, MAX_TOKENS};
use crate::Result;
use tracing::{debug, info};

/// Appended to every local caption prompt so the model answers in both languages.
pub const BILINGUAL_SUFFIX: &str = "Please reply in both Chinese and English according to this format **English:**English Description**Chinese:**Chinese Description";

pub const TRANSLATION_SYSTEM_PROMPT: &str = "You are a translation expert";

/// A loaded vision-language model.
///
/// Implementations are never called concurrently; the registry holds the
/// per-kind lock for the duration of each call.
pub trait CaptionEngine: SharedResource {
    /// Raw model output for `image` (encoded bytes) under `params`.
    fn generate(&mut self, image: &[u8], params: &GenerationParams) -> Result<String>;

    /// Translate `text` into `target`. See [`translation_prompt`].
    fn translate(&mut self, text: &str, target: Language) -> Result<String>;
}

/// User prompt for a translation request.
pub fn translation_prompt(text: &str, target: Language) -> String {
    format!("translate this passage into {}: {}", target.name(), text.trim())
}

type EngineLoader<'r, E> = Box<dyn Fn() -> Result<E> + Send + Sync + 'r>;

/// Runs captioning and translation on the process-wide engine of type `E`.
pub struct LocalCaptioner<'r, E: CaptionEngine> {
    registry: &'r ResourceRegistry,
    loader: EngineLoader<'r, E>,
    parser: BilingualParser,
}

impl<'r, E: CaptionEngine> LocalCaptioner<'r, E> {
    /// `loader` is only called when no engine exists yet.
    pub fn new<F>(registry: &'r ResourceRegistry, loader: F) -> Self
    where
        F: Fn() -> Result<E> + Send + Sync + 'r,
    {
        Self {
            registry,
            loader: Box::new(loader),
            parser: BilingualParser::default(),
        }
    }

    pub fn with_parser(mut self, parser: BilingualParser) -> Self {
        self.parser = parser;
        self
    }

    fn engine(&self) -> Result<SharedHandle<E>> {
        self.registry.acquire(|| (self.loader)())
    }

    /// Params as the engine sees them: token cap applied, prompts trimmed,
    /// bilingual instruction appended.
    pub fn prepare_params(params: &GenerationParams) -> GenerationParams {
        let mut prepared = params.clone();
        prepared.max_new_tokens = prepared.max_new_tokens.min(MAX_TOKENS);
        prepared.system_prompt = params.system_prompt.trim().to_string();
        prepared.prompt = format!("{} {}", params.prompt.trim(), BILINGUAL_SUFFIX);
        prepared
    }

    pub fn generate_caption(&self, image: &[u8], params: &GenerationParams) -> Result<CaptionResult> {
        let prepared = Self::prepare_params(params);
        let engine = self.engine()?;

        info!(
            "Generating caption locally (max_new_tokens={})",
            prepared.max_new_tokens
        );
        let raw = engine.with_exclusive_access(|e| e.generate(image, &prepared))??;
        debug!("Raw model output: {}", raw);

        Ok(self.parser.parse(raw.trim()))
    }

    /// Chinese input is translated to English, anything else to Chinese.
    pub fn translate(&self, text: &str) -> Result<String> {
        let target = Language::translation_target(text);
        let engine = self.engine()?;

        info!("Translating locally into {}", target.name());
        let translated = engine.with_exclusive_access(|e| e.translate(text, target))??;
        Ok(translated.trim().to_string())
    }

    /// Tear the engine down. Later calls on any captioner sharing the registry fail.
    pub fn release(&self) -> Result<bool> {
        self.registry.release::<E>()
    }

    pub fn state(&self) -> ResourceState {
        self.registry.state::<E>()
    }
}
