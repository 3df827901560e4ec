use super::mode::{checked_base_url, ExecMode, INVALID_BASE_URL_MESSAGE};
use crate::caption::{CaptionResult, CaptionSource};
use crate::catalog::{build_prompt, BuiltPrompt};
use crate::client::ServiceClient;
use crate::local::{CaptionEngine, LocalCaptioner};
use crate::types::{CaptionRequest, GenerationParams, TranslationRequest};
use crate::{Error, Result};
use tracing::warn;

/// Object-safe view of a local captioner, so the service does not carry the engine type.
pub trait LocalBackend: Send + Sync {
    fn generate_caption(&self, image: &[u8], params: &GenerationParams) -> Result<CaptionResult>;
    fn translate(&self, text: &str) -> Result<String>;
}

impl<'r, E: CaptionEngine> LocalBackend for LocalCaptioner<'r, E> {
    fn generate_caption(&self, image: &[u8], params: &GenerationParams) -> Result<CaptionResult> {
        LocalCaptioner::generate_caption(self, image, params)
    }

    fn translate(&self, text: &str) -> Result<String> {
        LocalCaptioner::translate(self, text)
    }
}

/// Caption and translation with use-site degradation.
///
/// The `try_*` methods return errors as-is. [`CaptionService::caption`] and
/// [`CaptionService::translate`] never fail: a failed caption becomes
/// `"Error generating caption: {e}"` in both fields, a failed translation
/// returns the input text. Either way a warning is logged.
pub struct CaptionService<'r> {
    client: ServiceClient,
    local: Option<Box<dyn LocalBackend + 'r>>,
}

impl<'r> CaptionService<'r> {
    pub fn new(client: ServiceClient) -> Self {
        Self {
            client,
            local: None,
        }
    }

    pub fn with_local(mut self, backend: impl LocalBackend + 'r) -> Self {
        self.local = Some(Box::new(backend));
        self
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    fn local(&self) -> Result<&(dyn LocalBackend + 'r)> {
        self.local
            .as_deref()
            .ok_or_else(|| Error::configuration("local execution is not configured"))
    }

    pub fn try_caption(
        &self,
        mode: &ExecMode,
        image: &[u8],
        params: &GenerationParams,
    ) -> Result<CaptionResult> {
        match mode {
            ExecMode::Remote { base_url } => {
                let base_url = checked_base_url(base_url)?;
                let request = CaptionRequest::new(image.to_vec(), params.clone());
                self.client.generate_caption(base_url, &request)
            }
            ExecMode::Local => self.local()?.generate_caption(image, params),
        }
    }

    pub fn caption(&self, mode: &ExecMode, image: &[u8], params: &GenerationParams) -> CaptionResult {
        if let ExecMode::Remote { base_url } = mode {
            if checked_base_url(base_url).is_err() {
                warn!("{}", INVALID_BASE_URL_MESSAGE);
                return CaptionResult::both(INVALID_BASE_URL_MESSAGE, CaptionSource::Failed);
            }
        }

        self.try_caption(mode, image, params).unwrap_or_else(|e| {
            warn!("Error in {} caption generation: {}", mode.code(), e);
            CaptionResult::both(format!("Error generating caption: {}", e), CaptionSource::Failed)
        })
    }

    /// Build the prompt from catalog choices, then caption.
    ///
    /// Only an unknown caption type is an error; generation failures degrade
    /// like [`CaptionService::caption`].
    #[allow(clippy::too_many_arguments)]
    pub fn caption_with_options(
        &self,
        mode: &ExecMode,
        image: &[u8],
        caption_type: &str,
        caption_length: &str,
        extras: &[&str],
        name: &str,
        params: &GenerationParams,
    ) -> Result<(BuiltPrompt, CaptionResult)> {
        let built = build_prompt(caption_type, caption_length, extras, name)?;
        let mut params = params.clone();
        params.prompt = built.prompt.clone();
        let result = self.caption(mode, image, &params);
        Ok((built, result))
    }

    pub fn try_translate(&self, mode: &ExecMode, text: &str) -> Result<String> {
        match mode {
            ExecMode::Remote { base_url } => {
                let base_url = checked_base_url(base_url)?;
                self.client.translate(base_url, &TranslationRequest::new(text))
            }
            ExecMode::Local => self.local()?.translate(text),
        }
    }

    pub fn translate(&self, mode: &ExecMode, text: &str) -> String {
        self.try_translate(mode, text).unwrap_or_else(|e| {
            warn!("Translation error ({}): {}", mode.code(), e);
            text.to_string()
        })
    }
}
