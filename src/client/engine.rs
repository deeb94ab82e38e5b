//! Engine trait: the seam an optimization framework calls through.

use crate::protocol::GenerationParams;
use crate::Result;

/// A text-generation backend.
pub trait Engine: Send + Sync {
    fn model_name(&self) -> &str;

    fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: &GenerationParams,
    ) -> Result<String>;

    /// Generate with the configured system prompt and parameters.
    fn call(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, None, &GenerationParams::default())
    }
}
