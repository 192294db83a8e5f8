use async_trait::async_trait;
use crate::error::Result;
use crate::llm::prompts::NarrationRequest;
use crate::models::RawNarration;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn generate_narration(&self, request: &NarrationRequest) -> Result<RawNarration>;
    fn name(&self) -> &str;
}

#[async_trait]
pub trait ThumbnailProvider: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<String>;
    fn name(&self) -> &str;
}
