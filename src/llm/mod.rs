pub mod provider;
pub mod gemini;
pub mod imagen;
pub mod prompts;
pub mod parser;

pub use provider::{LLMProvider, ThumbnailProvider};
pub use gemini::GeminiProvider;
pub use imagen::{thumbnail_prompt, ImagenProvider};
pub use prompts::{NarrationRequest, RepositoryContext};
