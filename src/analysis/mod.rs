pub mod pipeline;

pub use pipeline::NarrationPipeline;
