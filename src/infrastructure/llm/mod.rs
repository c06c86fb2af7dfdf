mod generator_factory;
mod openai_image_generator;
mod openai_narrative_generator;

pub use generator_factory::{GeneratorFactory, UnconfiguredGenerator};
pub use openai_image_generator::OpenAiImageGenerator;
pub use openai_narrative_generator::OpenAiNarrativeGenerator;
