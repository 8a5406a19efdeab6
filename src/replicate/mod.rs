pub mod client;
pub mod input;
pub mod output;
pub mod variant;

pub use client::{FetchedImage, ImageBackend, ReplicateClient};
pub use input::{build_input, GenerationOptions};
pub use output::extract_url;
pub use variant::BackendVariant;
