//! Raw model response normalization
//!
//! Turning a free-form model response into something the syntax stages can
//! work with: pulling code out of markdown fences and JSON envelopes, and
//! rejecting responses that are instructions rather than code.

pub mod classifier;
pub mod extractor;

pub use classifier::looks_like_prompt;
pub use extractor::{Payload, extract_all_text_content, extract_code_blocks, extract_payload};
