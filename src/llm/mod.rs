//! LLM module for nbtidy
//!
//! One-shot text generation against Gemini or AWS Bedrock.

mod bedrock;
mod client;
mod gemini;

pub use bedrock::{BedrockClient, DEFAULT_BEDROCK_MODEL};
pub use client::{ask, build_provider, GenAiProvider, ProviderError, ProviderKind};
pub use gemini::{GeminiClient, DEFAULT_GEMINI_MODEL};
