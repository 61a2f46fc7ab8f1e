//! Token selection via text generation, Solidity templating and deployment

pub mod compiler;
pub mod deploy;
pub mod llm;
pub mod sanitize;
pub mod service;
pub mod template;

pub use service::*;
