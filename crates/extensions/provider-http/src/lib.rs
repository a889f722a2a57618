//! Remote HTTP correction provider for Proofmark.

mod api;
mod parser;
mod provider;

pub use parser::StreamAssembler;
pub use provider::HttpGrammarProvider;
