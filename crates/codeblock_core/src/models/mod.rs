/// Persisted code-block model.
pub mod block;

pub use block::CodeBlock;
