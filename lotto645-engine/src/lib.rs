pub mod candidate;
pub mod catalog;
pub mod config;
pub mod constraints;
pub mod context;
pub mod error;
pub mod frequency;
pub mod report;
pub mod sampler;
pub mod strategies;

pub use candidate::Candidate;
pub use context::AnalysisContext;
pub use error::EngineError;
pub use strategies::StrategyCode;
