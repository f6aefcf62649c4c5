//! Row transformation.
//!
//! - Weight: per-unit gram weights by category
//! - Resolver: destination header -> column source
//! - Executor: materializes the output table
//! - Pipeline: bytes in, workbook bytes out

pub mod executor;
pub mod pipeline;
pub mod resolver;
pub mod weight;

pub use executor::execute;
pub use pipeline::*;
pub use resolver::*;
pub use weight::*;
