pub mod cli;
pub mod commands;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod fs;
pub mod graph;
pub mod model;
pub mod page;
pub mod pipeline;
pub mod source;
pub mod style;

pub use cli::Cli;
pub use commands::{cmd_graph, cmd_init, cmd_proxy};
pub use config::Config;
pub use graph::GraphData;
pub use model::{Metric, RepositoryRecord};
pub use pipeline::{Pipeline, PipelineError, Progress};
pub use source::Source;
