mod record;

pub use record::{Metric, RepositoryRecord};
