pub mod history;
pub mod series;
pub mod snapshot;
