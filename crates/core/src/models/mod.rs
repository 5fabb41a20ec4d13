pub mod chart;
pub mod range;
pub mod record;
pub mod series;
pub mod settings;
pub mod summary;
