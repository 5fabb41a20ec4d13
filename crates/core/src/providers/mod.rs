pub mod traits;

// HTTP implementation
pub mod kaisens;
