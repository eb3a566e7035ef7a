pub mod fetch;
pub mod status;
pub mod summarize;
