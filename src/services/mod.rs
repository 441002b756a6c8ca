pub mod file_processor;
pub mod session;
pub mod tabular;
