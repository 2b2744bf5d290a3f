pub mod downloads;
pub mod health;
pub mod process;
pub mod process_stream;
pub mod stats;
