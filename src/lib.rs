pub mod artifacts;
pub mod cli;
pub mod config;
pub mod error;
pub mod init;
pub mod labels;
pub mod model;
pub mod pipeline;
pub mod services;
pub mod table;
pub mod text;

pub use error::EmotionError;
