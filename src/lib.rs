pub mod browser;
pub mod config;
pub mod credentials;
pub mod explain;
pub mod extract;
pub mod logging;
pub mod matching;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod stderr_buffer;
pub mod tui;
