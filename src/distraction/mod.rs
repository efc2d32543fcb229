pub mod monitor;
pub mod watcher;

pub use monitor::DistractionMonitor;
pub use watcher::{visibility_loop, VisibilitySource};
