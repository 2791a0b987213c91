pub mod logger;
pub mod progress;

pub use logger::{Logger, Verbosity};
pub use progress::FileProgress;
