pub mod history;
pub mod operation_log;
pub mod playback;
pub mod points;
pub mod session;

pub use history::{Command, History, Placement};
pub use operation_log::{Operation, OperationLog};
pub use playback::{Playback, PlaybackStatus, PlaybackStep};
pub use points::PointStore;
pub use session::Session;
