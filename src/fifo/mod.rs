// FIFO command channel
// External processes write newline-terminated commands into a named pipe;
// the running process reads them asynchronously and runs each in a window.

pub mod dispatch;
#[cfg(unix)]
pub mod lifecycle;
pub mod reader;
pub mod supervisor;

pub use dispatch::{CommandDispatcher, CommandExecutor, WindowId, WindowRegistry};
#[cfg(unix)]
pub use reader::FifoReader;
pub use reader::LineBuffer;
pub use supervisor::{ChannelState, ChannelSupervisor, Notifier};
