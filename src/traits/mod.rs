pub mod command;
pub mod mock;

pub use command::{CommandExecutor, CommandOutput, Invocation, RealCommandExecutor};
pub use mock::{MockCommand, MockCommandExecutor};
