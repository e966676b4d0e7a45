pub mod config;
pub mod decoder;
pub mod errors;
pub mod exec;
pub mod format;
pub mod history;
pub mod instruction;
pub mod loader;
pub mod machine;
pub mod memory;
pub mod registers;
pub mod registry;
pub mod session;

pub use config::EngineConfig;
pub use errors::{FinishReason, LoadError, SessionError, StepError};
pub use format::{Phase, Snapshot};
pub use instruction::{Decoded, Instruction};
pub use memory::StackEntry;
pub use registers::Register;
pub use registry::{SessionId, SessionRegistry};
pub use session::Session;
