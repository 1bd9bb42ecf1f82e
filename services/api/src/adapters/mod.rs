pub mod auth;
pub mod files;
pub mod generation;
pub mod storage;

pub use auth::SimulatedAuthAdapter;
pub use files::{SimulatedExportAdapter, SimulatedParsingAdapter};
pub use generation::SimulatedGenerationAdapter;
pub use storage::FileKeyValueStore;
