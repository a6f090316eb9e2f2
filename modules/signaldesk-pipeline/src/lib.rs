pub mod calibration;
pub mod desk;
pub mod ids;
pub mod matcher;
pub mod persist;
pub mod pipeline;
pub mod publish;
pub mod review;
pub mod run_log;
pub mod seed;
pub mod store;
pub mod stories;

pub use calibration::CalibrationEngine;
pub use desk::{Desk, IngestOutcome};
pub use persist::{JsonFileStore, MemoryStore, StateStore};
pub use pipeline::{CompletedRun, Orchestrator, PipelineOutcome};
pub use publish::{MemoryChannel, NoopChannel, PublishChannel, StdoutChannel};
pub use review::ReviewDesk;
pub use run_log::{DeskLog, LogKind};
pub use store::{DeskState, PipelineCommit, StoryCommit};
pub use stories::StoryDesk;
