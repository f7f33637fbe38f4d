// Library surface for the binary, headless/integration tests and reuse.
// Rendering and the CLI stay in the binary.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod navigation;
pub mod record;
pub mod runtime;
pub mod sentence;
pub mod session;
pub mod sink;
pub mod util;

pub use engine::{Engine, EngineOutcome};
pub use error::{DojoError, Result};
pub use sentence::{Sentence, SentenceSet};
pub use session::{Key, Phase, SessionState};
