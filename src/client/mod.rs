pub mod api;
pub mod progress;
pub mod session;

pub use api::{NarratorApi, ProxyClient};
pub use progress::ProgressTicker;
pub use session::{ScriptDraft, Session, Step, StepStatus};
