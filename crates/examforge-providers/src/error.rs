//! Judge boundary errors.
//!
//! The error type itself lives in `examforge-core` so the orchestrator can
//! classify failures for retry decisions; backends construct it here.

pub use examforge_core::error::JudgeError;
