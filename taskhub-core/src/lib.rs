//! Taskhub Core - Entity Types
//!
//! Pure data structures shared by the API and LLM layers.
//! This crate contains ONLY data types and their error taxonomy - no
//! business logic.

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod entities;
pub mod enums;
pub mod error;

pub use entities::{Account, Comment, Task, TaskBrief};
pub use enums::TaskStatus;
pub use error::{CoreError, CoreResult, LlmError, ValidationError};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Account identifier.
pub type AccountId = Uuid;

/// Task identifier.
pub type TaskId = Uuid;

/// Comment identifier.
pub type CommentId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;
