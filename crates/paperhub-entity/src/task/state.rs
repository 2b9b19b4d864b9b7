//! Per-file upload lifecycle as a pure state machine.
//!
//! States form a strict sequence per task:
//! `Queued → Uploading → Stored → Analyzing → AwaitingConfirmation →
//! Committed`, with `Failed` reachable from `Uploading` and `Analyzing`
//! and `Stored` a valid terminal when the user never invokes analysis.
//! The reducer in [`TaskState::apply`] is pure; collaborator calls
//! (object store, relational store, analyzer) are issued by the intake
//! controller, which dispatches on the resulting state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use paperhub_core::error::{AppError, ErrorKind};
use paperhub_core::result::AppResult;
use paperhub_core::traits::analyzer::DocumentSuggestion;

/// The state of one upload task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum TaskState {
    /// Admitted and validated, waiting to start.
    Queued,
    /// Object bytes in flight.
    Uploading {
        /// Upload progress, 0–100.
        progress: u8,
    },
    /// Bytes persisted and a file record created.
    Stored {
        /// The created file record.
        file_id: Uuid,
        /// The folder the file currently sits in.
        folder_id: Uuid,
    },
    /// Content analyzer invocation in flight.
    Analyzing {
        /// The stored file record.
        file_id: Uuid,
        /// The folder the file currently sits in.
        folder_id: Uuid,
    },
    /// A suggestion is waiting for the user's confirmation.
    AwaitingConfirmation {
        /// The stored file record.
        file_id: Uuid,
        /// The folder the file currently sits in.
        folder_id: Uuid,
        /// The analyzer's proposal.
        suggestion: DocumentSuggestion,
    },
    /// The (possibly edited) suggestion was applied.
    Committed {
        /// The file record.
        file_id: Uuid,
        /// The folder the file ended up in.
        folder_id: Uuid,
    },
    /// The task failed. The underlying file record, if one was created,
    /// remains stored and usable.
    Failed {
        /// Error category.
        kind: ErrorKind,
        /// Human-readable message, verbatim from the collaborator.
        message: String,
    },
}

/// Events that drive a task through its states.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    /// The task was admitted and the upload began.
    UploadStarted,
    /// Upload progress update.
    UploadProgressed {
        /// New progress value, 0–100.
        progress: u8,
    },
    /// Object bytes persisted and file record created.
    StoredOk {
        /// The created file record.
        file_id: Uuid,
        /// The folder the record was created in.
        folder_id: Uuid,
    },
    /// The user triggered Smart Upload.
    AnalysisStarted,
    /// The analyzer returned a structured suggestion.
    SuggestionReady {
        /// The analyzer's proposal.
        suggestion: DocumentSuggestion,
    },
    /// The analyzer reported unsupported content or no suggestion.
    AnalysisDeclined,
    /// The user accepted (with possible edits) and the commit succeeded.
    CommitApplied {
        /// The resolved target folder.
        folder_id: Uuid,
    },
    /// The user cancelled the confirmation.
    ConfirmationCancelled,
    /// A collaborator reported a hard failure.
    Failed {
        /// Error category.
        kind: ErrorKind,
        /// Human-readable message.
        message: String,
    },
}

impl TaskState {
    /// Apply an event, producing the next state.
    ///
    /// Invalid transitions are rejected with a `Conflict` error and
    /// leave the caller's state untouched.
    pub fn apply(&self, event: TaskEvent) -> AppResult<TaskState> {
        let next = match (self, event) {
            (Self::Queued, TaskEvent::UploadStarted) => Self::Uploading { progress: 0 },
            (Self::Uploading { .. }, TaskEvent::UploadProgressed { progress }) => {
                Self::Uploading {
                    progress: progress.min(100),
                }
            }
            (Self::Uploading { .. }, TaskEvent::StoredOk { file_id, folder_id }) => {
                Self::Stored { file_id, folder_id }
            }
            (Self::Uploading { .. }, TaskEvent::Failed { kind, message }) => {
                Self::Failed { kind, message }
            }
            (
                Self::Stored { file_id, folder_id },
                TaskEvent::AnalysisStarted,
            ) => Self::Analyzing {
                file_id: *file_id,
                folder_id: *folder_id,
            },
            (
                Self::Analyzing { file_id, folder_id },
                TaskEvent::SuggestionReady { suggestion },
            ) => Self::AwaitingConfirmation {
                file_id: *file_id,
                folder_id: *folder_id,
                suggestion,
            },
            (Self::Analyzing { file_id, folder_id }, TaskEvent::AnalysisDeclined) => {
                Self::Stored {
                    file_id: *file_id,
                    folder_id: *folder_id,
                }
            }
            (Self::Analyzing { .. }, TaskEvent::Failed { kind, message }) => {
                Self::Failed { kind, message }
            }
            (
                Self::AwaitingConfirmation { file_id, .. },
                TaskEvent::CommitApplied { folder_id },
            ) => Self::Committed {
                file_id: *file_id,
                folder_id,
            },
            (
                Self::AwaitingConfirmation { file_id, folder_id, .. },
                TaskEvent::ConfirmationCancelled,
            ) => Self::Stored {
                file_id: *file_id,
                folder_id: *folder_id,
            },
            (state, event) => {
                return Err(AppError::conflict(format!(
                    "Invalid transition: {} does not accept {event:?}",
                    state.name()
                )));
            }
        };
        Ok(next)
    }

    /// Short state name for logging and display.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Uploading { .. } => "uploading",
            Self::Stored { .. } => "stored",
            Self::Analyzing { .. } => "analyzing",
            Self::AwaitingConfirmation { .. } => "awaiting-confirmation",
            Self::Committed { .. } => "committed",
            Self::Failed { .. } => "error",
        }
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed { .. } | Self::Failed { .. })
    }

    /// The file record this task refers to, once one exists.
    pub fn file_id(&self) -> Option<Uuid> {
        match self {
            Self::Stored { file_id, .. }
            | Self::Analyzing { file_id, .. }
            | Self::AwaitingConfirmation { file_id, .. }
            | Self::Committed { file_id, .. } => Some(*file_id),
            _ => None,
        }
    }

    /// The folder the task's file currently sits in, once one exists.
    pub fn folder_id(&self) -> Option<Uuid> {
        match self {
            Self::Stored { folder_id, .. }
            | Self::Analyzing { folder_id, .. }
            | Self::AwaitingConfirmation { folder_id, .. }
            | Self::Committed { folder_id, .. } => Some(*folder_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion() -> DocumentSuggestion {
        DocumentSuggestion {
            suggested_title: "Stromrechnung Januar".into(),
            document_type: Some("invoice".into()),
            keywords: vec!["strom".into()],
            suggested_path: vec!["Rechnungen".into(), "2024".into()],
            date: None,
            party: None,
            amount: None,
        }
    }

    #[test]
    fn test_happy_path_through_commit() {
        let file_id = Uuid::new_v4();
        let folder_id = Uuid::new_v4();
        let target = Uuid::new_v4();

        let state = TaskState::Queued;
        let state = state.apply(TaskEvent::UploadStarted).unwrap();
        let state = state
            .apply(TaskEvent::UploadProgressed { progress: 50 })
            .unwrap();
        let state = state
            .apply(TaskEvent::StoredOk { file_id, folder_id })
            .unwrap();
        assert_eq!(state.name(), "stored");
        assert!(!state.is_terminal());

        let state = state.apply(TaskEvent::AnalysisStarted).unwrap();
        let state = state
            .apply(TaskEvent::SuggestionReady {
                suggestion: suggestion(),
            })
            .unwrap();
        assert_eq!(state.name(), "awaiting-confirmation");

        let state = state
            .apply(TaskEvent::CommitApplied { folder_id: target })
            .unwrap();
        assert_eq!(
            state,
            TaskState::Committed {
                file_id,
                folder_id: target
            }
        );
        assert!(state.is_terminal());
    }

    #[test]
    fn test_analysis_declined_returns_to_stored() {
        let file_id = Uuid::new_v4();
        let folder_id = Uuid::new_v4();
        let state = TaskState::Analyzing { file_id, folder_id };

        let state = state.apply(TaskEvent::AnalysisDeclined).unwrap();
        assert_eq!(state, TaskState::Stored { file_id, folder_id });
    }

    #[test]
    fn test_cancel_confirmation_keeps_stored_location() {
        let file_id = Uuid::new_v4();
        let folder_id = Uuid::new_v4();
        let state = TaskState::AwaitingConfirmation {
            file_id,
            folder_id,
            suggestion: suggestion(),
        };

        let state = state.apply(TaskEvent::ConfirmationCancelled).unwrap();
        assert_eq!(state, TaskState::Stored { file_id, folder_id });
    }

    #[test]
    fn test_failed_only_reachable_from_uploading_and_analyzing() {
        let failure = || TaskEvent::Failed {
            kind: ErrorKind::Storage,
            message: "write failed".into(),
        };

        assert!(TaskState::Uploading { progress: 10 }.apply(failure()).is_ok());
        assert!(
            TaskState::Analyzing {
                file_id: Uuid::new_v4(),
                folder_id: Uuid::new_v4(),
            }
            .apply(failure())
            .is_ok()
        );

        assert!(TaskState::Queued.apply(failure()).is_err());
        assert!(
            TaskState::Stored {
                file_id: Uuid::new_v4(),
                folder_id: Uuid::new_v4(),
            }
            .apply(failure())
            .is_err()
        );
    }

    #[test]
    fn test_states_never_revisited_out_of_order() {
        let state = TaskState::Committed {
            file_id: Uuid::new_v4(),
            folder_id: Uuid::new_v4(),
        };
        assert!(state.apply(TaskEvent::UploadStarted).is_err());
        assert!(state.apply(TaskEvent::AnalysisStarted).is_err());

        let state = TaskState::Queued;
        assert!(state.apply(TaskEvent::AnalysisStarted).is_err());
    }
}
