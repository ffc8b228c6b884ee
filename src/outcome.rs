//! Outcome kinds returned to the caller

use crate::engine::EngineStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final outcome of one orchestrated repair or verify call
///
/// A closed set: every engine-native status, including codes this crate has
/// never seen, maps to exactly one of these kinds. Unrecognized codes resolve
/// to [`RepairOutcome::LogicError`] rather than propagating raw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[must_use]
pub enum RepairOutcome {
    /// All files verified intact, or repair completed successfully
    Success,
    /// Damage found and enough recovery data exists (verify mode)
    RepairPossible,
    /// Damage found and the available recovery data is insufficient
    RepairNotPossible,
    /// The request was malformed (empty parity path, rejected parameters)
    InvalidArguments,
    /// Not enough critical packet data in the parity set
    InsufficientData,
    /// A repair attempt ran and did not restore the files
    RepairFailed,
    /// The engine hit a file I/O error
    FileIoError,
    /// Internal engine inconsistency, or an unrecognized status code
    LogicError,
    /// The engine exhausted its memory budget
    MemoryError,
}

impl RepairOutcome {
    /// Map an engine-native status to an outcome kind
    ///
    /// Total and stable: every known status has a fixed mapping, and any
    /// other value is the fail-safe `LogicError`.
    pub fn from_status(status: EngineStatus) -> Self {
        match status {
            EngineStatus::SUCCESS => Self::Success,
            EngineStatus::REPAIR_POSSIBLE => Self::RepairPossible,
            EngineStatus::REPAIR_NOT_POSSIBLE => Self::RepairNotPossible,
            EngineStatus::INVALID_ARGUMENTS => Self::InvalidArguments,
            EngineStatus::INSUFFICIENT_DATA => Self::InsufficientData,
            EngineStatus::REPAIR_FAILED => Self::RepairFailed,
            EngineStatus::FILE_IO_ERROR => Self::FileIoError,
            EngineStatus::LOGIC_ERROR => Self::LogicError,
            EngineStatus::MEMORY_ERROR => Self::MemoryError,
            _ => Self::LogicError,
        }
    }

    /// Machine-readable code, matching the serialized wire name
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::RepairPossible => "repair_possible",
            Self::RepairNotPossible => "repair_not_possible",
            Self::InvalidArguments => "invalid_arguments",
            Self::InsufficientData => "insufficient_data",
            Self::RepairFailed => "repair_failed",
            Self::FileIoError => "file_io_error",
            Self::LogicError => "logic_error",
            Self::MemoryError => "memory_error",
        }
    }

    /// Whether the data set is usable without further action
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<EngineStatus> for RepairOutcome {
    fn from(status: EngineStatus) -> Self {
        Self::from_status(status)
    }
}

impl fmt::Display for RepairOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    /// Every known engine status and its fixed outcome
    fn known_mappings() -> Vec<(EngineStatus, RepairOutcome)> {
        vec![
            (EngineStatus::SUCCESS, RepairOutcome::Success),
            (EngineStatus::REPAIR_POSSIBLE, RepairOutcome::RepairPossible),
            (
                EngineStatus::REPAIR_NOT_POSSIBLE,
                RepairOutcome::RepairNotPossible,
            ),
            (
                EngineStatus::INVALID_ARGUMENTS,
                RepairOutcome::InvalidArguments,
            ),
            (
                EngineStatus::INSUFFICIENT_DATA,
                RepairOutcome::InsufficientData,
            ),
            (EngineStatus::REPAIR_FAILED, RepairOutcome::RepairFailed),
            (EngineStatus::FILE_IO_ERROR, RepairOutcome::FileIoError),
            (EngineStatus::LOGIC_ERROR, RepairOutcome::LogicError),
            (EngineStatus::MEMORY_ERROR, RepairOutcome::MemoryError),
        ]
    }

    #[test]
    fn every_known_status_maps_to_its_fixed_outcome() {
        for (status, expected) in known_mappings() {
            assert_eq!(
                RepairOutcome::from_status(status),
                expected,
                "status {} mapped incorrectly",
                status.0
            );
        }
    }

    #[test]
    fn mapping_is_stable_across_calls() {
        for (status, _) in known_mappings() {
            assert_eq!(
                RepairOutcome::from_status(status),
                RepairOutcome::from_status(status)
            );
        }
    }

    #[test]
    fn unknown_statuses_map_to_logic_error() {
        for raw in [-1, 9, 42, 255, i32::MAX, i32::MIN] {
            assert_eq!(
                RepairOutcome::from_status(EngineStatus(raw)),
                RepairOutcome::LogicError,
                "raw status {raw} must resolve to the fail-safe default"
            );
        }
    }

    #[test]
    fn from_impl_matches_from_status() {
        let outcome: RepairOutcome = EngineStatus::REPAIR_POSSIBLE.into();
        assert_eq!(outcome, RepairOutcome::RepairPossible);
    }

    #[test]
    fn only_success_counts_as_success() {
        for (_, outcome) in known_mappings() {
            assert_eq!(outcome.is_success(), outcome == RepairOutcome::Success);
        }
    }

    #[test]
    fn display_matches_machine_readable_code() {
        for (_, outcome) in known_mappings() {
            assert_eq!(outcome.to_string(), outcome.code());
        }
    }

    #[test]
    fn serializes_with_snake_case_wire_names() {
        let json = serde_json::to_string(&RepairOutcome::RepairNotPossible).unwrap();
        assert_eq!(json, "\"repair_not_possible\"");

        let back: RepairOutcome = serde_json::from_str("\"insufficient_data\"").unwrap();
        assert_eq!(back, RepairOutcome::InsufficientData);
    }

    #[test]
    fn wire_names_match_code_for_every_kind() {
        for (_, outcome) in known_mappings() {
            let json = serde_json::to_string(&outcome).unwrap();
            assert_eq!(json, format!("\"{}\"", outcome.code()));
        }
    }
}
