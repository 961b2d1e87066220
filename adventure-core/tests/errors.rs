//! Stable error codes exposed by the core crate.

use adventure_core::{
    BuildError, BuildErrorCode, DecodeError, DecodeErrorCode, DrawStage, GraphInvariantViolation,
    MalformedReason, Role, SessionError, SessionErrorCode,
};
use rstest::rstest;

#[rstest]
#[case(
    BuildError::CatalogTooSmall { entries: 3, required: 7 },
    BuildErrorCode::CatalogTooSmall,
    "BUILD_CATALOG_TOO_SMALL",
)]
#[case(
    BuildError::InvalidParameter { parameter: "max_passes" },
    BuildErrorCode::InvalidParameter,
    "BUILD_INVALID_PARAMETER",
)]
#[case(
    BuildError::SelectionExhausted { stage: DrawStage::EndRoom, draws: 10 },
    BuildErrorCode::SelectionExhausted,
    "BUILD_SELECTION_EXHAUSTED",
)]
#[case(
    BuildError::EdgePassesExhausted { passes: 4 },
    BuildErrorCode::EdgePassesExhausted,
    "BUILD_EDGE_PASSES_EXHAUSTED",
)]
#[case(
    BuildError::from(GraphInvariantViolation::MissingStart),
    BuildErrorCode::InvariantViolation,
    "BUILD_INVARIANT_VIOLATION",
)]
fn returns_expected_build_code(
    #[case] error: BuildError,
    #[case] expected: BuildErrorCode,
    #[case] code: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), code);
    assert_eq!(expected.to_string(), code);
}

#[rstest]
#[case(
    DecodeError::MalformedRecord {
        record: "r".into(),
        line: None,
        reason: MalformedReason::MissingRole,
    },
    DecodeErrorCode::MalformedRecord,
    "DECODE_MALFORMED_RECORD",
)]
#[case(
    DecodeError::UnresolvedConnection { room: "A".into(), target: "Z".into() },
    DecodeErrorCode::UnresolvedConnection,
    "DECODE_UNRESOLVED_CONNECTION",
)]
#[case(
    DecodeError::RoleCardinality { starts: 0, ends: 1 },
    DecodeErrorCode::RoleCardinality,
    "DECODE_ROLE_CARDINALITY",
)]
#[case(
    DecodeError::DuplicateRoomName { name: "A".into() },
    DecodeErrorCode::DuplicateRoomName,
    "DECODE_DUPLICATE_ROOM_NAME",
)]
fn returns_expected_decode_code(
    #[case] error: DecodeError,
    #[case] expected: DecodeErrorCode,
    #[case] code: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), code);
}

#[rstest]
fn session_error_has_stable_code_and_message() {
    let error = SessionError::RoleCount {
        role: Role::Start,
        found: 0,
    };
    assert_eq!(error.code(), SessionErrorCode::RoleCount);
    assert_eq!(error.code().as_str(), "SESSION_ROLE_COUNT");
    assert_eq!(
        error.to_string(),
        "a session needs exactly one start room, found 0"
    );
}

#[rstest]
fn malformed_message_omits_missing_line() {
    let error = DecodeError::MalformedRecord {
        record: "Lake_Room".into(),
        line: None,
        reason: MalformedReason::MissingName,
    };
    assert_eq!(
        error.to_string(),
        "record `Lake_Room` is malformed: missing `ROOM NAME:` line"
    );
}
