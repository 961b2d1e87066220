//! Error types for the adventure core library.
//!
//! Each public error enum carries a stable, machine-readable code so the CLI
//! can log failures without matching on display strings.

use std::fmt;

use thiserror::Error;

use crate::graph::{GraphInvariantViolation, Role};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Retry loop that gave up while drawing random indices.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DrawStage {
    /// Drawing distinct catalog entries for the graph.
    Rooms,
    /// Redrawing the end room until it differs from the start room.
    EndRoom,
}

impl fmt::Display for DrawStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rooms => f.write_str("room selection"),
            Self::EndRoom => f.write_str("end room selection"),
        }
    }
}

/// Error raised while validating a catalog or building a graph.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum BuildError {
    /// The catalog cannot supply enough distinct rooms.
    #[error("catalog holds {entries} room(s) but a graph needs {required}")]
    CatalogTooSmall {
        /// Number of entries supplied.
        entries: usize,
        /// Number of rooms every graph contains.
        required: usize,
    },
    /// Two catalog entries share a room name.
    #[error("catalog lists room `{name}` more than once")]
    DuplicateCatalogName {
        /// The repeated name.
        name: String,
    },
    /// Two catalog entries share a record label.
    #[error("catalog lists record label `{label}` more than once")]
    DuplicateCatalogLabel {
        /// The repeated label.
        label: String,
    },
    /// A room name is empty or contains whitespace.
    #[error("room name `{name}` must be non-empty and contain no whitespace")]
    InvalidRoomName {
        /// The rejected name.
        name: String,
    },
    /// A record label cannot be used as a file name.
    #[error("record label `{label}` must be non-empty and contain no path separators")]
    InvalidRecordLabel {
        /// The rejected label.
        label: String,
    },
    /// A builder parameter was zero where a positive ceiling is required.
    #[error("{parameter} must be greater than zero")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
    },
    /// A random-draw retry loop hit its ceiling.
    #[error("{stage} gave up after {draws} draw(s)")]
    SelectionExhausted {
        /// Loop that gave up.
        stage: DrawStage,
        /// Draws attempted before giving up.
        draws: usize,
    },
    /// Edge construction did not reach the minimum degree within the ceiling.
    #[error("edge construction did not reach the minimum degree after {passes} pass(es)")]
    EdgePassesExhausted {
        /// Passes attempted before giving up.
        passes: usize,
    },
    /// The finished graph failed its structural post-conditions.
    #[error("generated graph is invalid: {violation}")]
    InvariantViolation {
        /// First violation found by the post-construction check.
        #[from]
        violation: GraphInvariantViolation,
    },
}

define_error_codes! {
    /// Stable codes describing [`BuildError`] variants.
    enum BuildErrorCode for BuildError {
        /// The catalog cannot supply enough distinct rooms.
        CatalogTooSmall => CatalogTooSmall { .. } => "BUILD_CATALOG_TOO_SMALL",
        /// Two catalog entries share a room name.
        DuplicateCatalogName => DuplicateCatalogName { .. } => "BUILD_DUPLICATE_CATALOG_NAME",
        /// Two catalog entries share a record label.
        DuplicateCatalogLabel => DuplicateCatalogLabel { .. } => "BUILD_DUPLICATE_CATALOG_LABEL",
        /// A room name is empty or contains whitespace.
        InvalidRoomName => InvalidRoomName { .. } => "BUILD_INVALID_ROOM_NAME",
        /// A record label cannot be used as a file name.
        InvalidRecordLabel => InvalidRecordLabel { .. } => "BUILD_INVALID_RECORD_LABEL",
        /// A builder parameter was zero.
        InvalidParameter => InvalidParameter { .. } => "BUILD_INVALID_PARAMETER",
        /// A random-draw retry loop hit its ceiling.
        SelectionExhausted => SelectionExhausted { .. } => "BUILD_SELECTION_EXHAUSTED",
        /// Edge construction hit its pass ceiling.
        EdgePassesExhausted => EdgePassesExhausted { .. } => "BUILD_EDGE_PASSES_EXHAUSTED",
        /// The finished graph failed its post-conditions.
        InvariantViolation => InvariantViolation { .. } => "BUILD_INVARIANT_VIOLATION",
    }
}

/// Why a single record could not be parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MalformedReason {
    /// No `ROOM NAME:` line was present.
    MissingName,
    /// No `ROOM TYPE:` line was present.
    MissingRole,
    /// The `ROOM TYPE:` value is not one of the three role literals.
    UnknownRole {
        /// Token found after `ROOM TYPE:`.
        token: String,
    },
    /// A name or connection value is empty or holds more than one word.
    InvalidName {
        /// Raw value that was rejected.
        value: String,
    },
    /// A field tag appeared twice.
    DuplicateField {
        /// Tag that was repeated.
        field: &'static str,
    },
    /// A connection line carries the wrong enumeration index.
    ConnectionIndex {
        /// Index the line should have carried.
        expected: usize,
        /// Index text actually found.
        found: String,
    },
    /// A field appeared outside the name, connections, type order.
    OutOfOrder {
        /// Tag that appeared too late or too early.
        field: &'static str,
    },
    /// The line does not start with any known field tag.
    UnexpectedLine {
        /// The offending line.
        content: String,
    },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => f.write_str("missing `ROOM NAME:` line"),
            Self::MissingRole => f.write_str("missing `ROOM TYPE:` line"),
            Self::UnknownRole { token } => write!(f, "unknown room type `{token}`"),
            Self::InvalidName { value } => write!(f, "invalid room name `{value}`"),
            Self::DuplicateField { field } => write!(f, "`{field}` appears more than once"),
            Self::ConnectionIndex { expected, found } => {
                write!(f, "expected connection {expected}, found `{found}`")
            }
            Self::OutOfOrder { field } => write!(f, "`{field}` is out of order"),
            Self::UnexpectedLine { content } => write!(f, "unexpected line `{content}`"),
        }
    }
}

/// Error raised while decoding a record set back into a graph.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DecodeError {
    /// A record could not be parsed.
    #[error("record `{record}` is malformed{}: {reason}", line_suffix(.line))]
    MalformedRecord {
        /// Label of the offending record.
        record: String,
        /// One-based line number, when the problem is tied to a line.
        line: Option<usize>,
        /// What was wrong.
        reason: MalformedReason,
    },
    /// Two records declare the same room name.
    #[error("room `{name}` is declared by more than one record")]
    DuplicateRoomName {
        /// The repeated name.
        name: String,
    },
    /// A connection names a room no record declares.
    #[error("room `{room}` connects to unknown room `{target}`")]
    UnresolvedConnection {
        /// Room whose record holds the connection.
        room: String,
        /// Name that could not be resolved.
        target: String,
    },
    /// A room lists itself as a connection.
    #[error("room `{room}` connects to itself")]
    SelfConnection {
        /// The offending room.
        room: String,
    },
    /// A room lists the same neighbour twice.
    #[error("room `{room}` lists `{target}` more than once")]
    DuplicateConnection {
        /// The offending room.
        room: String,
        /// The repeated neighbour.
        target: String,
    },
    /// A room lists more neighbours than the degree ceiling allows.
    #[error("room `{room}` lists {count} connections; at most {max} are allowed")]
    TooManyConnections {
        /// The offending room.
        room: String,
        /// Connections listed.
        count: usize,
        /// Degree ceiling.
        max: usize,
    },
    /// The record set does not hold exactly one start and one end room.
    #[error("expected exactly one start and one end room, found {starts} start and {ends} end")]
    RoleCardinality {
        /// Number of start rooms found.
        starts: usize,
        /// Number of end rooms found.
        ends: usize,
    },
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|number| format!(" at line {number}"))
        .unwrap_or_default()
}

define_error_codes! {
    /// Stable codes describing [`DecodeError`] variants.
    enum DecodeErrorCode for DecodeError {
        /// A record could not be parsed.
        MalformedRecord => MalformedRecord { .. } => "DECODE_MALFORMED_RECORD",
        /// Two records declare the same room name.
        DuplicateRoomName => DuplicateRoomName { .. } => "DECODE_DUPLICATE_ROOM_NAME",
        /// A connection names a room no record declares.
        UnresolvedConnection => UnresolvedConnection { .. } => "DECODE_UNRESOLVED_CONNECTION",
        /// A room lists itself as a connection.
        SelfConnection => SelfConnection { .. } => "DECODE_SELF_CONNECTION",
        /// A room lists the same neighbour twice.
        DuplicateConnection => DuplicateConnection { .. } => "DECODE_DUPLICATE_CONNECTION",
        /// A room lists too many neighbours.
        TooManyConnections => TooManyConnections { .. } => "DECODE_TOO_MANY_CONNECTIONS",
        /// Start/end room cardinality is wrong.
        RoleCardinality => RoleCardinality { .. } => "DECODE_ROLE_CARDINALITY",
    }
}

/// Error raised when a traversal session cannot start.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SessionError {
    /// The graph does not hold exactly one room with the given role.
    #[error("a session needs exactly one {role} room, found {found}")]
    RoleCount {
        /// Role that was missing or repeated.
        role: Role,
        /// Number of rooms holding it.
        found: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`SessionError`] variants.
    enum SessionErrorCode for SessionError {
        /// The graph lacks a unique start or end room.
        RoleCount => RoleCount { .. } => "SESSION_ROLE_COUNT",
    }
}
