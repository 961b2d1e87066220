//! Room storage for the adventure graph.
//!
//! A room owns its neighbour list by name. Insertion order is preserved because
//! the record format enumerates connections in the order they were made.

use std::fmt;

use super::MAX_DEGREE;

/// Role a room plays in a traversal.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Role {
    /// The unique room a session starts in.
    Start,
    /// Any room that is neither start nor end.
    Mid,
    /// The unique room that ends a session.
    End,
}

impl Role {
    /// All roles in record-format order.
    pub const ALL: [Self; 3] = [Self::Start, Self::Mid, Self::End];

    /// Returns the literal token written after `ROOM TYPE:`.
    ///
    /// # Examples
    /// ```
    /// use adventure_core::Role;
    ///
    /// assert_eq!(Role::Start.token(), "START_ROOM");
    /// assert_eq!(Role::from_token("END_ROOM"), Some(Role::End));
    /// assert_eq!(Role::from_token("SIDE_ROOM"), None);
    /// ```
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Start => "START_ROOM",
            Self::Mid => "MID_ROOM",
            Self::End => "END_ROOM",
        }
    }

    /// Parses a record-format role token. Matching is exact and case-sensitive.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.token() == token)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Mid => f.write_str("mid"),
            Self::End => f.write_str("end"),
        }
    }
}

/// Reason a neighbour could not be added to a room.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum LinkRejection {
    MissingRoom,
    SelfLink,
    AlreadyLinked,
    Full,
}

/// A named room with a role and an ordered, bounded neighbour list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    name: String,
    label: String,
    role: Role,
    neighbours: Vec<String>,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>, label: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            role,
            neighbours: Vec::with_capacity(MAX_DEGREE),
        }
    }

    /// Unique room name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label of the record this room is persisted under.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Role of the room.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Neighbour names in connection order.
    #[must_use]
    pub fn neighbours(&self) -> &[String] {
        &self.neighbours
    }

    /// Number of distinct neighbours.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.neighbours.len()
    }

    /// Returns whether `name` is listed as a neighbour.
    #[must_use]
    pub fn is_linked_to(&self, name: &str) -> bool {
        self.neighbours.iter().any(|neighbour| neighbour == name)
    }

    pub(crate) fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    pub(crate) fn check_link(&self, name: &str) -> Result<(), LinkRejection> {
        if self.name == name {
            return Err(LinkRejection::SelfLink);
        }
        if self.is_linked_to(name) {
            return Err(LinkRejection::AlreadyLinked);
        }
        if self.neighbours.len() >= MAX_DEGREE {
            return Err(LinkRejection::Full);
        }
        Ok(())
    }

    pub(crate) fn push_neighbour(&mut self, name: &str) -> Result<(), LinkRejection> {
        self.check_link(name)?;
        self.neighbours.push(name.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("START_ROOM", Some(Role::Start))]
    #[case("MID_ROOM", Some(Role::Mid))]
    #[case("END_ROOM", Some(Role::End))]
    #[case("start_room", None)]
    #[case("SIDE_ROOM", None)]
    #[case("", None)]
    fn from_token_is_exact(#[case] token: &str, #[case] expected: Option<Role>) {
        assert_eq!(Role::from_token(token), expected);
    }

    #[test]
    fn push_neighbour_rejects_self_duplicates_and_overflow() {
        let mut node = Node::new("Lake", "Lake_Room", Role::Mid);
        assert_eq!(node.push_neighbour("Lake"), Err(LinkRejection::SelfLink));

        for name in ["A", "B", "C", "D", "E", "F"] {
            node.push_neighbour(name).expect("below the degree ceiling");
        }
        assert_eq!(node.push_neighbour("A"), Err(LinkRejection::AlreadyLinked));
        assert_eq!(node.push_neighbour("G"), Err(LinkRejection::Full));
        assert_eq!(node.degree(), MAX_DEGREE);
        assert_eq!(node.neighbours().first().map(String::as_str), Some("A"));
    }
}
