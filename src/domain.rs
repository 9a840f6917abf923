use serde::{Deserialize, Serialize};

/// Shown in place of a user name when the task's `userId` matches nobody.
pub const UNKNOWN_USER: &str = "unknown user";

/// Canonical task identifier.
///
/// The API serves ids as JSON numbers, but callers (and some proxies) pass
/// them around as strings. Deserialization accepts both forms and everything
/// downstream compares the canonical integer only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TodoId(pub i64);

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for TodoId {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

impl std::str::FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(TodoId)
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct IdVisitor;

        impl serde::de::Visitor<'_> for IdVisitor {
            type Value = TodoId;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an integer or a string containing an integer")
            }

            fn visit_i64<E>(self, v: i64) -> Result<TodoId, E>
            where
                E: serde::de::Error,
            {
                Ok(TodoId(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<TodoId, E>
            where
                E: serde::de::Error,
            {
                i64::try_from(v)
                    .map(TodoId)
                    .map_err(|_| E::custom(format!("todo id out of range: {v}")))
            }

            fn visit_str<E>(self, v: &str) -> Result<TodoId, E>
            where
                E: serde::de::Error,
            {
                v.parse()
                    .map_err(|_| E::custom(format!("invalid todo id: {v:?}")))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
}

/// POST body for a new task. Carries the locally assigned placeholder id;
/// the server echoes the task back (possibly with its own id).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TodoDraft {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
}
