use chrono::Utc;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

/// Identifier of a list entry.
///
/// Either the TMDB id of the title that was added, or a millisecond
/// timestamp synthesized when the entry was created without one. Backends
/// may hand it back as a JSON integer or as a numeric string; both parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl ItemId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(ItemId)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ItemIdVisitor;

        impl<'de> Visitor<'de> for ItemIdVisitor {
            type Value = ItemId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or a numeric string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ItemId, E> {
                Ok(ItemId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ItemId, E> {
                i64::try_from(v)
                    .map(ItemId)
                    .map_err(|_| E::custom(format!("id {} is out of range", v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<ItemId, E> {
                // JS clients occasionally send Date.now() through float paths
                if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                    Ok(ItemId(v as i64))
                } else {
                    Err(E::custom(format!("id {} is not an integer", v)))
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ItemId, E> {
                v.parse::<ItemId>()
                    .map_err(|_| E::custom(format!("id {:?} is not numeric", v)))
            }
        }

        deserializer.deserialize_any(ItemIdVisitor)
    }
}

/// Hands out millisecond-timestamp ids that never repeat within a process.
///
/// Two creates in the same millisecond get consecutive values instead of
/// colliding.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> ItemId {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        ItemId(now.max(previous + 1))
    }
}
