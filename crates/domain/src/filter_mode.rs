use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// How aggressively AAAA answers are hidden for a class of clients.
///
/// Configured per address family. `Filter` hides AAAA record sets whenever a
/// matching A exists, but backs off when the client asked for DNSSEC and the
/// AAAA carries a signature. `BreakDnssec` hides the AAAA even then,
/// knowingly invalidating the signed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Disabled,
    Filter,
    BreakDnssec,
}

impl FilterMode {
    pub fn is_active(&self) -> bool {
        !matches!(self, FilterMode::Disabled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::Disabled => "no",
            FilterMode::Filter => "yes",
            FilterMode::BreakDnssec => "break-dnssec",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Config values accept a plain boolean (`true` = filter, `false` = off) or
/// the string `"break-dnssec"`.
impl<'de> Deserialize<'de> for FilterMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ModeVisitor;

        impl Visitor<'_> for ModeVisitor {
            type Value = FilterMode;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a boolean or the string \"break-dnssec\"")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if value {
                    Ok(FilterMode::Filter)
                } else {
                    Ok(FilterMode::Disabled)
                }
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if value.eq_ignore_ascii_case("break-dnssec") {
                    Ok(FilterMode::BreakDnssec)
                } else {
                    Err(E::custom(format!("unknown filter mode: {value}")))
                }
            }
        }

        deserializer.deserialize_any(ModeVisitor)
    }
}

impl Serialize for FilterMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FilterMode::Disabled => serializer.serialize_bool(false),
            FilterMode::Filter => serializer.serialize_bool(true),
            FilterMode::BreakDnssec => serializer.serialize_str("break-dnssec"),
        }
    }
}
