use std::fmt;
use std::str::FromStr;

/// The record-type vocabulary the filter operates on.
///
/// Anything else that appears in a response travels through untouched as
/// `Other`, so views built from real messages stay lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    AAAA,
    NS,
    RRSIG,
    ANY,
    Other(u16),
}

impl RecordType {
    pub fn to_u16(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::AAAA => 28,
            RecordType::RRSIG => 46,
            RecordType::ANY => 255,
            RecordType::Other(code) => *code,
        }
    }

    pub fn from_u16(code: u16) -> Self {
        match code {
            1 => RecordType::A,
            2 => RecordType::NS,
            28 => RecordType::AAAA,
            46 => RecordType::RRSIG,
            255 => RecordType::ANY,
            other => RecordType::Other(other),
        }
    }

    pub fn is_address(&self) -> bool {
        matches!(self, RecordType::A | RecordType::AAAA)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::A => write!(f, "A"),
            RecordType::AAAA => write!(f, "AAAA"),
            RecordType::NS => write!(f, "NS"),
            RecordType::RRSIG => write!(f, "RRSIG"),
            RecordType::ANY => write!(f, "ANY"),
            RecordType::Other(code) => write!(f, "TYPE{}", code),
        }
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::AAAA),
            "NS" => Ok(RecordType::NS),
            "RRSIG" => Ok(RecordType::RRSIG),
            "ANY" => Ok(RecordType::ANY),
            other => match other.strip_prefix("TYPE") {
                Some(code) => code
                    .parse()
                    .map(RecordType::from_u16)
                    .map_err(|_| format!("Unknown record type: {}", s)),
                None => Err(format!("Unknown record type: {}", s)),
            },
        }
    }
}

/// A non-owning view of one resource-record set inside a response.
///
/// The `suppressed` attribute is the only thing the filter ever mutates: a
/// suppressed set stays in the message tree but is skipped by the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    pub name: String,
    pub rtype: RecordType,
    /// For RRSIG sets, the record type the signature covers.
    pub covers: Option<RecordType>,
    pub suppressed: bool,
}

impl RecordSet {
    pub fn new(name: impl AsRef<str>, rtype: RecordType) -> Self {
        Self {
            name: normalize_name(name.as_ref()),
            rtype,
            covers: None,
            suppressed: false,
        }
    }

    pub fn rrsig(name: impl AsRef<str>, covers: RecordType) -> Self {
        Self {
            name: normalize_name(name.as_ref()),
            rtype: RecordType::RRSIG,
            covers: Some(covers),
            suppressed: false,
        }
    }

    pub fn suppress(&mut self) {
        self.suppressed = true;
    }

    pub fn reveal(&mut self) {
        self.suppressed = false;
    }

    pub fn is_rrsig_covering(&self, covered: RecordType) -> bool {
        self.rtype == RecordType::RRSIG && self.covers == Some(covered)
    }

    pub fn matches(&self, name: &str, rtype: RecordType, covers: Option<RecordType>) -> bool {
        self.rtype == rtype && self.covers == covers && self.name == normalize_name(name)
    }
}

/// DNS owner names compare case-insensitively; the presentation-format views
/// here normalize to lowercase with the trailing dot removed.
pub(crate) fn normalize_name(name: &str) -> String {
    name.trim_end_matches('.').to_lowercase()
}
