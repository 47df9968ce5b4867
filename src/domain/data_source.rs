//! Provenance tag for each merged measurement (spec.md §8, Testable Property 6).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceKind {
    Satellite,
    GroundStation,
    Weather,
    Elevation,
}

impl DataSourceKind {
    fn label(self) -> &'static str {
        match self {
            DataSourceKind::Satellite => "satellite",
            DataSourceKind::GroundStation => "ground_station",
            DataSourceKind::Weather => "weather",
            DataSourceKind::Elevation => "elevation",
        }
    }
}

/// A source name plus whether the value it supplied was real or a fallback
/// default. `Display` renders exactly the wire format: the bare name, or the
/// name suffixed with `" (fallback)"`.
#[derive(Debug, Clone, Copy)]
pub struct DataSourceTag {
    pub kind: DataSourceKind,
    pub was_present: bool,
}

impl DataSourceTag {
    pub fn present(kind: DataSourceKind) -> Self {
        Self {
            kind,
            was_present: true,
        }
    }

    pub fn fallback(kind: DataSourceKind) -> Self {
        Self {
            kind,
            was_present: false,
        }
    }
}

impl fmt::Display for DataSourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.was_present {
            write!(f, "{}", self.kind.label())
        } else {
            write!(f, "{} (fallback)", self.kind.label())
        }
    }
}
