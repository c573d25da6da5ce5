use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EditRejected;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 3] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Late,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Late => "Late",
        }
    }

    /// Counted as attended in percentages
    pub fn attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = EditRejected;

    /// Wire spelling only
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "" => Err(EditRejected::EmptyStatus),
            "Present" => Ok(AttendanceStatus::Present),
            "Absent" => Ok(AttendanceStatus::Absent),
            "Late" => Ok(AttendanceStatus::Late),
            other => Err(EditRejected::UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognized() {
        for status in AttendanceStatus::ALL {
            assert_eq!(status.as_str().parse::<AttendanceStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!("".parse::<AttendanceStatus>(), Err(EditRejected::EmptyStatus));
        assert_eq!(
            "present".parse::<AttendanceStatus>(),
            Err(EditRejected::UnknownStatus("present".to_string()))
        );
        assert!("Excused".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn test_serializes_as_wire_name() {
        assert_eq!(serde_json::to_string(&AttendanceStatus::Late).unwrap(), "\"Late\"");
    }
}
