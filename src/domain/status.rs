//! Dataset status set and transition table.

use serde::{Deserialize, Serialize};

/// Processing status of a dataset in the metadata service.
///
/// The declaration order is the lifecycle order: a dataset moves forward
/// through these values and never backward. `Ord` follows the same order, so
/// `Submitted < Processing < Processed < Released`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DatasetStatus {
    Submitted,
    Processing,
    Processed,
    Released,
}

impl DatasetStatus {
    /// The fixed transition table: the status a dataset advances to next.
    ///
    /// `Released` is terminal and has no successor.
    pub fn next(&self) -> Option<DatasetStatus> {
        match self {
            DatasetStatus::Submitted => Some(DatasetStatus::Processing),
            DatasetStatus::Processing => Some(DatasetStatus::Processed),
            DatasetStatus::Processed => Some(DatasetStatus::Released),
            DatasetStatus::Released => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetStatus::Submitted => "Submitted",
            DatasetStatus::Processing => "Processing",
            DatasetStatus::Processed => "Processed",
            DatasetStatus::Released => "Released",
        }
    }
}

impl std::fmt::Display for DatasetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DatasetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Submitted" => Ok(DatasetStatus::Submitted),
            "Processing" => Ok(DatasetStatus::Processing),
            "Processed" => Ok(DatasetStatus::Processed),
            "Released" => Ok(DatasetStatus::Released),
            _ => Err(format!("Invalid dataset status: {}", s)),
        }
    }
}
