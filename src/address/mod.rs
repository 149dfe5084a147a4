//! Address Reference Data
//!
//! Types for the 4-level region / province / city / barangay hierarchy.

pub mod resolver;

pub use resolver::{FetchTicket, SelectionResolver};

use serde::{Deserialize, Serialize};

/// PSGC code for the National Capital Region. Selecting it skips the
/// province level entirely.
pub const NCR_CODE: &str = "130000000";

/// One entry from a reference-data pick list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefItem {
    pub code: String,
    pub name: String,
}

impl RefItem {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// The four dependent selection levels, in parent-to-child order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressLevel {
    Region,
    Province,
    City,
    Barangay,
}

impl AddressLevel {
    pub const ALL: [AddressLevel; 4] = [
        AddressLevel::Region,
        AddressLevel::Province,
        AddressLevel::City,
        AddressLevel::Barangay,
    ];

    pub fn index(self) -> usize {
        match self {
            AddressLevel::Region => 0,
            AddressLevel::Province => 1,
            AddressLevel::City => 2,
            AddressLevel::Barangay => 3,
        }
    }

    fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }
}

impl std::fmt::Display for AddressLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressLevel::Region => write!(f, "region"),
            AddressLevel::Province => write!(f, "province"),
            AddressLevel::City => write!(f, "city"),
            AddressLevel::Barangay => write!(f, "barangay"),
        }
    }
}

/// A resolved (possibly partial) address selection plus free-text street.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSelection {
    pub region: Option<RefItem>,
    pub province: Option<RefItem>,
    pub city: Option<RefItem>,
    pub barangay: Option<RefItem>,
    pub street: String,
}

impl AddressSelection {
    pub fn get(&self, level: AddressLevel) -> Option<&RefItem> {
        match level {
            AddressLevel::Region => self.region.as_ref(),
            AddressLevel::Province => self.province.as_ref(),
            AddressLevel::City => self.city.as_ref(),
            AddressLevel::Barangay => self.barangay.as_ref(),
        }
    }

    pub fn set(&mut self, level: AddressLevel, item: Option<RefItem>) {
        match level {
            AddressLevel::Region => self.region = item,
            AddressLevel::Province => self.province = item,
            AddressLevel::City => self.city = item,
            AddressLevel::Barangay => self.barangay = item,
        }
    }

    /// Whether the region selection is the capital-region sentinel.
    pub fn is_ncr(&self) -> bool {
        self.region
            .as_ref()
            .map(|r| r.code == NCR_CODE)
            .unwrap_or(false)
    }

    /// Complete enough to submit: every level selected, except province
    /// under NCR.
    pub fn is_complete(&self) -> bool {
        self.region.is_some()
            && (self.is_ncr() || self.province.is_some())
            && self.city.is_some()
            && self.barangay.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness_skips_province_under_ncr() {
        let mut address = AddressSelection::default();
        address.region = Some(RefItem::new(NCR_CODE, "NCR"));
        address.city = Some(RefItem::new("137504000", "Caloocan"));
        address.barangay = Some(RefItem::new("137504143", "Barangay 143"));
        assert!(address.is_complete());

        address.region = Some(RefItem::new("040000000", "Region IV-A"));
        assert!(!address.is_complete());
    }
}
