use crate::domain::model::{NavStatus, VesselRecord, VesselStatus};
use std::collections::BTreeSet;

/// Which status groups take part in the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    /// Drops code 15 ("Unknown or undefined"); reports without a status are kept.
    ExcludeUndefined,
    Only(BTreeSet<VesselStatus>),
}

impl StatusFilter {
    /// 空集合代表不過濾
    pub fn from_selection(selected: BTreeSet<VesselStatus>, exclude_undefined: bool) -> Self {
        if !selected.is_empty() {
            let mut selected = selected;
            if exclude_undefined {
                selected.remove(&VesselStatus::Code(NavStatus::Undefined));
            }
            StatusFilter::Only(selected)
        } else if exclude_undefined {
            StatusFilter::ExcludeUndefined
        } else {
            StatusFilter::All
        }
    }

    pub fn allows(&self, status: VesselStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::ExcludeUndefined => status != VesselStatus::Code(NavStatus::Undefined),
            StatusFilter::Only(selected) => selected.contains(&status),
        }
    }

    /// 例如只選 15 又排除 15，結果會是空集合
    pub fn rejects_everything(&self) -> bool {
        matches!(self, StatusFilter::Only(selected) if selected.is_empty())
    }

    pub fn apply(&self, records: Vec<VesselRecord>) -> Vec<VesselRecord> {
        match self {
            StatusFilter::All => records,
            _ => records.into_iter().filter(|r| self.allows(r.status)).collect(),
        }
    }
}

/// Parses a status selection such as `0,1,5,unknown`.
pub fn parse_status_token(token: &str) -> std::result::Result<VesselStatus, String> {
    let token = token.trim();
    if token.eq_ignore_ascii_case("unknown") || token.eq_ignore_ascii_case("none") {
        return Ok(VesselStatus::Unknown);
    }

    let code: u8 = token
        .parse()
        .map_err(|_| format!("'{}' is not a status code", token))?;
    NavStatus::try_from(code)
        .map(VesselStatus::Code)
        .map_err(|code| format!("status code {} outside 0-15", code))
}
