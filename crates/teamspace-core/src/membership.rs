//! Membership lookup result.
//!
//! At most one membership exists per (workspace, user). Lookups still report
//! what the backend actually returned so a broken invariant surfaces as an
//! error instead of an arbitrary pick.

use uuid::Uuid;

use crate::error::AppError;
use crate::models::Member;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipLookup {
    None,
    One(Member),
    Multiple(Vec<Member>),
}

impl MembershipLookup {
    pub fn from_rows(mut rows: Vec<Member>) -> Self {
        match rows.len() {
            0 => MembershipLookup::None,
            1 => MembershipLookup::One(rows.remove(0)),
            _ => MembershipLookup::Multiple(rows),
        }
    }

    /// Collapse into the single membership, failing on duplicates.
    pub fn into_member(self, workspace_id: Uuid, user_id: Uuid) -> Result<Option<Member>, AppError> {
        match self {
            MembershipLookup::None => Ok(None),
            MembershipLookup::One(member) => Ok(Some(member)),
            MembershipLookup::Multiple(rows) => Err(AppError::DuplicateMembership {
                workspace_id,
                user_id,
                count: rows.len(),
            }),
        }
    }
}
