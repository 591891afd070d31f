//! Command structs for engine write operations.
//!
//! These types group the optional parameters of `record` and `add_member`,
//! keeping call sites readable and avoiding long argument lists.

use chrono::NaiveDateTime;

use crate::{EntryKind, MemberId, Money};

/// Record a ledger entry.
#[derive(Clone, Debug)]
pub struct RecordCmd {
    pub kind: EntryKind,
    pub amount: Money,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Defaults to the local time of recording.
    pub occurred_at: Option<NaiveDateTime>,
    /// `None` attributes the entry to the account owner.
    pub member_id: Option<MemberId>,
}

impl RecordCmd {
    #[must_use]
    pub fn new(kind: EntryKind, amount: Money) -> Self {
        Self {
            kind,
            amount,
            category: None,
            description: None,
            occurred_at: None,
            member_id: None,
        }
    }

    #[must_use]
    pub fn income(amount: Money) -> Self {
        Self::new(EntryKind::Income, amount)
    }

    #[must_use]
    pub fn expense(amount: Money) -> Self {
        Self::new(EntryKind::Expense, amount)
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: NaiveDateTime) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    #[must_use]
    pub fn member(mut self, member_id: MemberId) -> Self {
        self.member_id = Some(member_id);
        self
    }
}

/// Add a family member.
#[derive(Clone, Debug)]
pub struct NewMemberCmd {
    pub name: String,
    pub role: Option<String>,
    /// Defaults to [`DEFAULT_MEMBER_COLOR`](crate::DEFAULT_MEMBER_COLOR).
    pub color: Option<String>,
    pub avatar: Option<String>,
}

impl NewMemberCmd {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
            color: None,
            avatar: None,
        }
    }

    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}
