//! Derived views over a ledger snapshot.
//!
//! Everything here is pure: the engine loads a consistent snapshot of
//! entries (and members) inside one DB transaction and hands it over. No
//! function writes, and none depends on the stored balance.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{EntryKind, FamilyMember, LedgerEntry, MemberId, Money, SELF_LABEL};

/// Which entries an aggregation looks at, by attribution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemberFilter {
    #[default]
    All,
    /// Exactly this attribution; `None` selects the owner's own entries.
    Only(Option<MemberId>),
}

impl MemberFilter {
    /// Filter selecting the owner's own entries.
    #[must_use]
    pub const fn owner() -> Self {
        Self::Only(None)
    }

    /// Filter selecting one registry member.
    #[must_use]
    pub const fn member(id: MemberId) -> Self {
        Self::Only(Some(id))
    }

    #[must_use]
    pub fn matches(self, member_id: Option<MemberId>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == member_id,
        }
    }
}

/// One point of a daily trend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub total: Money,
}

/// Income, expense and derived balance of one attribution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub income_total: Money,
    pub expense_total: Money,
    /// Always `income_total - expense_total`.
    pub balance: Money,
}

/// A summary row as shown in the family overview.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummaryRow {
    /// `None` for the synthesized owner row.
    pub member_id: Option<MemberId>,
    pub name: String,
    pub role: Option<String>,
    pub color: String,
    pub summary: MemberSummary,
}

fn selected<'a>(
    entries: &'a [LedgerEntry],
    kind: EntryKind,
    filter: MemberFilter,
) -> impl Iterator<Item = &'a LedgerEntry> {
    entries
        .iter()
        .filter(move |e| e.kind == kind && filter.matches(e.member_id))
}

/// Sum of amounts per category for one kind.
pub fn category_totals(
    entries: &[LedgerEntry],
    kind: EntryKind,
    filter: MemberFilter,
) -> BTreeMap<String, Money> {
    let mut totals: BTreeMap<String, Money> = BTreeMap::new();
    for entry in selected(entries, kind, filter) {
        let slot = totals.entry(entry.category_label()).or_default();
        *slot = slot.saturating_add(entry.amount);
    }
    totals
}

/// Daily sums for one kind, ascending by date with one point per day.
///
/// Entries whose stored date does not parse are left out here; they still
/// count in [`category_totals`].
pub fn daily_trend(entries: &[LedgerEntry], kind: EntryKind, filter: MemberFilter) -> Vec<TrendPoint> {
    let mut days: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    for entry in selected(entries, kind, filter) {
        let Some(date) = entry.occurred_on() else {
            continue;
        };
        let slot = days.entry(date).or_default();
        *slot = slot.saturating_add(entry.amount);
    }
    days.into_iter()
        .map(|(date, total)| TrendPoint { date, total })
        .collect()
}

/// Totals for exactly one attribution (`None` = the owner).
pub fn member_summary(entries: &[LedgerEntry], member_id: Option<MemberId>) -> MemberSummary {
    let mut summary = MemberSummary::default();
    for entry in entries.iter().filter(|e| e.member_id == member_id) {
        match entry.kind {
            EntryKind::Income => {
                summary.income_total = summary.income_total.saturating_add(entry.amount);
            }
            EntryKind::Expense => {
                summary.expense_total = summary.expense_total.saturating_add(entry.amount);
            }
        }
    }
    summary.balance = summary.income_total.saturating_sub(summary.expense_total);
    summary
}

/// One row per registry member, plus a leading owner row when no registry
/// row is named `Self`.
pub fn member_summaries(entries: &[LedgerEntry], members: &[FamilyMember]) -> Vec<MemberSummaryRow> {
    let mut rows: Vec<MemberSummaryRow> = members
        .iter()
        .map(|m| MemberSummaryRow {
            member_id: Some(m.id),
            name: m.name.clone(),
            role: m.role.clone(),
            color: m.color.clone(),
            summary: member_summary(entries, Some(m.id)),
        })
        .collect();

    if !members.iter().any(FamilyMember::is_self_row) {
        rows.insert(
            0,
            MemberSummaryRow {
                member_id: None,
                name: SELF_LABEL.to_string(),
                role: Some(crate::OWNER_ROLE.to_string()),
                color: crate::DEFAULT_MEMBER_COLOR.to_string(),
                summary: member_summary(entries, None),
            },
        );
    }
    rows
}

/// Categories by amount descending, ties broken by name.
pub fn ranked_categories(totals: &BTreeMap<String, Money>) -> Vec<(String, Money)> {
    let mut ranked: Vec<(String, Money)> =
        totals.iter().map(|(k, v)| (k.clone(), *v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}
