//! CSV export of the ledger.

use std::{collections::HashMap, io::Write};

use csv::Writer;
use engine::{DEFAULT_CATEGORY, FamilyMember, LedgerEntry, MemberId, SELF_LABEL, UNKNOWN_LABEL};
use serde::Serialize;

use crate::error::Result;

#[derive(Serialize)]
struct ExportRow<'a> {
    id: i64,
    date: &'a str,
    kind: &'static str,
    amount: String,
    amount_minor: i64,
    category: &'a str,
    description: &'a str,
    member: &'a str,
}

/// Writes `entries` in the given order, one row each, with the stored
/// category and description as-is and member names resolved against
/// `members`. Returns the number of rows written.
pub fn write_entries<W: Write>(
    out: W,
    entries: &[LedgerEntry],
    members: &[FamilyMember],
) -> Result<usize> {
    let names: HashMap<MemberId, &str> = members.iter().map(|m| (m.id, m.name.as_str())).collect();

    let mut writer = Writer::from_writer(out);
    for entry in entries {
        let member = match entry.member_id {
            None => SELF_LABEL,
            Some(id) => names.get(&id).copied().unwrap_or(UNKNOWN_LABEL),
        };
        writer.serialize(ExportRow {
            id: entry.id,
            date: &entry.date,
            kind: entry.kind.as_str(),
            amount: entry.amount.to_string(),
            amount_minor: entry.amount.minor(),
            category: entry.category.as_deref().unwrap_or(DEFAULT_CATEGORY),
            description: entry.description.as_deref().unwrap_or_default(),
            member,
        })?;
    }
    writer.flush()?;
    Ok(entries.len())
}
