use std::collections::BTreeMap;

use sea_orm::TransactionTrait;

use crate::{
    EntryKind, MemberFilter, MemberId, MemberSummary, MemberSummaryRow, Money, ResultEngine,
    Session, TrendPoint, analytics,
};

use super::{Engine, family::members_of, ledger::entries_of, with_tx};

impl Engine {
    /// Sum per category for `kind`, restricted by `filter`.
    pub async fn category_totals(
        &self,
        session: &Session,
        kind: EntryKind,
        filter: MemberFilter,
    ) -> ResultEngine<BTreeMap<String, Money>> {
        let user_id = self.authenticate(session).await?;
        with_tx!(self, |db_tx| {
            let entries = entries_of(&db_tx, user_id).await?;
            Ok(analytics::category_totals(&entries, kind, filter))
        })
    }

    /// Daily sums for `kind`, ascending by date.
    pub async fn daily_trend(
        &self,
        session: &Session,
        kind: EntryKind,
        filter: MemberFilter,
    ) -> ResultEngine<Vec<TrendPoint>> {
        let user_id = self.authenticate(session).await?;
        with_tx!(self, |db_tx| {
            let entries = entries_of(&db_tx, user_id).await?;
            Ok(analytics::daily_trend(&entries, kind, filter))
        })
    }

    /// Derived totals of one attribution. For `None` this is independent of
    /// the stored balance.
    pub async fn member_summary(
        &self,
        session: &Session,
        member_id: Option<MemberId>,
    ) -> ResultEngine<MemberSummary> {
        let user_id = self.authenticate(session).await?;
        with_tx!(self, |db_tx| {
            let entries = entries_of(&db_tx, user_id).await?;
            Ok(analytics::member_summary(&entries, member_id))
        })
    }

    pub async fn all_member_summaries(
        &self,
        session: &Session,
    ) -> ResultEngine<Vec<MemberSummaryRow>> {
        let user_id = self.authenticate(session).await?;
        with_tx!(self, |db_tx| {
            let entries = entries_of(&db_tx, user_id).await?;
            let members = members_of(&db_tx, user_id).await?;
            Ok(analytics::member_summaries(&entries, &members))
        })
    }
}
