use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*, sea_query::Expr,
};
use tracing::{debug, info};

use crate::{
    DEFAULT_MEMBER_COLOR, EngineError, FamilyMember, MAX_FAMILY_MEMBERS, MemberId, NewMemberCmd,
    ResultEngine, SELF_LABEL, Session, UNKNOWN_LABEL, UserId, family_members, history,
};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Lists the session user's family members in insertion order.
    pub async fn list_members(&self, session: &Session) -> ResultEngine<Vec<FamilyMember>> {
        let user_id = self.authenticate(session).await?;
        with_tx!(self, |db_tx| members_of(&db_tx, user_id).await)
    }

    /// Returns one member of the session user.
    pub async fn member(&self, session: &Session, member_id: MemberId) -> ResultEngine<FamilyMember> {
        let user_id = self.authenticate(session).await?;
        with_tx!(self, |db_tx| {
            let model = require_owned_member(&db_tx, user_id, member_id).await?;
            Ok(FamilyMember::from(model))
        })
    }

    /// Adds a member. Fails with `LimitExceeded` once the owner already has
    /// [`MAX_FAMILY_MEMBERS`] rows (the seeded `Self` row counts).
    pub async fn add_member(&self, session: &Session, cmd: NewMemberCmd) -> ResultEngine<MemberId> {
        let user_id = self.authenticate(session).await?;
        let name = normalize_required_name(&cmd.name, "member name")?;
        let role = normalize_optional_text(cmd.role.as_deref());
        let color = normalize_optional_text(cmd.color.as_deref())
            .unwrap_or_else(|| DEFAULT_MEMBER_COLOR.to_string());
        let avatar = normalize_optional_text(cmd.avatar.as_deref());

        with_tx!(self, |db_tx| {
            let count = family_members::Entity::find()
                .filter(family_members::Column::OwnerId.eq(user_id))
                .count(&db_tx)
                .await?;
            if count >= MAX_FAMILY_MEMBERS {
                return Err(EngineError::LimitExceeded(format!(
                    "at most {MAX_FAMILY_MEMBERS} family members"
                )));
            }

            let model = family_members::ActiveModel {
                id: ActiveValue::NotSet,
                owner_id: ActiveValue::Set(user_id),
                name: ActiveValue::Set(name),
                role: ActiveValue::Set(role),
                color: ActiveValue::Set(Some(color)),
                avatar: ActiveValue::Set(avatar),
            }
            .insert(&db_tx)
            .await?;

            debug!(user_id, member_id = model.id, "added family member");
            Ok(model.id)
        })
    }

    /// Removes a member of the session user. Its ledger entries stay and
    /// fall back to the owner.
    pub async fn remove_member(&self, session: &Session, member_id: MemberId) -> ResultEngine<()> {
        let user_id = self.authenticate(session).await?;
        with_tx!(self, |db_tx| {
            require_owned_member(&db_tx, user_id, member_id).await?;

            let detached = history::Entity::update_many()
                .col_expr(history::Column::MemberId, Expr::value(Option::<MemberId>::None))
                .filter(history::Column::UserId.eq(user_id))
                .filter(history::Column::MemberId.eq(member_id))
                .exec(&db_tx)
                .await?;
            family_members::Entity::delete_by_id(member_id)
                .exec(&db_tx)
                .await?;

            info!(
                user_id,
                member_id,
                detached = detached.rows_affected,
                "removed family member"
            );
            Ok(())
        })
    }

    /// Display name for an attribution: `Self` for `None`, the stored name
    /// for a member of the session user, `Unknown` otherwise.
    pub async fn resolve_name(
        &self,
        session: &Session,
        member_id: Option<MemberId>,
    ) -> ResultEngine<String> {
        let user_id = self.authenticate(session).await?;
        let Some(member_id) = member_id else {
            return Ok(SELF_LABEL.to_string());
        };
        with_tx!(self, |db_tx| {
            let name = family_members::Entity::find_by_id(member_id)
                .filter(family_members::Column::OwnerId.eq(user_id))
                .one(&db_tx)
                .await?
                .map(|m| m.name)
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
            Ok(name)
        })
    }
}

pub(super) async fn members_of(
    db_tx: &DatabaseTransaction,
    user_id: UserId,
) -> ResultEngine<Vec<FamilyMember>> {
    let rows = family_members::Entity::find()
        .filter(family_members::Column::OwnerId.eq(user_id))
        .order_by_asc(family_members::Column::Id)
        .all(db_tx)
        .await?;
    Ok(rows.into_iter().map(FamilyMember::from).collect())
}

/// Loads a member, hiding members of other users behind `NotOwner`.
pub(super) async fn require_owned_member(
    db_tx: &DatabaseTransaction,
    user_id: UserId,
    member_id: MemberId,
) -> ResultEngine<family_members::Model> {
    family_members::Entity::find_by_id(member_id)
        .one(db_tx)
        .await?
        .filter(|m| m.owner_id == user_id)
        .ok_or_else(|| EngineError::NotOwner(format!("member {member_id}")))
}
