//! Ledger and aggregation engine for a family finance tracker.
//!
//! The engine owns the persistent data model (users, family members, the
//! ledger, the stored balance and the savings goal) and derives category
//! totals, daily trends and per-member summaries from it. Every operation
//! except registration and login takes a [`Session`], which scopes it to one
//! user.

pub use analytics::{MemberFilter, MemberSummary, MemberSummaryRow, TrendPoint};
pub use commands::{NewMemberCmd, RecordCmd};
pub use error::{EngineError, ErrorKind};
pub use family_members::{
    DEFAULT_MEMBER_COLOR, FamilyMember, MAX_FAMILY_MEMBERS, MemberId, OWNER_ROLE, SELF_LABEL,
    UNKNOWN_LABEL,
};
pub use history::{DEFAULT_CATEGORY, ENTRY_DATE_FORMAT, EntryId, EntryKind, LedgerEntry};
pub use money::Money;
pub use ops::{Engine, EngineBuilder, GoalProgress};
pub use session::Session;
pub use users::UserId;

pub mod analytics;
mod balance;
mod commands;
mod credentials;
mod error;
mod family_members;
mod goals;
mod history;
mod money;
mod ops;
mod session;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;

/// Built-in category suggestions offered to hosts.
pub const DEFAULT_CATEGORIES: [&str; 10] = [
    "Food",
    "Transport",
    "Entertainment",
    "Shopping",
    "Utilities",
    "Health",
    "Education",
    "Gifts",
    "Clothing",
    DEFAULT_CATEGORY,
];
