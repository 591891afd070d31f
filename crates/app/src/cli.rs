use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{ENTRY_DATE_FORMAT, EntryKind, MemberFilter, MemberId, Money};

#[derive(Parser, Debug)]
#[command(name = "hearthbook")]
#[command(about = "Family finance ledger: incomes, expenses, members and reports")]
pub struct Cli {
    /// Optional config file path (TOML, extension may be omitted).
    #[arg(long, env = "HEARTHBOOK_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct Account {
    /// Account name; falls back to `app.username` from the settings.
    /// The password is always prompted for.
    #[arg(long, short)]
    pub username: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account.
    Register(Account),
    /// Show or overwrite the stored balance.
    Balance(Balance),
    /// Show or overwrite the savings goal.
    Goal(Goal),
    /// Manage family members.
    Member(Member),
    /// Add an income or expense.
    Record(Record),
    /// Print the ledger, newest first.
    History(History),
    /// Aggregated views over the ledger.
    Report(Report),
    /// Write the whole ledger as CSV.
    Export(Export),
    /// Delete the account and everything it owns.
    DeleteAccount(DeleteAccount),
}

#[derive(Args, Debug)]
pub struct Balance {
    #[command(flatten)]
    pub account: Account,
    #[command(subcommand)]
    pub command: BalanceCommand,
}

#[derive(Subcommand, Debug)]
pub enum BalanceCommand {
    Get,
    Set {
        #[arg(allow_negative_numbers = true)]
        amount: Money,
    },
    /// Stored balance plus the derived balance of every other member.
    Family,
}

#[derive(Args, Debug)]
pub struct Goal {
    #[command(flatten)]
    pub account: Account,
    #[command(subcommand)]
    pub command: GoalCommand,
}

#[derive(Subcommand, Debug)]
pub enum GoalCommand {
    /// Show the target and the progress towards it.
    Get,
    Set { target: Money },
}

#[derive(Args, Debug)]
pub struct Member {
    #[command(flatten)]
    pub account: Account,
    #[command(subcommand)]
    pub command: MemberCommand,
}

#[derive(Subcommand, Debug)]
pub enum MemberCommand {
    List,
    Add {
        name: String,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Remove a member; its entries fall back to the owner.
    Remove { id: MemberId },
}

#[derive(Args, Debug)]
pub struct Record {
    #[command(flatten)]
    pub account: Account,
    #[command(subcommand)]
    pub command: RecordCommand,
}

#[derive(Subcommand, Debug)]
pub enum RecordCommand {
    Income(EntryArgs),
    Expense(EntryArgs),
}

#[derive(Args, Debug)]
pub struct EntryArgs {
    pub amount: Money,
    /// Free text, e.g. Food or Transport; blank means `Other`.
    #[arg(long, short)]
    pub category: Option<String>,
    #[arg(long, short)]
    pub description: Option<String>,
    /// Attribute the entry to this member instead of the owner.
    #[arg(long, short)]
    pub member: Option<MemberId>,
    /// Timestamp as `dd.mm.yyyy HH:MM`; defaults to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub at: Option<NaiveDateTime>,
}

#[derive(Args, Debug)]
pub struct History {
    #[command(flatten)]
    pub account: Account,
    #[arg(long, default_value_t = 20)]
    pub limit: u64,
    /// Cursor printed by the previous page.
    #[arg(long)]
    pub cursor: Option<String>,
}

#[derive(Args, Debug)]
pub struct Report {
    #[command(flatten)]
    pub account: Account,
    #[command(subcommand)]
    pub command: ReportCommand,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// Totals per category, largest first.
    Categories(ReportArgs),
    /// Daily totals, oldest first.
    Trend(ReportArgs),
    /// Income, expense and balance per member.
    Members,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[arg(long, value_enum, default_value_t = KindArg::Expense)]
    pub kind: KindArg,
    /// `self` for the owner, a member id, or omitted for everyone.
    #[arg(long, value_parser = parse_member_filter, default_value = "all")]
    pub member: MemberFilter,
}

#[derive(Args, Debug)]
pub struct Export {
    #[command(flatten)]
    pub account: Account,
    #[arg(long, short)]
    pub out: PathBuf,
}

#[derive(Args, Debug)]
pub struct DeleteAccount {
    #[command(flatten)]
    pub account: Account,
    /// Required; there is no undo.
    #[arg(long)]
    pub yes: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Income,
    Expense,
}

impl From<KindArg> for EntryKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Income => EntryKind::Income,
            KindArg::Expense => EntryKind::Expense,
        }
    }
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw.trim(), ENTRY_DATE_FORMAT)
        .map_err(|_| format!("expected dd.mm.yyyy HH:MM, got {raw:?}"))
}

fn parse_member_filter(raw: &str) -> Result<MemberFilter, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "all" => Ok(MemberFilter::All),
        "self" => Ok(MemberFilter::owner()),
        other => other
            .parse::<MemberId>()
            .map(MemberFilter::member)
            .map_err(|_| format!("expected all, self or a member id, got {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn member_filter_values() {
        assert_eq!(parse_member_filter("all").unwrap(), MemberFilter::All);
        assert_eq!(parse_member_filter("Self").unwrap(), MemberFilter::owner());
        assert_eq!(parse_member_filter("4").unwrap(), MemberFilter::member(4));
        assert!(parse_member_filter("kid").is_err());
    }

    #[test]
    fn record_arguments_parse() {
        let cli = Cli::try_parse_from([
            "hearthbook",
            "record",
            "--username",
            "alice",
            "expense",
            "12,50",
            "--category",
            "Food",
            "--at",
            "05.03.2024 12:30",
        ])
        .unwrap();

        let Command::Record(record) = cli.command else {
            panic!("expected record command");
        };
        assert_eq!(record.account.username.as_deref(), Some("alice"));
        let RecordCommand::Expense(args) = record.command else {
            panic!("expected expense");
        };
        assert_eq!(args.amount, Money::new(1250));
        assert_eq!(args.category.as_deref(), Some("Food"));
        assert_eq!(
            args.at.map(|at| at.format(ENTRY_DATE_FORMAT).to_string()),
            Some("05.03.2024 12:30".to_string())
        );
    }

    #[test]
    fn balance_set_accepts_negative_amounts() {
        let cli =
            Cli::try_parse_from(["hearthbook", "balance", "-u", "alice", "set", "-20.5"]).unwrap();
        let Command::Balance(balance) = cli.command else {
            panic!("expected balance command");
        };
        let BalanceCommand::Set { amount } = balance.command else {
            panic!("expected set");
        };
        assert_eq!(amount, Money::new(-2050));
    }
}
