use std::{collections::HashMap, fs::File, io::BufWriter, path::Path};

use engine::{Engine, EntryKind, MemberId, NewMemberCmd, RecordCmd, Session, analytics};

use crate::{
    cli::{
        Account, BalanceCommand, Command, EntryArgs, GoalCommand, MemberCommand, RecordCommand,
        ReportCommand,
    },
    error::{AppError, Result},
    export, prompt,
    settings::Settings,
};

pub async fn run(engine: &Engine, settings: &Settings, command: Command) -> Result<()> {
    match command {
        Command::Register(account) => {
            let username = username(&account, settings)?;
            let password = prompt::new_password()?;
            engine.register(&username, &password).await?;
            println!("created account: {username}");
            Ok(())
        }
        Command::DeleteAccount(args) => {
            if !args.yes {
                return Err(AppError::Usage(
                    "refusing to delete the account without --yes".to_string(),
                ));
            }
            let session = login(engine, &args.account, settings).await?;
            engine.delete_account(&session).await?;
            println!("deleted account: {}", session.username());
            Ok(())
        }
        Command::Balance(args) => {
            let session = login(engine, &args.account, settings).await?;
            let outcome = balance(engine, &session, args.command).await;
            finish(engine, &session, outcome).await
        }
        Command::Goal(args) => {
            let session = login(engine, &args.account, settings).await?;
            let outcome = goal(engine, &session, args.command).await;
            finish(engine, &session, outcome).await
        }
        Command::Member(args) => {
            let session = login(engine, &args.account, settings).await?;
            let outcome = member(engine, &session, args.command).await;
            finish(engine, &session, outcome).await
        }
        Command::Record(args) => {
            let session = login(engine, &args.account, settings).await?;
            let outcome = record(engine, &session, args.command).await;
            finish(engine, &session, outcome).await
        }
        Command::History(args) => {
            let session = login(engine, &args.account, settings).await?;
            let outcome = history(engine, &session, args.limit, args.cursor.as_deref()).await;
            finish(engine, &session, outcome).await
        }
        Command::Report(args) => {
            let session = login(engine, &args.account, settings).await?;
            let outcome = report(engine, &session, args.command).await;
            finish(engine, &session, outcome).await
        }
        Command::Export(args) => {
            let session = login(engine, &args.account, settings).await?;
            let outcome = export_ledger(engine, &session, &args.out).await;
            finish(engine, &session, outcome).await
        }
    }
}

fn username(account: &Account, settings: &Settings) -> Result<String> {
    account
        .username
        .clone()
        .or_else(|| settings.app.username.clone())
        .ok_or_else(|| AppError::Usage("--username is required".to_string()))
}

async fn login(engine: &Engine, account: &Account, settings: &Settings) -> Result<Session> {
    let username = username(account, settings)?;
    let password = prompt::password("Password: ")?;
    Ok(engine.login(&username, &password).await?)
}

/// Closes the session, reporting the action's own error first.
async fn finish(engine: &Engine, session: &Session, outcome: Result<()>) -> Result<()> {
    let closed = engine.logout(session).await;
    outcome?;
    Ok(closed?)
}

async fn export_ledger(engine: &Engine, session: &Session, out: &Path) -> Result<()> {
    let entries = engine.list_all(session).await?;
    let members = engine.list_members(session).await?;
    let file = BufWriter::new(File::create(out)?);
    let written = export::write_entries(file, &entries, &members)?;
    println!("exported {written} entries to {}", out.display());
    Ok(())
}

async fn balance(engine: &Engine, session: &Session, command: BalanceCommand) -> Result<()> {
    match command {
        BalanceCommand::Get => {
            println!("{}", engine.get_balance(session).await?);
        }
        BalanceCommand::Set { amount } => {
            engine.set_balance(session, amount).await?;
            println!("balance set to {amount}");
        }
        BalanceCommand::Family => {
            println!("{}", engine.family_balance(session).await?);
        }
    }
    Ok(())
}

async fn goal(engine: &Engine, session: &Session, command: GoalCommand) -> Result<()> {
    match command {
        GoalCommand::Get => {
            let progress = engine.goal_progress(session).await?;
            println!(
                "{} / {} ({:.0}%)",
                progress.balance,
                progress.target,
                progress.ratio * 100.0
            );
        }
        GoalCommand::Set { target } => {
            engine.set_goal(session, target).await?;
            println!("goal set to {target}");
        }
    }
    Ok(())
}

async fn member(engine: &Engine, session: &Session, command: MemberCommand) -> Result<()> {
    match command {
        MemberCommand::List => {
            for m in engine.list_members(session).await? {
                println!(
                    "{:>4}  {:<16} {:<12} {}",
                    m.id,
                    m.name,
                    m.role.as_deref().unwrap_or("-"),
                    m.color
                );
            }
        }
        MemberCommand::Add {
            name,
            role,
            color,
            avatar,
        } => {
            let mut cmd = NewMemberCmd::new(name);
            cmd.role = role;
            cmd.color = color;
            cmd.avatar = avatar;
            let id = engine.add_member(session, cmd).await?;
            println!("added member {id}");
        }
        MemberCommand::Remove { id } => {
            engine.remove_member(session, id).await?;
            println!("removed member {id}");
        }
    }
    Ok(())
}

async fn record(engine: &Engine, session: &Session, command: RecordCommand) -> Result<()> {
    let (kind, args) = match command {
        RecordCommand::Income(args) => (EntryKind::Income, args),
        RecordCommand::Expense(args) => (EntryKind::Expense, args),
    };
    let EntryArgs {
        amount,
        category,
        description,
        member,
        at,
    } = args;

    let mut cmd = RecordCmd::new(kind, amount);
    cmd.category = category;
    cmd.description = description;
    cmd.member_id = member;
    cmd.occurred_at = at;

    let id = engine.record(session, cmd).await?;
    println!("recorded {} {amount} (entry {id})", kind.as_str());
    Ok(())
}

async fn history(
    engine: &Engine,
    session: &Session,
    limit: u64,
    cursor: Option<&str>,
) -> Result<()> {
    let (entries, next) = engine.list_page(session, limit, cursor).await?;

    let mut names: HashMap<Option<MemberId>, String> = HashMap::new();
    for entry in &entries {
        if !names.contains_key(&entry.member_id) {
            let name = engine.resolve_name(session, entry.member_id).await?;
            names.insert(entry.member_id, name);
        }
        let sign = match entry.kind {
            EntryKind::Income => '+',
            EntryKind::Expense => '-',
        };
        println!(
            "{:>5}  {:<16}  {sign}{:>10}  {:<14} {:<10} {}",
            entry.id,
            entry.date,
            entry.amount.to_string(),
            entry.category_label(),
            names.get(&entry.member_id).map_or("", String::as_str),
            entry.description.as_deref().unwrap_or_default(),
        );
    }

    if let Some(next) = next {
        println!("more: --cursor {next}");
    }
    Ok(())
}

async fn report(engine: &Engine, session: &Session, command: ReportCommand) -> Result<()> {
    match command {
        ReportCommand::Categories(args) => {
            let totals = engine
                .category_totals(session, args.kind.into(), args.member)
                .await?;
            for (category, total) in analytics::ranked_categories(&totals) {
                println!("{category:<16} {:>12}", total.to_string());
            }
        }
        ReportCommand::Trend(args) => {
            for point in engine
                .daily_trend(session, args.kind.into(), args.member)
                .await?
            {
                println!("{}  {:>12}", point.date.format("%d.%m.%Y"), point.total.to_string());
            }
        }
        ReportCommand::Members => {
            for row in engine.all_member_summaries(session).await? {
                println!(
                    "{:<16} {:<12} +{:>10} -{:>10} = {:>10}",
                    row.name,
                    row.role.as_deref().unwrap_or("-"),
                    row.summary.income_total.to_string(),
                    row.summary.expense_total.to_string(),
                    row.summary.balance.to_string(),
                );
            }
        }
    }
    Ok(())
}
