use crate::cli::{CommonArgs, ConfigAction};
use crate::config::{ConfigStore, Credentials, FileConfigStore, Period};
use crate::model::DateInterval;
use crate::util::{parse_day, today};
use anyhow::Context;
use console::style;

pub fn exec(common: &CommonArgs, action: ConfigAction) -> anyhow::Result<()> {
    let store = FileConfigStore::open(common.config_dir.as_deref()).context("Failed to open settings")?;

    match action {
        ConfigAction::Show => show(&store)?,
        ConfigAction::Credentials { username, token } => {
            store
                .save_credentials(&Credentials { username, token })
                .context("Failed to save credentials")?;
            println!("{} credentials saved", style("✓").green());
        }
        ConfigAction::Period { start, end } => {
            let today = today();
            let interval = DateInterval::new(parse_day(&start, today)?, parse_day(&end, today)?)?;
            store
                .save_period(&Period::from(interval))
                .context("Failed to save period")?;
            println!(
                "{} period saved: {} to {}",
                style("✓").green(),
                interval.start(),
                interval.end()
            );
        }
        ConfigAction::MaxCommits { value } => {
            store.save_max_commits(value)?;
            println!("{} max commits per day saved: {value}", style("✓").green());
        }
    }
    Ok(())
}

fn show(store: &FileConfigStore) -> anyhow::Result<()> {
    println!("{}", style("Settings").bold());
    println!("{}", "─".repeat(50));
    println!("  directory:    {}", store.dir().display());

    match store.credentials()? {
        Some(credentials) => println!(
            "  credentials:  {} (token {})",
            credentials.username,
            credentials.masked_token()
        ),
        None => println!("  credentials:  {}", style("not set").dim()),
    }

    match store.period()? {
        Some(period) => println!("  period:       {} to {}", period.start_date, period.end_date),
        None => println!("  period:       {}", style("not set").dim()),
    }

    println!("  max commits:  {}", store.max_commits()?);
    Ok(())
}
