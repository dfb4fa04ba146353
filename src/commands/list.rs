//! # List Command Implementation
//!
//! `mathfonts list` prints the catalog: every family, how many sources it is
//! fetched from, and whether its license is generated from the OFL template.

use anyhow::Result;
use clap::Args;

use mathfonts::catalog::CATALOG;

/// List the font families in the catalog
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print the catalog as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the `list` command.
pub fn execute(args: ListArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(CATALOG)?);
        return Ok(());
    }

    let width = CATALOG
        .iter()
        .map(|family| family.name.len())
        .max()
        .unwrap_or(0);
    for family in CATALOG {
        println!(
            "{:<width$}  {} source{}{}",
            family.name,
            family.urls.len(),
            if family.urls.len() == 1 { "" } else { "s" },
            if family.license_template.is_some() {
                ", OFL template"
            } else {
                ""
            },
            width = width
        );
    }
    Ok(())
}
