use std::path::PathBuf;

use catalog::{Catalog, Directory, ItemType};
use clap::Parser;
use tracing::instrument;

use super::terminal::{is_narrow, say, Tone};

#[derive(Debug, Parser, Default)]
#[command(about = "Show library, item, member and borrowing counts")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Record counts for a catalog.
#[derive(Debug, PartialEq, Eq)]
struct Counts {
    libraries: usize,
    items: [(ItemType, usize); 3],
    members: usize,
    outstanding: usize,
    returned: usize,
}

impl Counts {
    fn of(catalog: &Catalog) -> Self {
        let items = ItemType::ALL.map(|item_type| {
            let count = catalog
                .items()
                .iter()
                .filter(|item| item.item_type() == item_type)
                .count();
            (item_type, count)
        });
        let outstanding = catalog
            .borrowings()
            .iter()
            .filter(|borrowing| borrowing.is_outstanding())
            .count();

        Self {
            libraries: catalog.libraries().len(),
            items,
            members: catalog.members().len(),
            outstanding,
            returned: catalog.borrowings().len() - outstanding,
        }
    }

    fn total_items(&self) -> usize {
        self.items.iter().map(|(_, count)| count).sum()
    }
}

impl Status {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = Directory::new(root).load_all()?;
        let counts = Counts::of(directory.catalog());

        match self.output {
            OutputFormat::Json => Self::output_json(&counts)?,
            OutputFormat::Table => Self::output_table(&counts),
        }
        Ok(())
    }

    fn output_json(counts: &Counts) -> anyhow::Result<()> {
        let items: serde_json::Map<String, serde_json::Value> = counts
            .items
            .iter()
            .map(|(item_type, count)| (item_type.to_string(), (*count).into()))
            .collect();

        let output = serde_json::json!({
            "libraries": counts.libraries,
            "items": items,
            "members": counts.members,
            "borrowings": {
                "outstanding": counts.outstanding,
                "returned": counts.returned,
            },
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_table(counts: &Counts) {
        if counts.libraries == 0 {
            println!("No libraries found yet. Add one with 'catalog menu'.");
            return;
        }

        if is_narrow() {
            println!("Libraries: {}", counts.libraries);
            println!("Items: {}", counts.total_items());
            println!("Members: {}", counts.members);
            println!("On loan: {}", counts.outstanding);
            return;
        }

        say(Tone::Heading, "Catalog");
        println!("  {:<16}{:>6}", "Libraries", counts.libraries);
        println!("  {:<16}{:>6}", "Items", counts.total_items());
        for (item_type, count) in &counts.items {
            say(Tone::Muted, format!("    {:<14}{:>6}", item_type.as_str(), count));
        }
        println!("  {:<16}{:>6}", "Members", counts.members);

        println!();
        say(Tone::Heading, "Borrowings");
        let on_loan = format!("  {:<16}{:>6}", "Outstanding", counts.outstanding);
        if counts.outstanding > 0 {
            say(Tone::Warning, on_loan);
        } else {
            say(Tone::Success, on_loan);
        }
        println!("  {:<16}{:>6}", "Returned", counts.returned);
    }
}
