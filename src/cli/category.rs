//! Category CLI commands

use clap::Subcommand;

use crate::display::category::{format_category_line, format_category_list};
use crate::error::FinanceResult;
use crate::models::Category;
use crate::services::categorize::KeywordMap;
use crate::config::settings::Settings;
use crate::state::{Command, Record, RecordKey};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,

    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Display color as #RRGGBB
        #[arg(long)]
        color: Option<String>,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New color as #RRGGBB
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a category that nothing references
    Delete {
        /// Category name or ID
        category: String,
    },

    /// Suggest a category for a merchant or description
    Suggest {
        /// Free text, e.g. a merchant name
        text: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> FinanceResult<()> {
    match cmd {
        CategoryCommands::List => {
            let state = storage.load()?;
            print!("{}", format_category_list(&state));
        }

        CategoryCommands::Create { name, color } => {
            let category = match color {
                Some(color) => Category::with_color(name.trim(), color),
                None => Category::new(name.trim()),
            };
            storage.apply(Command::Add(Record::Category(category.clone())))?;
            println!("Created category: {}", format_category_line(&category));
        }

        CategoryCommands::Edit {
            category,
            name,
            color,
        } => {
            if name.is_none() && color.is_none() {
                println!("No changes specified. Use --name or --color.");
                return Ok(());
            }

            let state = storage.load()?;
            let mut updated = state.resolve_category(&category)?.clone();
            if let Some(name) = name {
                updated.name = name.trim().to_string();
            }
            if let Some(color) = color {
                updated.color = color;
            }

            storage.apply(Command::Update(Record::Category(updated.clone())))?;
            println!("Updated category: {}", format_category_line(&updated));
        }

        CategoryCommands::Delete { category } => {
            let state = storage.load()?;
            let target = state.resolve_category(&category)?;
            let name = target.name.clone();

            storage.apply(Command::Delete(RecordKey::Category(target.id)))?;
            println!("Deleted category: {}", name);
        }

        CategoryCommands::Suggest { text } => {
            let keywords = KeywordMap::from_settings(settings);
            match keywords.suggest(&text) {
                Some(category) => println!("{}", category),
                None => println!("No matching category for '{}'", text),
            }
        }
    }

    Ok(())
}
