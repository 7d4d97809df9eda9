//! Presentation of the selected users
//!
//! Three formats: a table for terminals, text cards in the style of the old
//! card viewer, and JSON for scripts.

use crate::validator::ValidatedUser;
use clap::ValueEnum;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use std::io::Write;
use userdeck_common::{Result, UserdeckError};

const EMPTY_NOTICE: &str = "No valid users found.";

/// Output format for the final selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Cards,
    Json,
}

impl OutputFormat {
    pub fn presenter(self) -> Box<dyn Presenter> {
        match self {
            OutputFormat::Table => Box::new(TablePresenter),
            OutputFormat::Cards => Box::new(CardPresenter),
            OutputFormat::Json => Box::new(JsonPresenter),
        }
    }
}

/// Renders the final ordered selection
pub trait Presenter {
    fn render(&self, users: &[ValidatedUser], out: &mut dyn Write) -> Result<()>;
}

pub struct TablePresenter;

impl Presenter for TablePresenter {
    fn render(&self, users: &[ValidatedUser], out: &mut dyn Write) -> Result<()> {
        if users.is_empty() {
            writeln!(out, "{}", EMPTY_NOTICE)?;
            return Ok(());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Name", "Age", "Phone", "Photo", "Bio"]);

        for user in users {
            table.add_row(vec![
                user.name().to_string(),
                user.age().to_string(),
                user.number().to_string(),
                user.photo().to_string(),
                user.bio().to_string(),
            ]);
        }

        writeln!(out, "{}", table)?;
        Ok(())
    }
}

pub struct CardPresenter;

impl Presenter for CardPresenter {
    fn render(&self, users: &[ValidatedUser], out: &mut dyn Write) -> Result<()> {
        if users.is_empty() {
            writeln!(out, "{}", EMPTY_NOTICE)?;
            return Ok(());
        }

        for (i, user) in users.iter().enumerate() {
            if i > 0 {
                writeln!(out, "{}", "-".repeat(40))?;
            }
            writeln!(out, "Card {} of {}", i + 1, users.len())?;
            writeln!(out, "Name: {}", capitalize(user.name()))?;
            writeln!(out, "Age: {}", user.age())?;
            writeln!(out, "Bio: {}", user.bio())?;
            writeln!(out, "{}", user.number())?;
            writeln!(out, "Photo: {}", user.photo())?;
        }
        Ok(())
    }
}

pub struct JsonPresenter;

impl Presenter for JsonPresenter {
    fn render(&self, users: &[ValidatedUser], out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, users)?;
        writeln!(out)?;
        Ok(())
    }
}

/// Render with the given format, flushing at the end
pub fn render(format: OutputFormat, users: &[ValidatedUser], out: &mut dyn Write) -> Result<()> {
    format.presenter().render(users, out)?;
    out.flush()
        .map_err(|e| UserdeckError::render(format!("flush failed: {}", e)))
}

/// First character upper-cased, the rest lower-cased
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
