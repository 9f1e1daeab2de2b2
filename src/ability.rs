// ability.rs
// Abilities are scraped straight from the catalog table; there are no detail pages.

use crate::codes::link_code;
use crate::dom::{self, Page, selector};
use crate::error::{Result, ScrapeError};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static RESULTS_TABLE: LazyLock<Selector> =
    LazyLock::new(|| selector("#contents > div:nth-child(8) > table"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Ability {
    pub ability_id: i32,
    pub name: String,
    pub description: String,
}

/// Extracts every ability row of the catalog page, in document order.
/// Rows without data cells (headers, separators) are skipped.
pub fn extract_abilities(page: &Page) -> Result<Vec<Ability>> {
    let table = page.select_one(&RESULTS_TABLE, "ability results table")?;
    let mut abilities = Vec::new();

    for row in table.select(&ROW) {
        let cells: Vec<_> = row.select(&CELL).collect();
        if cells.is_empty() {
            continue;
        }
        let &[name_cell, description_cell, ..] = &cells[..] else {
            return Err(ScrapeError::MissingElement("ability description cell"));
        };
        let link = dom::select_one_in(name_cell, &LINK, "ability link")?;

        abilities.push(Ability {
            ability_id: link_code(link)?,
            name: dom::text(name_cell),
            description: dom::text(description_cell),
        });
    }

    tracing::debug!("Extracted {} abilities from {}", abilities.len(), page.url);
    Ok(abilities)
}
