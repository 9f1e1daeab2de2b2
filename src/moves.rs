// moves.rs
// Move catalog listing and per-move detail extraction.

use crate::codes::{link_code, query_code};
use crate::decode::{self, Substitute};
use crate::dom::{self, Page, selector};
use crate::error::{Result, ScrapeError};
use regex::Regex;
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static CATALOG_TABLE: LazyLock<Selector> =
    LazyLock::new(|| selector("#contents > div:nth-child(4) > div > table"));
static SORTABLE_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr.sort_tr"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));

static RIGHT_TABLE: LazyLock<Selector> =
    LazyLock::new(|| selector("#contents > div:nth-child(6) > table"));
static LEFT_TABLE: LazyLock<Selector> =
    LazyLock::new(|| selector("#contents > div:nth-child(7) > table"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static DATABASE: LazyLock<Selector> = LazyLock::new(|| selector("#database"));
static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector("#contents > div.clear > table td"));
static DESCRIPTION_FALLBACK: LazyLock<Selector> =
    LazyLock::new(|| selector("#contents > div:nth-child(8) > table td"));

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"『(.*)』").expect("title pattern is valid"));

/// Number of cells the right and left attribute tables flatten to.
pub const ATTRIBUTE_COUNT: usize = 12;

/// Row labels of the attribute tables, in positional order.
const ATTRIBUTE_LABELS: [&str; ATTRIBUTE_COUNT] = [
    "タイプ",
    "分類",
    "威力",
    "命中",
    "PP",
    "範囲",
    "直接攻撃",
    "まもる",
    "マジックコート",
    "よこどり",
    "オウムがえし",
    "みがわり",
];

const TYPE: usize = 0;
const CATEGORY: usize = 1;
const POWER: usize = 2;
const ACCURACY: usize = 3;
const PP: usize = 4;
const TARGET: usize = 5;
const IS_DIRECT: usize = 6;
const CAN_PROTECT: usize = 7;
const MAGIC_COAT: usize = 8;
const SNATCH: usize = 9;
const MIRROR_MOVE: usize = 10;
const SUBSTITUTE: usize = 11;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Move {
    pub move_id: i32,
    pub name: String,
    pub move_type: i32,
    pub category: i32,
    /// `-1` when the move has no power.
    pub power: i32,
    /// `-1` when the move always hits.
    pub accuracy: i32,
    pub pp: i32,
    pub target: i32,
    pub is_direct: bool,
    pub can_protect: bool,
    pub magic_coat: bool,
    pub snatch: bool,
    pub mirror_move: bool,
    pub substitute: bool,
    pub description: String,
}

/// Detail-page URLs of every sortable row in the move list, in document order.
pub fn list_move_urls(page: &Page, link_prefix: &str) -> Result<Vec<String>> {
    let table = page.select_one(&CATALOG_TABLE, "move list table")?;
    table
        .select(&SORTABLE_ROW)
        .map(|row| -> Result<String> {
            let link = dom::select_one_in(row, &LINK, "move list link")?;
            let href = dom::attr(link, "href", "move list link href")?;
            Ok(join_relative(link_prefix, href))
        })
        .collect()
}

/// Joins a `./`-relative link onto `prefix`.
fn join_relative(prefix: &str, href: &str) -> String {
    format!("{}{}", prefix, href.trim_start_matches('.'))
}

/// A data cell of an attribute table together with the label of its row, if any.
struct AttributeCell<'a> {
    label: Option<String>,
    cell: ElementRef<'a>,
}

struct AttributeCells<'a> {
    cells: Vec<AttributeCell<'a>>,
}

impl<'a> AttributeCells<'a> {
    /// Flattens the right table, then the left table, into one list of cells.
    fn collect(right: ElementRef<'a>, left: ElementRef<'a>) -> Result<Self> {
        let mut cells = Vec::with_capacity(ATTRIBUTE_COUNT);
        for table in [right, left] {
            for row in table.select(&ROW) {
                let mut label = None;
                for child in row.children().filter_map(ElementRef::wrap) {
                    match child.value().name() {
                        "th" => label = Some(dom::text(child)),
                        "td" => cells.push(AttributeCell {
                            label: label.take(),
                            cell: child,
                        }),
                        _ => {}
                    }
                }
            }
        }

        if cells.len() != ATTRIBUTE_COUNT {
            return Err(ScrapeError::UnexpectedCellCount {
                expected: ATTRIBUTE_COUNT,
                found: cells.len(),
            });
        }
        Ok(Self { cells })
    }

    /// Looks a slot up by its row label, falling back to its fixed position.
    fn get(&self, slot: usize) -> ElementRef<'a> {
        let wanted = ATTRIBUTE_LABELS[slot];
        self.cells
            .iter()
            .find(|c| c.label.as_deref() == Some(wanted))
            .unwrap_or(&self.cells[slot])
            .cell
    }

    fn text(&self, slot: usize) -> String {
        dom::text(self.get(slot))
    }

    fn code(&self, slot: usize) -> Result<i32> {
        let cell = self.get(slot);
        link_code(dom::select_one_in(cell, &LINK, ATTRIBUTE_LABELS[slot])?)
    }
}

/// Extracts one move from its detail page.
pub fn extract_move(page: &Page) -> Result<Move> {
    let move_id = query_code(&page.url)?;
    let name = extract_name(page)?;
    let description = extract_description(page)?;

    let right = page.select_one(&RIGHT_TABLE, "move attribute table (right)")?;
    let left = page.select_one(&LEFT_TABLE, "move attribute table (left)")?;
    let attrs = AttributeCells::collect(right, left)?;

    Ok(Move {
        move_id,
        name,
        move_type: attrs.code(TYPE)?,
        category: attrs.code(CATEGORY)?,
        power: decode::int_or_sentinel("power", &attrs.text(POWER))?,
        accuracy: decode::int_or_sentinel("accuracy", &attrs.text(ACCURACY))?,
        pp: decode::plain_int("pp", &attrs.text(PP))?,
        target: attrs.code(TARGET)?,
        is_direct: decode::IS_DIRECT.decode(&attrs.text(IS_DIRECT))?,
        can_protect: decode::CAN_PROTECT.decode(&attrs.text(CAN_PROTECT))?,
        magic_coat: decode::MAGIC_COAT.decode(&attrs.text(MAGIC_COAT))?,
        snatch: decode::SNATCH.decode(&attrs.text(SNATCH))?,
        mirror_move: decode::MIRROR_MOVE.decode(&attrs.text(MIRROR_MOVE))?,
        substitute: Substitute::decode(&attrs.text(SUBSTITUTE))?.passes_through(),
        description,
    })
}

fn extract_name(page: &Page) -> Result<String> {
    let database = dom::text(page.select_one(&DATABASE, "#database")?);
    TITLE
        .captures(&database)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(ScrapeError::Decode {
            field: "name",
            text: database,
        })
}

/// The description sits in one of two places depending on the move category.
fn extract_description(page: &Page) -> Result<String> {
    if let Some(text) = page.try_select_one(&DESCRIPTION).and_then(dom::single_text) {
        return Ok(text);
    }
    page.select_one(&DESCRIPTION_FALLBACK, "move description")
        .map(dom::text)
}
