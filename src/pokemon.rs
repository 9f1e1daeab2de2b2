// pokemon.rs
// Pokedex listing, per-pokemon detail extraction and the exported record shape.

use crate::client::SiteClient;
use crate::codes::link_code;
use crate::decode;
use crate::dom::{self, Page, selector};
use crate::error::{Result, ScrapeError};
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static LIST: LazyLock<Selector> =
    LazyLock::new(|| selector("#contents > div.pokemon_list_box > ul.pokemon_list"));
static LIST_ENTRY: LazyLock<Selector> = LazyLock::new(|| selector("li.haszukan"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));

static TITLE_META: LazyLock<Selector> = LazyLock::new(|| selector("head > meta:nth-child(5)"));
static TYPE_LINKS: LazyLock<Selector> = LazyLock::new(|| {
    selector("#base_anchor > table tr:nth-child(8) > td:nth-child(2) > ul > li > a")
});
static STATS_TABLE: LazyLock<Selector> = LazyLock::new(|| selector("#stats_anchor > table"));
static STAT_CELL: LazyLock<Selector> = LazyLock::new(|| selector("tr > td.left"));
static ABILITY_LINKS: LazyLock<Selector> = LazyLock::new(|| selector("tr > td.c1 > a"));
static MOVE_ROWS: LazyLock<Selector> =
    LazyLock::new(|| selector("#move_list tr.move_head, #move_list tr.move_main_row"));
static IMAGE: LazyLock<Selector> =
    LazyLock::new(|| selector("#base_anchor > table tr:nth-child(2) > td > img"));

/// Full-width pipe separating the pokemon name from the site name in the page title.
const TITLE_DELIMITER: char = '｜';
const STAT_NAMES: [&str; 6] = ["h", "a", "b", "c", "d", "s"];

/// Ability slots as the page lays them out. A page with two ability links has
/// no second standard ability: the second link is the hidden one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilitySlots {
    One(i32),
    Two { primary: i32, hidden: i32 },
    Three { primary: i32, secondary: i32, hidden: i32 },
}

impl AbilitySlots {
    pub fn from_codes(codes: &[i32]) -> Result<Self> {
        match *codes {
            [primary] => Ok(AbilitySlots::One(primary)),
            [primary, hidden] => Ok(AbilitySlots::Two { primary, hidden }),
            [primary, secondary, hidden] => Ok(AbilitySlots::Three {
                primary,
                secondary,
                hidden,
            }),
            _ => Err(ScrapeError::UnexpectedLinkCount {
                what: "ability",
                count: codes.len(),
            }),
        }
    }

    pub fn primary(&self) -> i32 {
        match *self {
            AbilitySlots::One(primary)
            | AbilitySlots::Two { primary, .. }
            | AbilitySlots::Three { primary, .. } => primary,
        }
    }

    pub fn secondary(&self) -> Option<i32> {
        match *self {
            AbilitySlots::Three { secondary, .. } => Some(secondary),
            _ => None,
        }
    }

    pub fn hidden(&self) -> Option<i32> {
        match *self {
            AbilitySlots::One(_) => None,
            AbilitySlots::Two { hidden, .. } | AbilitySlots::Three { hidden, .. } => Some(hidden),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStats {
    pub h: i32,
    pub a: i32,
    pub b: i32,
    pub c: i32,
    pub d: i32,
    pub s: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(into = "PokemonRecord", try_from = "PokemonRecord")]
pub struct Pokemon {
    pub pokemon_id: String,
    pub name: String,
    pub type_1: i32,
    pub type_2: Option<i32>,
    pub abilities: AbilitySlots,
    pub stats: BaseStats,
    pub level_moves: Vec<i32>,
    pub machine_moves: Vec<i32>,
    pub egg_moves: Vec<i32>,
    pub image_url: String,
}

/// The flat shape written to `pokemon.json`.
#[derive(Debug, Serialize, Deserialize, Clone)]
struct PokemonRecord {
    pokemon_id: String,
    name: String,
    type_1: i32,
    type_2: Option<i32>,
    ability_1: i32,
    ability_2: Option<i32>,
    hidden_ability: Option<i32>,
    h: i32,
    a: i32,
    b: i32,
    c: i32,
    d: i32,
    s: i32,
    #[serde(rename = "levelMoves")]
    level_moves: Vec<i32>,
    #[serde(rename = "machineMoves")]
    machine_moves: Vec<i32>,
    #[serde(rename = "eggMoves")]
    egg_moves: Vec<i32>,
    #[serde(rename = "imageUrl")]
    image_url: String,
}

impl From<Pokemon> for PokemonRecord {
    fn from(p: Pokemon) -> Self {
        Self {
            ability_1: p.abilities.primary(),
            ability_2: p.abilities.secondary(),
            hidden_ability: p.abilities.hidden(),
            h: p.stats.h,
            a: p.stats.a,
            b: p.stats.b,
            c: p.stats.c,
            d: p.stats.d,
            s: p.stats.s,
            pokemon_id: p.pokemon_id,
            name: p.name,
            type_1: p.type_1,
            type_2: p.type_2,
            level_moves: p.level_moves,
            machine_moves: p.machine_moves,
            egg_moves: p.egg_moves,
            image_url: p.image_url,
        }
    }
}

impl TryFrom<PokemonRecord> for Pokemon {
    type Error = String;

    fn try_from(r: PokemonRecord) -> std::result::Result<Self, Self::Error> {
        let abilities = match (r.ability_2, r.hidden_ability) {
            (None, None) => AbilitySlots::One(r.ability_1),
            (None, Some(hidden)) => AbilitySlots::Two {
                primary: r.ability_1,
                hidden,
            },
            (Some(secondary), Some(hidden)) => AbilitySlots::Three {
                primary: r.ability_1,
                secondary,
                hidden,
            },
            (Some(_), None) => {
                return Err(format!(
                    "pokemon {} has ability_2 without hidden_ability",
                    r.pokemon_id
                ));
            }
        };
        Ok(Self {
            pokemon_id: r.pokemon_id,
            name: r.name,
            type_1: r.type_1,
            type_2: r.type_2,
            abilities,
            stats: BaseStats {
                h: r.h,
                a: r.a,
                b: r.b,
                c: r.c,
                d: r.d,
                s: r.s,
            },
            level_moves: r.level_moves,
            machine_moves: r.machine_moves,
            egg_moves: r.egg_moves,
            image_url: r.image_url,
        })
    }
}

impl Pokemon {
    /// Downloads the pokemon's image into `dir` as `<pokemon_id>.gif`.
    pub async fn save_image(&self, client: &SiteClient, dir: &Path) -> Result<PathBuf> {
        let dest = dir.join(format!("{}.gif", self.pokemon_id));
        client.download(&self.image_url, &dest).await?;
        tracing::debug!("Saved image of {} to {}", self.pokemon_id, dest.display());
        Ok(dest)
    }
}

/// Detail-page URLs of every pokedex entry that has a page, in document order.
pub fn list_pokemon_urls(page: &Page, link_prefix: &str) -> Result<Vec<String>> {
    let list = page.select_one(&LIST, "pokemon list")?;
    list.select(&LIST_ENTRY)
        .map(|entry| -> Result<String> {
            let link = dom::select_one_in(entry, &LINK, "pokemon list link")?;
            let href = dom::attr(link, "href", "pokemon list link href")?;
            Ok(format!("{}{}", link_prefix, href))
        })
        .collect()
}

/// Extracts one pokemon from its detail page.
pub fn extract_pokemon(page: &Page, image_scheme: &str) -> Result<Pokemon> {
    let name = extract_name(page)?;
    tracing::info!("name is {}", name);

    let pokemon_id = extract_id(&page.url)?;
    let (type_1, type_2) = extract_types(page)?;
    let stats = extract_stats(page)?;

    let ability_codes = page
        .select_all(&ABILITY_LINKS)
        .into_iter()
        .map(link_code)
        .collect::<Result<Vec<_>>>()?;
    let abilities = AbilitySlots::from_codes(&ability_codes)?;

    let rows = page
        .select_all(&MOVE_ROWS)
        .into_iter()
        .skip(1)
        .map(MoveRow::classify)
        .collect::<Result<Vec<_>>>()?;
    let [level_moves, machine_moves, egg_moves] = split_movesets(rows)?;

    let image_url = extract_image_url(page, image_scheme)?;

    Ok(Pokemon {
        pokemon_id,
        name,
        type_1,
        type_2,
        abilities,
        stats,
        level_moves,
        machine_moves,
        egg_moves,
        image_url,
    })
}

fn extract_name(page: &Page) -> Result<String> {
    let meta = page.select_one(&TITLE_META, "title meta tag")?;
    let content = dom::attr(meta, "content", "title meta content")?;
    let name = content.split(TITLE_DELIMITER).next().unwrap_or_default();
    Ok(name.trim().to_string())
}

/// The id is the last path segment and stays a string: form variants carry suffixes.
fn extract_id(url: &str) -> Result<String> {
    match url.trim_end_matches('/').rsplit('/').next() {
        Some(id) if !id.is_empty() && !id.contains(':') => Ok(id.to_string()),
        _ => Err(ScrapeError::Decode {
            field: "pokemon_id",
            text: url.to_string(),
        }),
    }
}

fn extract_types(page: &Page) -> Result<(i32, Option<i32>)> {
    let codes = page
        .select_all(&TYPE_LINKS)
        .into_iter()
        .map(link_code)
        .collect::<Result<Vec<_>>>()?;
    match codes[..] {
        [type_1] => Ok((type_1, None)),
        [type_1, type_2] => Ok((type_1, Some(type_2))),
        _ => Err(ScrapeError::UnexpectedLinkCount {
            what: "type",
            count: codes.len(),
        }),
    }
}

fn extract_stats(page: &Page) -> Result<BaseStats> {
    let table = page.select_one(&STATS_TABLE, "stats table")?;
    let cells: Vec<ElementRef<'_>> = table.select(&STAT_CELL).take(STAT_NAMES.len()).collect();
    if cells.len() < STAT_NAMES.len() {
        return Err(ScrapeError::MissingElement("base stat cells"));
    }
    let mut values = [0; 6];
    for ((value, cell), field) in values.iter_mut().zip(&cells).zip(STAT_NAMES) {
        *value = decode::stat_value(field, &dom::text(*cell))?;
    }
    let [h, a, b, c, d, s] = values;
    Ok(BaseStats { h, a, b, c, d, s })
}

fn extract_image_url(page: &Page, scheme: &str) -> Result<String> {
    let img = page.select_one(&IMAGE, "pokemon image")?;
    let src = dom::attr(img, "src", "pokemon image src")?;
    if src.starts_with("//") {
        Ok(format!("{}{}", scheme, src))
    } else {
        Ok(src.to_string())
    }
}

/// A row of the moveset table after the caption row has been dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRow {
    Header,
    Move(i32),
}

impl MoveRow {
    fn classify(row: ElementRef<'_>) -> Result<Self> {
        if row.value().classes().any(|c| c == "move_head") {
            return Ok(MoveRow::Header);
        }
        let link = dom::select_one_in(row, &LINK, "move link")?;
        Ok(MoveRow::Move(link_code(link)?))
    }
}

/// Splits moveset rows into sections: each header opens a new section and
/// move rows join the current one. Every section is sorted, duplicates kept.
pub fn partition_moves(rows: impl IntoIterator<Item = MoveRow>) -> Vec<Vec<i32>> {
    let mut sections: Vec<Vec<i32>> = Vec::new();
    for row in rows {
        match (row, sections.last_mut()) {
            (MoveRow::Header, _) => sections.push(Vec::new()),
            (MoveRow::Move(id), Some(section)) => section.push(id),
            (MoveRow::Move(id), None) => sections.push(vec![id]),
        }
    }
    for section in &mut sections {
        section.sort_unstable();
    }
    sections
}

/// Level-up, machine and egg moves, in that order.
fn split_movesets(rows: Vec<MoveRow>) -> Result<[Vec<i32>; 3]> {
    let sections = partition_moves(rows);
    let count = sections.len();
    <[Vec<i32>; 3]>::try_from(sections).map_err(|_| ScrapeError::UnexpectedSectionCount(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://yakkun.com/sv/zukan/n1";

    struct Fixture {
        types: Vec<i32>,
        abilities: Vec<i32>,
        moves: &'static str,
    }

    impl Default for Fixture {
        fn default() -> Self {
            Self {
                types: vec![12, 8],
                abilities: vec![65, 34],
                moves: r#"
                    <tr class="move_head"><th>技</th></tr>
                    <tr class="move_head"><th>レベルアップ</th></tr>
                    <tr class="move_main_row"><td><a href="/sv/zukan/search/?move=33">たいあたり</a></td></tr>
                    <tr class="move_detail_row"><td>detail</td></tr>
                    <tr class="move_main_row"><td><a href="/sv/zukan/search/?move=22">つるのムチ</a></td></tr>
                    <tr class="move_head"><th>わざマシン</th></tr>
                    <tr class="move_main_row"><td><a href="/sv/zukan/search/?move=92">どくどく</a></td></tr>
                    <tr class="move_head"><th>タマゴ技</th></tr>
                    <tr class="move_main_row"><td><a href="/sv/zukan/search/?move=80">はなびらのまい</a></td></tr>
                    <tr class="move_main_row"><td><a href="/sv/zukan/search/?move=80">はなびらのまい</a></td></tr>
                    <tr class="move_main_row"><td><a href="/sv/zukan/search/?move=38">すてみタックル</a></td></tr>
                "#,
            }
        }
    }

    impl Fixture {
        fn page(&self) -> Page {
            let types: String = self
                .types
                .iter()
                .map(|t| format!(r#"<li><a href="/sv/search/?type={}">t</a></li>"#, t))
                .collect();
            let abilities: String = self
                .abilities
                .iter()
                .map(|a| format!(r#"<tr><td class="c1"><a href="/sv/search/?ability={}">a</a></td></tr>"#, a))
                .collect();
            let filler: String = (3..8).map(|i| format!("<tr><td>row {}</td></tr>", i)).collect();
            let html = format!(
                r#"<html><head>
                <meta charset="utf-8"><meta name="a"><meta name="b"><meta name="c">
                <meta property="og:title" content="フシギダネ｜ポケモン図鑑SV｜ポケモン徹底攻略">
                </head><body>
                <div id="base_anchor"><table>
                  <tr><th>フシギダネ</th></tr>
                  <tr><td><img src="//img.yakkun.com/poke/icon96/n1.gif"></td></tr>
                  {filler}
                  <tr><th>タイプ</th><td><ul>{types}</ul></td></tr>
                </table></div>
                <div id="stats_anchor"><table>
                  <tr><th>HP</th><td class="left">45(下位 12%)</td></tr>
                  <tr><th>攻撃</th><td class="left">49(下位 20%)</td></tr>
                  <tr><th>防御</th><td class="left">49(下位 25%)</td></tr>
                  <tr><th>特攻</th><td class="left">65(上位 40%)</td></tr>
                  <tr><th>特防</th><td class="left">65(上位 42%)</td></tr>
                  <tr><th>素早さ</th><td class="left">45(下位 30%)</td></tr>
                  <tr><th>合計</th><td class="left">318</td></tr>
                </table></div>
                <table>{abilities}</table>
                <table id="move_list">{moves}</table>
                </body></html>"#,
                filler = filler,
                types = types,
                abilities = abilities,
                moves = self.moves,
            );
            Page::parse(URL, &html)
        }
    }

    #[test]
    fn test_extract_pokemon() {
        let pokemon = extract_pokemon(&Fixture::default().page(), "https:").unwrap();
        assert_eq!(pokemon.pokemon_id, "n1");
        assert_eq!(pokemon.name, "フシギダネ");
        assert_eq!((pokemon.type_1, pokemon.type_2), (12, Some(8)));
        assert_eq!(
            pokemon.stats,
            BaseStats {
                h: 45,
                a: 49,
                b: 49,
                c: 65,
                d: 65,
                s: 45
            }
        );
        assert_eq!(pokemon.level_moves, vec![22, 33]);
        assert_eq!(pokemon.machine_moves, vec![92]);
        assert_eq!(pokemon.egg_moves, vec![38, 80, 80]);
        assert_eq!(pokemon.image_url, "https://img.yakkun.com/poke/icon96/n1.gif");
    }

    #[test]
    fn test_single_type_has_no_second_type() {
        let fixture = Fixture {
            types: vec![10],
            ..Default::default()
        };
        let pokemon = extract_pokemon(&fixture.page(), "https:").unwrap();
        assert_eq!(pokemon.type_1, 10);
        assert_eq!(pokemon.type_2, None);
    }

    #[test]
    fn test_missing_types_is_error() {
        let fixture = Fixture {
            types: vec![],
            ..Default::default()
        };
        assert!(matches!(
            extract_pokemon(&fixture.page(), "https:"),
            Err(ScrapeError::UnexpectedLinkCount { what: "type", count: 0 })
        ));
    }

    #[test]
    fn test_ability_slot_assignment() {
        let cases: [(Vec<i32>, (i32, Option<i32>, Option<i32>)); 3] = [
            (vec![65], (65, None, None)),
            (vec![65, 34], (65, None, Some(34))),
            (vec![22, 65, 34], (22, Some(65), Some(34))),
        ];
        for (links, (primary, secondary, hidden)) in cases {
            let fixture = Fixture {
                abilities: links,
                ..Default::default()
            };
            let abilities = extract_pokemon(&fixture.page(), "https:").unwrap().abilities;
            assert_eq!(abilities.primary(), primary);
            assert_eq!(abilities.secondary(), secondary);
            assert_eq!(abilities.hidden(), hidden);
        }
    }

    #[test]
    fn test_too_many_abilities_is_error() {
        assert!(matches!(
            AbilitySlots::from_codes(&[1, 2, 3, 4]),
            Err(ScrapeError::UnexpectedLinkCount { what: "ability", count: 4 })
        ));
        assert!(AbilitySlots::from_codes(&[]).is_err());
    }

    #[test]
    fn test_partition_moves() {
        use MoveRow::*;
        let sections = partition_moves([Header, Move(10), Move(5), Header, Move(20)]);
        assert_eq!(sections, vec![vec![5, 10], vec![20]]);
    }

    #[test]
    fn test_partition_keeps_empty_sections_and_duplicates() {
        use MoveRow::*;
        let sections = partition_moves([Header, Header, Move(7), Move(7), Move(1)]);
        assert_eq!(sections, vec![vec![], vec![1, 7, 7]]);
    }

    #[test]
    fn test_unexpected_section_count() {
        let fixture = Fixture {
            moves: r#"
                <tr class="move_head"><th>技</th></tr>
                <tr class="move_head"><th>レベルアップ</th></tr>
                <tr class="move_main_row"><td><a href="/sv/zukan/search/?move=33">x</a></td></tr>
                <tr class="move_head"><th>わざマシン</th></tr>
            "#,
            ..Default::default()
        };
        assert!(matches!(
            extract_pokemon(&fixture.page(), "https:"),
            Err(ScrapeError::UnexpectedSectionCount(2))
        ));
    }

    #[test]
    fn test_extract_id_keeps_form_suffix() {
        assert_eq!(extract_id("https://yakkun.com/sv/zukan/n128k").unwrap(), "n128k");
        assert_eq!(extract_id("https://yakkun.com/sv/zukan/n25/").unwrap(), "n25");
    }

    #[test]
    fn test_list_pokemon_urls() {
        let html = r#"<html><body><div id="contents"><div class="pokemon_list_box">
            <ul class="pokemon_list">
              <li class="haszukan"><a href="/sv/zukan/n1">フシギダネ</a></li>
              <li><a href="/sv/zukan/n2">no page</a></li>
              <li class="haszukan"><a href="/sv/zukan/n128k">ケンタロス</a></li>
            </ul></div></div></body></html>"#;
        let page = Page::parse("https://yakkun.com/sv/zukan/", html);
        let urls = list_pokemon_urls(&page, "https://yakkun.com").unwrap();
        assert_eq!(
            urls,
            vec![
                "https://yakkun.com/sv/zukan/n1",
                "https://yakkun.com/sv/zukan/n128k"
            ]
        );
    }
}
