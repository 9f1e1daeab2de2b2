// crawl.rs
// Sequential driver loops: list a catalog, then fetch, extract and pause page by page.
// Any failure aborts the whole crawl; nothing is checkpointed.

use crate::ability::{self, Ability};
use crate::client::SiteClient;
use crate::config::Config;
use crate::error::Result;
use crate::moves::{self, Move};
use crate::output::write_json_array;
use crate::pokemon::{self, Pokemon};
use std::time::Duration;

pub struct Crawler {
    client: SiteClient,
    config: Config,
}

impl Crawler {
    pub fn new(config: Config) -> Result<Self> {
        let client = SiteClient::new(&config.http)?;
        Ok(Self { client, config })
    }

    pub async fn abilities(&self) -> Result<Vec<Ability>> {
        let page = self
            .client
            .fetch_page(&self.config.site.ability_list_url)
            .await?;
        ability::extract_abilities(&page)
    }

    pub async fn moves(&self) -> Result<Vec<Move>> {
        let urls = {
            let page = self.client.fetch_page(&self.config.site.move_list_url).await?;
            moves::list_move_urls(&page, &self.config.site.move_link_prefix)?
        };

        let total = urls.len();
        let mut moves = Vec::with_capacity(total);
        for (n, url) in urls.iter().enumerate() {
            tracing::debug!("{}", url);
            let mv = moves::extract_move(&self.client.fetch_page(url).await?)?;
            tracing::info!("{} ({})", mv.name, mv.move_id);
            moves.push(mv);
            tracing::info!("{}/{}", n + 1, total);
            pause(self.config.crawl.move_delay()).await;
        }
        Ok(moves)
    }

    pub async fn pokemon(&self) -> Result<Vec<Pokemon>> {
        let urls = {
            let page = self.client.fetch_page(&self.config.site.pokemon_list_url).await?;
            pokemon::list_pokemon_urls(&page, &self.config.site.pokemon_link_prefix)?
        };

        let image_dir = &self.config.output.image_dir;
        if self.config.crawl.download_images {
            tokio::fs::create_dir_all(image_dir).await?;
        }

        let total = urls.len();
        let mut all = Vec::with_capacity(total);
        for (n, url) in urls.iter().enumerate() {
            tracing::debug!("{}", url);
            let poke = pokemon::extract_pokemon(
                &self.client.fetch_page(url).await?,
                &self.config.site.image_scheme,
            )?;
            if self.config.crawl.download_images {
                poke.save_image(&self.client, image_dir).await?;
            }
            pause(self.config.crawl.pokemon_delay()).await;
            all.push(poke);
            tracing::info!("{}/{}", n + 1, total);
        }
        Ok(all)
    }

    pub async fn write_abilities(&self) -> Result<()> {
        let abilities = self.abilities().await?;
        write_json_array(&self.config.output.ability_path(), &abilities)
    }

    pub async fn write_moves(&self) -> Result<()> {
        let moves = self.moves().await?;
        write_json_array(&self.config.output.move_path(), &moves)
    }

    pub async fn write_pokemon(&self) -> Result<()> {
        let all = self.pokemon().await?;
        write_json_array(&self.config.output.pokemon_path(), &all)
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
