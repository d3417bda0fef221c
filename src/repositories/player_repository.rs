use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{config::Config, db::Database, errors::AppResult, models::domain::Player};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn find_player(&self, id: &str) -> AppResult<Option<Player>>;
    /// Inserts or replaces the profile keyed by its id.
    async fn save_player(&self, player: Player) -> AppResult<Player>;
}

pub struct MongoPlayerRepository {
    collection: Collection<Player>,
}

impl MongoPlayerRepository {
    pub fn new(db: &Database, config: &Config) -> Self {
        let collection = db.get_collection(&config.players_collection);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for players collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;

        log::info!("Successfully created indexes for players collection");
        Ok(())
    }
}

#[async_trait]
impl PlayerRepository for MongoPlayerRepository {
    async fn find_player(&self, id: &str) -> AppResult<Option<Player>> {
        let player = self.collection.find_one(doc! { "id": id }).await?;
        Ok(player)
    }

    async fn save_player(&self, player: Player) -> AppResult<Player> {
        self.collection
            .replace_one(doc! { "id": &player.id }, &player)
            .upsert(true)
            .await?;
        Ok(player)
    }
}
