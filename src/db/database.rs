use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::models::{CampaignRow, ImageRow, PersonaRow};
use crate::types::{Campaign, GeneratedImage, Persona};

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StoreStats {
    pub personas: i64,
    pub images: i64,
    pub campaigns: i64,
}

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn init(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS personas (\
                id TEXT PRIMARY KEY,\
                name TEXT NOT NULL,\
                face_json TEXT NOT NULL,\
                body_json TEXT NOT NULL,\
                style_json TEXT NOT NULL,\
                reference_images_json TEXT NOT NULL DEFAULT '[]',\
                thumbnail TEXT,\
                seed INTEGER,\
                created_at TEXT NOT NULL,\
                updated_at TEXT NOT NULL\
            );",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS images (\
                id TEXT PRIMARY KEY,\
                model_id TEXT NOT NULL,\
                url TEXT NOT NULL,\
                prompt TEXT NOT NULL,\
                scene_json TEXT NOT NULL,\
                output_json TEXT NOT NULL,\
                tags_json TEXT NOT NULL DEFAULT '[]',\
                is_favorite INTEGER NOT NULL DEFAULT 0,\
                seed INTEGER,\
                campaign_id TEXT,\
                created_at TEXT NOT NULL\
            );",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS campaigns (\
                id TEXT PRIMARY KEY,\
                name TEXT NOT NULL,\
                description TEXT NOT NULL DEFAULT '',\
                brand_name TEXT NOT NULL DEFAULT '',\
                brand_colors_json TEXT NOT NULL DEFAULT '[]',\
                mood TEXT NOT NULL DEFAULT '',\
                target_platforms_json TEXT NOT NULL DEFAULT '[]',\
                model_ids_json TEXT NOT NULL DEFAULT '[]',\
                content_brief TEXT NOT NULL DEFAULT '',\
                product_images_json TEXT NOT NULL DEFAULT '[]',\
                created_at TEXT NOT NULL,\
                updated_at TEXT NOT NULL\
            );",
        )
        .execute(&pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_personas_created_at ON personas(created_at);")
            .execute(&pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_images_model_id ON images(model_id);")
            .execute(&pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_images_campaign_id ON images(campaign_id);")
            .execute(&pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_images_created_at ON images(created_at);")
            .execute(&pool)
            .await?;

        info!("Database tables created successfully");

        Ok(Database { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn insert_persona(&self, persona: &Persona) -> Result<()> {
        sqlx::query(
            "INSERT INTO personas \
             (id, name, face_json, body_json, style_json, reference_images_json, thumbnail, seed, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&persona.id)
        .bind(&persona.name)
        .bind(serde_json::to_string(&persona.face)?)
        .bind(serde_json::to_string(&persona.body)?)
        .bind(serde_json::to_string(&persona.style)?)
        .bind(serde_json::to_string(&persona.reference_images)?)
        .bind(&persona.thumbnail)
        .bind(persona.seed.map(i64::from))
        .bind(persona.created_at)
        .bind(persona.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_personas(&self) -> Result<Vec<Persona>> {
        let rows = sqlx::query_as::<_, PersonaRow>(
            "SELECT id, name, face_json, body_json, style_json, reference_images_json, thumbnail, seed, created_at, updated_at \
             FROM personas ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(PersonaRow::into_persona).collect()
    }

    pub async fn get_persona(&self, id: &str) -> Result<Option<Persona>> {
        let row = sqlx::query_as::<_, PersonaRow>(
            "SELECT id, name, face_json, body_json, style_json, reference_images_json, thumbnail, seed, created_at, updated_at \
             FROM personas WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(PersonaRow::into_persona).transpose()
    }

    pub async fn update_persona(&self, persona: &Persona) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE personas \
             SET name = ?, face_json = ?, body_json = ?, style_json = ?, reference_images_json = ?, thumbnail = ?, seed = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&persona.name)
        .bind(serde_json::to_string(&persona.face)?)
        .bind(serde_json::to_string(&persona.body)?)
        .bind(serde_json::to_string(&persona.style)?)
        .bind(serde_json::to_string(&persona.reference_images)?)
        .bind(&persona.thumbnail)
        .bind(persona.seed.map(i64::from))
        .bind(persona.updated_at)
        .bind(&persona.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_persona(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM personas WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_image(&self, image: &GeneratedImage) -> Result<()> {
        sqlx::query(
            "INSERT INTO images \
             (id, model_id, url, prompt, scene_json, output_json, tags_json, is_favorite, seed, campaign_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&image.id)
        .bind(&image.model_id)
        .bind(&image.url)
        .bind(&image.prompt)
        .bind(serde_json::to_string(&image.scene)?)
        .bind(serde_json::to_string(&image.output)?)
        .bind(serde_json::to_string(&image.tags)?)
        .bind(if image.is_favorite { 1 } else { 0 })
        .bind(image.seed.map(i64::from))
        .bind(&image.campaign_id)
        .bind(image.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_images(
        &self,
        model_id: Option<&str>,
        campaign_id: Option<&str>,
    ) -> Result<Vec<GeneratedImage>> {
        let mut query = String::from(
            "SELECT id, model_id, url, prompt, scene_json, output_json, tags_json, is_favorite, seed, campaign_id, created_at \
             FROM images",
        );
        let mut clauses: Vec<&str> = Vec::new();
        if model_id.is_some() {
            clauses.push("model_id = ?");
        }
        if campaign_id.is_some() {
            clauses.push("campaign_id = ?");
        }
        if !clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&clauses.join(" AND "));
        }
        query.push_str(" ORDER BY created_at DESC");

        let mut statement = sqlx::query_as::<_, ImageRow>(&query);
        if let Some(model_id) = model_id {
            statement = statement.bind(model_id);
        }
        if let Some(campaign_id) = campaign_id {
            statement = statement.bind(campaign_id);
        }

        let rows = statement.fetch_all(&self.pool).await?;
        rows.into_iter().map(ImageRow::into_image).collect()
    }

    pub async fn get_image(&self, id: &str) -> Result<Option<GeneratedImage>> {
        let row = sqlx::query_as::<_, ImageRow>(
            "SELECT id, model_id, url, prompt, scene_json, output_json, tags_json, is_favorite, seed, campaign_id, created_at \
             FROM images WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(ImageRow::into_image).transpose()
    }

    pub async fn toggle_image_favorite(&self, id: &str) -> Result<Option<GeneratedImage>> {
        let result = sqlx::query("UPDATE images SET is_favorite = 1 - is_favorite WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_image(id).await
    }

    pub async fn set_image_tags(&self, id: &str, tags: &[String]) -> Result<bool> {
        let result = sqlx::query("UPDATE images SET tags_json = ? WHERE id = ?")
            .bind(serde_json::to_string(tags)?)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn assign_image_campaign(&self, id: &str, campaign_id: Option<&str>) -> Result<bool> {
        let result = sqlx::query("UPDATE images SET campaign_id = ? WHERE id = ?")
            .bind(campaign_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_image(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM images WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_campaign(&self, campaign: &Campaign) -> Result<()> {
        sqlx::query(
            "INSERT INTO campaigns \
             (id, name, description, brand_name, brand_colors_json, mood, target_platforms_json, model_ids_json, content_brief, product_images_json, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&campaign.id)
        .bind(&campaign.name)
        .bind(&campaign.description)
        .bind(&campaign.brand_name)
        .bind(serde_json::to_string(&campaign.brand_colors)?)
        .bind(&campaign.mood)
        .bind(serde_json::to_string(&campaign.target_platforms)?)
        .bind(serde_json::to_string(&campaign.model_ids)?)
        .bind(&campaign.content_brief)
        .bind(serde_json::to_string(&campaign.product_images)?)
        .bind(campaign.created_at)
        .bind(campaign.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>> {
        let rows = sqlx::query_as::<_, CampaignRow>(
            "SELECT id, name, description, brand_name, brand_colors_json, mood, target_platforms_json, model_ids_json, content_brief, product_images_json, created_at, updated_at \
             FROM campaigns ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(CampaignRow::into_campaign).collect()
    }

    pub async fn get_campaign(&self, id: &str) -> Result<Option<Campaign>> {
        let row = sqlx::query_as::<_, CampaignRow>(
            "SELECT id, name, description, brand_name, brand_colors_json, mood, target_platforms_json, model_ids_json, content_brief, product_images_json, created_at, updated_at \
             FROM campaigns WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(CampaignRow::into_campaign).transpose()
    }

    pub async fn update_campaign(&self, campaign: &Campaign) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE campaigns \
             SET name = ?, description = ?, brand_name = ?, brand_colors_json = ?, mood = ?, target_platforms_json = ?, model_ids_json = ?, content_brief = ?, product_images_json = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&campaign.name)
        .bind(&campaign.description)
        .bind(&campaign.brand_name)
        .bind(serde_json::to_string(&campaign.brand_colors)?)
        .bind(&campaign.mood)
        .bind(serde_json::to_string(&campaign.target_platforms)?)
        .bind(serde_json::to_string(&campaign.model_ids)?)
        .bind(&campaign.content_brief)
        .bind(serde_json::to_string(&campaign.product_images)?)
        .bind(campaign.updated_at)
        .bind(&campaign.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_campaign(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        let personas = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM personas")
            .fetch_one(&self.pool)
            .await?;
        let images = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM images")
            .fetch_one(&self.pool)
            .await?;
        let campaigns = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM campaigns")
            .fetch_one(&self.pool)
            .await?;
        Ok(StoreStats {
            personas,
            images,
            campaigns,
        })
    }
}
