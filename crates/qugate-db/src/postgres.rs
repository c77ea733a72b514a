//! Postgres record store: storage_providers and api_tokens tables.

use crate::store::{check_token, prepare_provider, RecordStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use qugate_core::models::{ApiToken, ProviderRecord, StorageType};
use qugate_core::AppError;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Row type for storage_providers table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
struct ProviderRow {
    id: Uuid,
    storage_type: StorageType,
    name: String,
    is_active: bool,
    owner: String,
    description: String,
    login: Json<serde_json::Value>,
}

impl ProviderRow {
    fn into_record(self) -> ProviderRecord {
        ProviderRecord {
            id: self.id,
            storage_type: self.storage_type,
            name: self.name,
            is_active: self.is_active,
            owner: self.owner,
            description: self.description,
            login: self.login.0,
        }
    }
}

/// Row type for api_tokens table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
struct TokenRow {
    key: String,
    username: String,
    created_at: DateTime<Utc>,
    is_active: bool,
    storage_provider: Option<Uuid>,
    uuid_hex: Option<String>,
}

impl TokenRow {
    fn into_token(self) -> ApiToken {
        ApiToken {
            key: self.key,
            user: self.username,
            created_at: self.created_at,
            is_active: self.is_active,
            storage_provider: self.storage_provider,
            uuid_hex: self.uuid_hex,
        }
    }
}

/// `RecordStore` backed by Postgres.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgStore {
    #[tracing::instrument(skip(self), fields(db.table = "storage_providers"))]
    async fn get_provider_by_name(&self, name: &str) -> Result<Option<ProviderRecord>, AppError> {
        let row: Option<ProviderRow> = sqlx::query_as::<Postgres, ProviderRow>(
            r#"
            SELECT id, storage_type, name, is_active, owner, description, login
            FROM storage_providers WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.into_record()))
    }

    #[tracing::instrument(skip(self), fields(db.table = "storage_providers"))]
    async fn list_providers(&self) -> Result<Vec<ProviderRecord>, AppError> {
        let rows: Vec<ProviderRow> = sqlx::query_as::<Postgres, ProviderRow>(
            r#"
            SELECT id, storage_type, name, is_active, owner, description, login
            FROM storage_providers ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.into_record()).collect())
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "storage_providers"))]
    async fn add_provider(&self, record: ProviderRecord) -> Result<ProviderRecord, AppError> {
        let record = prepare_provider(record)?;
        let row: ProviderRow = sqlx::query_as::<Postgres, ProviderRow>(
            r#"
            INSERT INTO storage_providers (id, storage_type, name, is_active, owner, description, login)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, storage_type, name, is_active, owner, description, login
            "#,
        )
        .bind(record.id)
        .bind(record.storage_type)
        .bind(&record.name)
        .bind(record.is_active)
        .bind(&record.owner)
        .bind(&record.description)
        .bind(Json(&record.login))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into_record())
    }

    #[tracing::instrument(skip(self), fields(db.table = "storage_providers"))]
    async fn set_provider_active(&self, name: &str, is_active: bool) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE storage_providers SET is_active = $2 WHERE name = $1")
            .bind(name)
            .bind(is_active)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::UnknownProvider(name.to_string()));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, key), fields(db.table = "api_tokens"))]
    async fn get_token_by_key(&self, key: &str) -> Result<Option<ApiToken>, AppError> {
        let row: Option<TokenRow> = sqlx::query_as::<Postgres, TokenRow>(
            r#"
            SELECT key, username, created_at, is_active, storage_provider, uuid_hex
            FROM api_tokens WHERE key = $1 AND is_active
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.into_token()))
    }

    #[tracing::instrument(skip(self, token), fields(db.table = "api_tokens"))]
    async fn add_token(&self, token: ApiToken) -> Result<(), AppError> {
        check_token(&token)?;
        sqlx::query(
            r#"
            INSERT INTO api_tokens (key, username, created_at, is_active, storage_provider, uuid_hex)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (key) DO UPDATE
            SET username = EXCLUDED.username,
                is_active = EXCLUDED.is_active,
                storage_provider = EXCLUDED.storage_provider,
                uuid_hex = EXCLUDED.uuid_hex
            "#,
        )
        .bind(&token.key)
        .bind(&token.user)
        .bind(token.created_at)
        .bind(token.is_active)
        .bind(token.storage_provider)
        .bind(&token.uuid_hex)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
