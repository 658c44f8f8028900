// src/common/db_utils.rs

use crate::common::error::AppError;
use crate::config::AppState;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::tenancy::TenantContext;
use uuid::Uuid;

// ---
// Helpers RLS: a "chave" para o banco de dados
// ---
// As policies das tabelas multi-tenant filtram por
// current_setting('app.tenant_id'); sem o set_config abaixo nenhuma
// linha é visível.

/// Adquire uma conexão da pool e define as variáveis RLS do tenant.
pub(crate) async fn get_rls_connection(
    app_state: &AppState,
    tenant_ctx: &TenantContext,
    user: &AuthenticatedUser,
) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>, AppError> {
    // O operador '?' converte sqlx::Error -> AppError::DatabaseError
    let mut conn = app_state.db_pool.acquire().await?;

    sqlx::query("SELECT set_config('app.tenant_id', $1, true)")
        .bind(tenant_ctx.0.to_string())
        .execute(&mut *conn)
        .await?;

    sqlx::query("SELECT set_config('app.user_id', $1, true)")
        .bind(user.0.id.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(conn)
}

/// Conexão para o fluxo público de aceite: em vez do tenant, a chave RLS
/// é o share_token do orçamento (policy quote_share_access).
pub(crate) async fn get_share_connection(
    app_state: &AppState,
    share_token: Uuid,
) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>, AppError> {
    let mut conn = app_state.db_pool.acquire().await?;

    sqlx::query("SELECT set_config('app.share_token', $1, true)")
        .bind(share_token.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(conn)
}
