use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use teamspace_core::models::{Member, MemberWithUser, NewMember};
use teamspace_core::AppError;
use uuid::Uuid;

use crate::traits::MemberStore;

/// Repository for workspace memberships
#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberStore for MemberRepository {
    #[tracing::instrument(skip(self), fields(db.table = "members", db.operation = "select"))]
    async fn find_memberships(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Member>, AppError> {
        let rows = sqlx::query_as::<Postgres, Member>(
            r#"
            SELECT id, workspace_id, user_id, role, created_at
            FROM members
            WHERE workspace_id = $1 AND user_id = $2
            "#,
        )
        .bind(workspace_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "members", db.operation = "select", db.record_id = %id))]
    async fn get_member(&self, id: Uuid) -> Result<Option<Member>, AppError> {
        let member = sqlx::query_as::<Postgres, Member>(
            "SELECT id, workspace_id, user_id, role, created_at FROM members WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    #[tracing::instrument(skip(self), fields(db.table = "members", db.operation = "select"))]
    async fn list_memberships_for_user(&self, user_id: Uuid) -> Result<Vec<Member>, AppError> {
        let rows = sqlx::query_as::<Postgres, Member>(
            "SELECT id, workspace_id, user_id, role, created_at FROM members WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "members", db.operation = "select"))]
    async fn list_members_with_users(
        &self,
        workspace_id: Uuid,
    ) -> Result<Vec<MemberWithUser>, AppError> {
        let rows = sqlx::query_as::<Postgres, MemberWithUser>(
            r#"
            SELECT m.id, m.workspace_id, m.user_id, m.role, u.name, u.email, m.created_at
            FROM members m
            JOIN users u ON u.id = m.user_id
            WHERE m.workspace_id = $1
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self, member), fields(db.table = "members", db.operation = "insert"))]
    async fn insert_member_if_absent(
        &self,
        member: NewMember,
    ) -> Result<Option<Member>, AppError> {
        let inserted = sqlx::query_as::<Postgres, Member>(
            r#"
            INSERT INTO members (workspace_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (workspace_id, user_id) DO NOTHING
            RETURNING id, workspace_id, user_id, role, created_at
            "#,
        )
        .bind(member.workspace_id)
        .bind(member.user_id)
        .bind(member.role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted)
    }
}
