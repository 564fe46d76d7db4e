use anyhow::Context;
use chrono::Utc;
use futures::TryStreamExt;
use sqlx::Row;
use sugi_api::{Comment, CommentId, Essay, EssayForm, EssayId, NewComment, Uuid, ANSWER_COUNT};

use crate::Error;

fn essay_from_row(row: &sqlx::postgres::PgRow) -> anyhow::Result<Essay> {
    let answers: Vec<String> = row.try_get("answers").context("retrieving answers")?;
    let answers: [String; ANSWER_COUNT] = answers
        .try_into()
        .map_err(|a: Vec<String>| anyhow::anyhow!("essay row with {} answer slots", a.len()))?;
    Ok(Essay {
        id: EssayId(row.try_get("id").context("retrieving the id field")?),
        nickname: row
            .try_get("nickname")
            .context("retrieving the nickname field")?,
        answers,
        created_at: row
            .try_get("created_at")
            .context("retrieving the created_at field")?,
        likes_count: row
            .try_get("likes_count")
            .context("retrieving the likes_count field")?,
        comments_count: row
            .try_get("comments_count")
            .context("retrieving the comments_count field")?,
    })
}

const ESSAY_COLUMNS: &str = "
    e.id, e.nickname, e.answers, e.created_at, e.likes_count,
    (SELECT COUNT(*) FROM comments c WHERE c.essay_id = e.id) AS comments_count
";

pub async fn list_essays(
    conn: &mut sqlx::PgConnection,
    limit: Option<usize>,
) -> anyhow::Result<Vec<Essay>> {
    let mut essays = Vec::new();
    let sql = format!(
        "
            SELECT {ESSAY_COLUMNS}
                FROM essays e
            ORDER BY e.created_at DESC, e.id DESC
            LIMIT $1
        "
    );
    let mut query = sqlx::query(&sql)
        .bind(limit.map(|l| l as i64))
        .fetch(conn);
    while let Some(row) = query.try_next().await.context("querying essays table")? {
        essays.push(essay_from_row(&row)?);
    }
    Ok(essays)
}

pub async fn get_essay(
    conn: &mut sqlx::PgConnection,
    id: EssayId,
) -> anyhow::Result<Option<Essay>> {
    let row = sqlx::query(&format!(
        "
            SELECT {ESSAY_COLUMNS}
                FROM essays e
            WHERE e.id = $1
        "
    ))
    .bind(id.0)
    .fetch_optional(conn)
    .await
    .context("querying essays table")?;
    row.as_ref().map(essay_from_row).transpose()
}

pub async fn create_essay(
    conn: &mut sqlx::PgConnection,
    form: EssayForm,
) -> anyhow::Result<Essay> {
    let essay = Essay {
        id: EssayId(Uuid::new_v4()),
        nickname: form.nickname,
        answers: form.answers,
        created_at: Utc::now(),
        likes_count: 0,
        comments_count: 0,
    };
    sqlx::query(
        "
            INSERT INTO essays (id, nickname, answers, created_at, likes_count)
            VALUES ($1, $2, $3, $4, 0)
        ",
    )
    .bind(essay.id.0)
    .bind(&essay.nickname)
    .bind(&essay.answers[..])
    .bind(essay.created_at)
    .execute(conn)
    .await
    .context("inserting into essays table")?;
    Ok(essay)
}

/// Deleting an essay that is already gone succeeds, so that retries of a
/// half-failed bulk delete converge
pub async fn delete_essay(conn: &mut sqlx::PgConnection, id: EssayId) -> anyhow::Result<()> {
    // comments go away through the ON DELETE CASCADE
    sqlx::query("DELETE FROM essays WHERE id = $1")
        .bind(id.0)
        .execute(conn)
        .await
        .context("deleting from essays table")?;
    Ok(())
}

pub async fn like_essay(conn: &mut sqlx::PgConnection, id: EssayId) -> Result<i64, Error> {
    adjust_likes(conn, id, "likes_count + 1").await
}

pub async fn unlike_essay(conn: &mut sqlx::PgConnection, id: EssayId) -> Result<i64, Error> {
    adjust_likes(conn, id, "GREATEST(likes_count - 1, 0)").await
}

async fn adjust_likes(
    conn: &mut sqlx::PgConnection,
    id: EssayId,
    expr: &str,
) -> Result<i64, Error> {
    let row = sqlx::query(&format!(
        "UPDATE essays SET likes_count = {expr} WHERE id = $1 RETURNING likes_count"
    ))
    .bind(id.0)
    .fetch_optional(conn)
    .await
    .context("updating likes_count")?
    .ok_or(Error::essay_not_found(id.0))?;
    Ok(row
        .try_get("likes_count")
        .context("retrieving the likes_count field")?)
}

pub async fn list_comments(
    conn: &mut sqlx::PgConnection,
    essay: EssayId,
) -> anyhow::Result<Vec<Comment>> {
    let mut comments = Vec::new();
    let mut query = sqlx::query(
        "
            SELECT id, essay_id, nickname, content, created_at
                FROM comments
            WHERE essay_id = $1
            ORDER BY created_at ASC, id ASC
        ",
    )
    .bind(essay.0)
    .fetch(conn);
    while let Some(row) = query.try_next().await.context("querying comments table")? {
        comments.push(Comment {
            id: CommentId(row.try_get("id").context("retrieving the id field")?),
            essay_id: EssayId(
                row.try_get("essay_id")
                    .context("retrieving the essay_id field")?,
            ),
            nickname: row
                .try_get("nickname")
                .context("retrieving the nickname field")?,
            content: row
                .try_get("content")
                .context("retrieving the content field")?,
            created_at: row
                .try_get("created_at")
                .context("retrieving the created_at field")?,
        });
    }
    Ok(comments)
}

pub async fn create_comment(
    conn: &mut sqlx::PgConnection,
    essay: EssayId,
    c: NewComment,
) -> Result<Comment, Error> {
    if get_essay(&mut *conn, essay).await?.is_none() {
        return Err(Error::essay_not_found(essay.0));
    }
    let comment = Comment {
        id: CommentId(Uuid::new_v4()),
        essay_id: essay,
        nickname: c.nickname,
        content: c.content,
        created_at: Utc::now(),
    };
    sqlx::query(
        "
            INSERT INTO comments (id, essay_id, nickname, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(comment.id.0)
    .bind(comment.essay_id.0)
    .bind(&comment.nickname)
    .bind(&comment.content)
    .bind(comment.created_at)
    .execute(conn)
    .await
    .context("inserting into comments table")?;
    Ok(comment)
}
