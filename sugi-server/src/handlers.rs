use axum::{
    extract::{Path, Query},
    Json,
};
use sugi_api::{Comment, Essay, EssayForm, EssayId, NewComment};

use crate::{db, extractors::*, Error};

#[derive(serde::Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

pub async fn list_essays(
    mut conn: PgConn,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Essay>>, Error> {
    Ok(Json(db::list_essays(&mut *conn, params.limit).await?))
}

pub async fn create_essay(
    mut conn: PgConn,
    Json(form): Json<EssayForm>,
) -> Result<Json<Essay>, Error> {
    form.validate()?;
    Ok(Json(db::create_essay(&mut *conn, form.normalized()).await?))
}

pub async fn get_essay(
    mut conn: PgConn,
    Path(id): Path<EssayId>,
) -> Result<Json<Essay>, Error> {
    Ok(Json(
        db::get_essay(&mut *conn, id)
            .await?
            .ok_or(Error::essay_not_found(id.0))?,
    ))
}

pub async fn delete_essay(
    _auth: AdminAuth,
    mut conn: PgConn,
    Path(id): Path<EssayId>,
) -> Result<(), Error> {
    db::delete_essay(&mut *conn, id).await?;
    Ok(())
}

pub async fn like_essay(mut conn: PgConn, Path(id): Path<EssayId>) -> Result<Json<i64>, Error> {
    Ok(Json(db::like_essay(&mut *conn, id).await?))
}

pub async fn unlike_essay(mut conn: PgConn, Path(id): Path<EssayId>) -> Result<Json<i64>, Error> {
    Ok(Json(db::unlike_essay(&mut *conn, id).await?))
}

pub async fn list_comments(
    mut conn: PgConn,
    Path(id): Path<EssayId>,
) -> Result<Json<Vec<Comment>>, Error> {
    Ok(Json(db::list_comments(&mut *conn, id).await?))
}

pub async fn create_comment(
    mut conn: PgConn,
    Path(id): Path<EssayId>,
    Json(c): Json<NewComment>,
) -> Result<Json<Comment>, Error> {
    c.validate()?;
    Ok(Json(db::create_comment(&mut *conn, id, c).await?))
}
