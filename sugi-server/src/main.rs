use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

mod db;
mod error;
mod extractors;
mod handlers;

pub use error::Error;
use extractors::{AppState, PgPool};

#[derive(structopt::StructOpt)]
struct Opt {
    /// Address to listen on
    #[structopt(short, long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,
}

fn admin_token() -> Option<String> {
    match std::env::var("ADMIN_TOKEN") {
        Ok(tok) if !tok.is_empty() => Some(tok),
        _ => {
            tracing::warn!("ADMIN_TOKEN not set, admin endpoints are disabled");
            None
        }
    }
}

fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/essays",
            get(handlers::list_essays).post(handlers::create_essay),
        )
        .route(
            "/api/essays/:id",
            get(handlers::get_essay).delete(handlers::delete_essay),
        )
        .route("/api/essays/:id/like", post(handlers::like_essay))
        .route("/api/essays/:id/unlike", post(handlers::unlike_essay))
        .route(
            "/api/essays/:id/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = <Opt as structopt::StructOpt>::from_args();
    tracing_subscriber::fmt::init();

    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let db = sqlx::postgres::PgPoolOptions::new()
        .max_connections(8)
        .connect(&db_url)
        .await
        .with_context(|| format!("Error opening database {:?}", db_url))?;
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("running pending migrations")?;

    let state = AppState {
        db: PgPool::new(db),
        admin_token: admin_token(),
    };

    tracing::info!("listening on {}", opt.bind);
    axum::Server::bind(&opt.bind)
        .serve(app(state).into_make_service())
        .await
        .context("serving axum webserver")
}
