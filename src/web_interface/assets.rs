//! Embedded operator dashboard.
//!
//! The files under `web/` are compiled into the binary; `debug-embed` keeps
//! debug builds self-contained as well.

use rust_embed::RustEmbed;
use warp::{path::Tail, reply, Filter, Rejection, Reply};

use crate::error_handling::types::ApiError;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/web/"]
struct DashboardAssets;

/// GET / and GET /static/*
pub fn dashboard_routes() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .and_then(|| serve_asset("index.html".to_string()));
    let files = warp::path("static")
        .and(warp::path::tail())
        .and(warp::get())
        .and_then(|tail: Tail| serve_asset(tail.as_str().to_string()));
    index.or(files)
}

async fn serve_asset(path: String) -> Result<impl Reply, Rejection> {
    let asset = DashboardAssets::get(&path)
        .ok_or_else(|| warp::reject::custom(ApiError::NotFound(format!("Asset '{}'", path))))?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(reply::with_header(
        asset.data.into_owned(),
        "Content-Type",
        mime.to_string(),
    ))
}
