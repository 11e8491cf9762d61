use std::convert::Infallible;

use warp::{Filter, Rejection, Reply};

use super::handlers;
use crate::session_management::SessionManager;

/// Upper bound for capture request bodies.
pub const MAX_BODY_BYTES: u64 = 16 * 1024;

fn with_manager(
    manager: SessionManager,
) -> impl Filter<Extract = (SessionManager,), Error = Infallible> + Clone {
    warp::any().map(move || manager.clone())
}

/// All JSON endpoints, mounted under `/api`.
pub fn api_routes(
    manager: SessionManager,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("api").and(
        stats_route(manager.clone())
            .or(create_record_route(manager.clone()))
            .or(list_records_route(manager.clone()))
            .or(clear_records_route(manager.clone()))
            .or(reset_route(manager.clone()))
            .or(export_route(manager))
            .or(scenarios_route())
            .or(scenario_route()),
    )
}

/// GET /stats
pub fn stats_route(
    manager: SessionManager,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("stats")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_manager(manager))
        .and_then(handlers::get_stats)
}

/// POST /captured-records
pub fn create_record_route(
    manager: SessionManager,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("captured-records")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(warp::header::optional::<String>("x-forwarded-for"))
        .and(warp::header::optional::<String>("user-agent"))
        .and(warp::addr::remote())
        .and(with_manager(manager))
        .and_then(handlers::create_record)
}

/// GET /captured-records
pub fn list_records_route(
    manager: SessionManager,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("captured-records")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_manager(manager))
        .and_then(handlers::list_records)
}

/// DELETE /captured-records
pub fn clear_records_route(
    manager: SessionManager,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("captured-records")
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_manager(manager))
        .and_then(handlers::clear_records)
}

/// POST /reset
pub fn reset_route(
    manager: SessionManager,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("reset")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_manager(manager))
        .and_then(handlers::reset)
}

/// GET /export
pub fn export_route(
    manager: SessionManager,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("export")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_manager(manager))
        .and_then(handlers::export)
}

/// GET /scenarios
pub fn scenarios_route() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("scenarios")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::list_scenarios)
}

/// GET /scenarios/:label
pub fn scenario_route() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("scenarios" / String)
        .and(warp::get())
        .and_then(handlers::get_scenario)
}
