use crate::app::roster_service::{RosterEntry, RosterListing};
use crate::domain::crew::{CrewDraft, CrewId, CrewPatch, CrewRecord, CrewStatus};
use crate::domain::status::{SkippedRecord, StatusChange};
use crate::domain::views::{CalendarEvent, FilterOptions, RosterFilter, TimelineBar};
use crate::transport::http::handlers::{crew, health, roster};
use crate::transport::http::types::{ApiResponse, AppState, SweepRequest};
use axum::routing::{get, post, put};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        crew::list_crew_handler,
        crew::get_crew_handler,
        crew::create_crew_handler,
        crew::update_crew_handler,
        crew::update_crew_by_name_handler,
        crew::delete_crew_handler,
        crew::delete_crew_by_name_handler,
        roster::sweep_handler,
        roster::filters_handler,
        roster::calendar_handler,
        roster::timeline_handler
    ),
    components(schemas(
        ApiResponse,
        CrewDraft,
        CrewPatch,
        CrewRecord,
        CrewStatus,
        CrewId,
        SweepRequest,
        RosterEntry,
        RosterListing,
        StatusChange,
        SkippedRecord,
        FilterOptions,
        CalendarEvent,
        TimelineBar,
        RosterFilter
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/crew",
            get(crew::list_crew_handler).post(crew::create_crew_handler),
        )
        .route(
            "/api/crew/:id",
            get(crew::get_crew_handler)
                .put(crew::update_crew_handler)
                .delete(crew::delete_crew_handler),
        )
        .route(
            "/api/crew-by-name/:name",
            put(crew::update_crew_by_name_handler).delete(crew::delete_crew_by_name_handler),
        )
        .route("/api/roster/sweep", post(roster::sweep_handler))
        .route("/api/roster/filters", get(roster::filters_handler))
        .route("/api/roster/calendar", get(roster::calendar_handler))
        .route("/api/roster/timeline", get(roster::timeline_handler))
        .with_state(app_state)
}
