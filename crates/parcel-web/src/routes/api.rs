//! Filter API endpoints
//!
//! The renderer reads `/api/filters` and draws checkboxes from the
//! snapshot; every checkbox change posts to `/api/filters/toggle`.
//! Selection state lives server-side and is authoritative - the client
//! never reports its own checkbox states back.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use parcel_types::{
    FiltersResponse, ParcelsQuery, ParcelsResponse, SummaryResponse, ToggleRequest,
};

use crate::state::AppState;

const DEFAULT_PAGE_SIZE: usize = 100;
const MAX_PAGE_SIZE: usize = 1000;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/filters", get(get_filters))
        .route("/api/filters/toggle", post(toggle_filter))
        .route("/api/filters/clear", post(clear_filters))
        .route("/api/parcels", get(get_parcels))
        .route("/api/summary", get(get_summary))
        .with_state(state)
}

/// Current render state of all three dropdowns.
pub async fn get_filters(State(state): State<AppState>) -> Json<FiltersResponse> {
    let filters = state.filters();
    Json(FiltersResponse {
        filters: filters.snapshots(),
        generation: filters.generation(),
    })
}

/// Apply one checkbox change and return the updated snapshot. Unknown
/// node ids are a no-op, not an error.
pub async fn toggle_filter(
    State(state): State<AppState>,
    Json(req): Json<ToggleRequest>,
) -> Json<FiltersResponse> {
    let mut filters = state.filters_mut();
    filters.toggle(req.filter, &req.node_id, req.checked);
    Json(FiltersResponse {
        filters: filters.snapshots(),
        generation: filters.generation(),
    })
}

/// The "clear filters" action: every dropdown back to all-selected.
pub async fn clear_filters(State(state): State<AppState>) -> Json<FiltersResponse> {
    let mut filters = state.filters_mut();
    filters.clear_all();
    Json(FiltersResponse {
        filters: filters.snapshots(),
        generation: filters.generation(),
    })
}

/// Filtered parcel listing with pagination.
pub async fn get_parcels(
    State(state): State<AppState>,
    Query(query): Query<ParcelsQuery>,
) -> Json<ParcelsResponse> {
    let filters = state.filters();
    let matched = filters.filter(&state.parcels);

    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let page = matched
        .iter()
        .skip(offset)
        .take(limit)
        .map(|r| (*r).clone())
        .collect();

    Json(ParcelsResponse {
        total: state.parcels.len(),
        matched: matched.len(),
        parcels: page,
    })
}

/// Dataset totals plus the active-filter summary line.
pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    let filters = state.filters();
    let matched = state.parcels.iter().filter(|r| filters.matches(r)).count();
    Json(SummaryResponse {
        total_parcels: state.parcels.len(),
        matched_parcels: matched,
        filter_summary: filters.summary(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_browser::{FilterSet, RulesLoader};
    use parcel_types::{FilterKind, ParcelRecord};

    fn test_state() -> AppState {
        let parcels: Vec<ParcelRecord> = vec![
            ParcelRecord {
                parcel_id: "p1".into(),
                class_code: "1010".into(),
                year_built: Some(1952.0),
                zoning: "R1".into(),
                ..Default::default()
            },
            ParcelRecord {
                parcel_id: "p2".into(),
                class_code: "1040".into(),
                year_built: Some(1990.0),
                zoning: "GC".into(),
                ..Default::default()
            },
        ];
        let config = RulesLoader::from_env().load().expect("repo config");
        let filters = FilterSet::build(&parcels, &config);
        AppState::new(parcels, filters)
    }

    #[tokio::test]
    async fn filters_snapshot_has_three_dropdowns() {
        let state = test_state();
        let Json(response) = get_filters(State(state)).await;
        assert_eq!(response.filters.len(), 3);
        assert_eq!(response.generation, 0);
        assert!(response.filters.iter().all(|f| f.all_selected));
    }

    #[tokio::test]
    async fn toggle_then_parcels_reflects_filtering() {
        let state = test_state();

        let Json(response) = toggle_filter(
            State(state.clone()),
            Json(ToggleRequest {
                filter: FilterKind::PropertyClass,
                node_id: "1040".into(),
                checked: true,
            }),
        )
        .await;
        assert_eq!(response.generation, 1);

        let Json(parcels) = get_parcels(
            State(state.clone()),
            Query(ParcelsQuery::default()),
        )
        .await;
        assert_eq!(parcels.total, 2);
        assert_eq!(parcels.matched, 1);
        assert_eq!(parcels.parcels[0].parcel_id, "p2");

        let Json(summary) = get_summary(State(state)).await;
        assert_eq!(summary.matched_parcels, 1);
        assert_eq!(summary.filter_summary, "1 property classes");
    }

    #[tokio::test]
    async fn clear_restores_all_selected() {
        let state = test_state();

        toggle_filter(
            State(state.clone()),
            Json(ToggleRequest {
                filter: FilterKind::Zoning,
                node_id: "R1".into(),
                checked: true,
            }),
        )
        .await;

        let Json(response) = clear_filters(State(state.clone())).await;
        assert!(response.filters.iter().all(|f| f.all_selected));

        let Json(parcels) = get_parcels(State(state), Query(ParcelsQuery::default())).await;
        assert_eq!(parcels.matched, 2);
    }

    #[tokio::test]
    async fn pagination_limits_page_not_match_count() {
        let state = test_state();
        let Json(parcels) = get_parcels(
            State(state),
            Query(ParcelsQuery {
                offset: Some(0),
                limit: Some(1),
            }),
        )
        .await;
        assert_eq!(parcels.matched, 2);
        assert_eq!(parcels.parcels.len(), 1);
    }
}
