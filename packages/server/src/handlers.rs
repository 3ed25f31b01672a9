//! HTTP handler functions for the pest map API.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use pest_map_analytics::{
    AnalyticsError, cost_benefit as cost_benefit_rows, filter_observations, monthly_trend,
    recommend, severity_trend, summarize, town_breakdown,
};
use pest_map_dataset_models::{BoundingBox, Observation, ObservationFilter};
use pest_map_pest_models::{Crop, Town};
use pest_map_server_models::{
    ApiCatalog, ApiCrop, ApiError, ApiHealth, ApiObservation, ApiTown, FilterParams,
    ObservationPage, ObservationQueryParams, RankingQueryParams,
};

use crate::AppState;

const DEFAULT_PAGE_SIZE: usize = 100;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/catalog`
///
/// Returns the towns and crops with their pests and diseases.
pub async fn catalog() -> HttpResponse {
    let towns = Town::all()
        .iter()
        .map(|town| {
            let (latitude, longitude) = town.coordinates();
            ApiTown {
                name: *town,
                latitude,
                longitude,
            }
        })
        .collect();

    let crops = Crop::all()
        .iter()
        .map(|crop| ApiCrop {
            name: *crop,
            unit_value: crop.unit_value(),
            diseases: crop.diseases().to_vec(),
        })
        .collect();

    HttpResponse::Ok().json(ApiCatalog { towns, crops })
}

/// `GET /api/observations`
///
/// Returns one page of the filtered dataset.
pub async fn observations(
    state: web::Data<AppState>,
    params: web::Query<ObservationQueryParams>,
) -> HttpResponse {
    let (subset, _) = match select(&state, &FilterParams::from(&*params)) {
        Ok(selected) => selected,
        Err(response) => return response,
    };

    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let total_count = subset.len();

    let page: Vec<ApiObservation> = subset
        .iter()
        .skip(offset)
        .take(limit)
        .map(ApiObservation::from)
        .collect();

    HttpResponse::Ok().json(ObservationPage {
        has_more: offset.saturating_add(page.len()) < total_count,
        observations: page,
        total_count,
    })
}

/// `GET /api/summary`
///
/// Returns the headline figures, or `null` when nothing matches.
pub async fn summary(state: web::Data<AppState>, params: web::Query<FilterParams>) -> HttpResponse {
    match select(&state, &params) {
        Ok((subset, filter)) => HttpResponse::Ok().json(summarize(&subset, &filter.towns)),
        Err(response) => response,
    }
}

/// `GET /api/rankings`
///
/// Ranks diseases by threat index with treatment recommendations.
pub async fn rankings(
    state: web::Data<AppState>,
    params: web::Query<RankingQueryParams>,
) -> HttpResponse {
    match select(&state, &FilterParams::from(&*params)) {
        Ok((subset, _)) => HttpResponse::Ok().json(recommend(
            &subset,
            params.profile.unwrap_or_default(),
            params.limit,
        )),
        Err(response) => response,
    }
}

/// `GET /api/trend/monthly`
pub async fn monthly(state: web::Data<AppState>, params: web::Query<FilterParams>) -> HttpResponse {
    match select(&state, &params) {
        Ok((subset, _)) => HttpResponse::Ok().json(monthly_trend(&subset)),
        Err(response) => response,
    }
}

/// `GET /api/trend/severity`
///
/// Fits a linear severity trend. Responds `422` when the subset spans
/// fewer than two months.
pub async fn severity(state: web::Data<AppState>, params: web::Query<FilterParams>) -> HttpResponse {
    let (subset, _) = match select(&state, &params) {
        Ok(selected) => selected,
        Err(response) => return response,
    };

    match severity_trend(&subset) {
        Ok(trend) => HttpResponse::Ok().json(trend),
        Err(e @ AnalyticsError::InsufficientData { .. }) => {
            log::debug!("Severity trend unavailable: {e}");
            HttpResponse::UnprocessableEntity().json(ApiError {
                error: e.to_string(),
            })
        }
    }
}

/// `GET /api/towns`
pub async fn towns(state: web::Data<AppState>, params: web::Query<FilterParams>) -> HttpResponse {
    match select(&state, &params) {
        Ok((subset, _)) => HttpResponse::Ok().json(town_breakdown(&subset)),
        Err(response) => response,
    }
}

/// `GET /api/cost-benefit`
pub async fn cost_benefit(
    state: web::Data<AppState>,
    params: web::Query<FilterParams>,
) -> HttpResponse {
    match select(&state, &params) {
        Ok((subset, _)) => HttpResponse::Ok().json(cost_benefit_rows(&subset)),
        Err(response) => response,
    }
}

/// Loads the cached dataset and applies the query filter.
fn select(
    state: &AppState,
    params: &FilterParams,
) -> Result<(Vec<Observation>, ObservationFilter), HttpResponse> {
    let dataset: Arc<[Observation]> = state.cache.get().map_err(|e| {
        log::error!("Failed to generate dataset: {e}");
        HttpResponse::InternalServerError().json(ApiError {
            error: "Failed to generate dataset".to_string(),
        })
    })?;

    let filter = parse_filter(params);
    Ok((filter_observations(&dataset, &filter), filter))
}

/// Builds an [`ObservationFilter`] from query parameters. Unknown names and
/// out-of-range months are skipped.
fn parse_filter(params: &FilterParams) -> ObservationFilter {
    let months = parse_list("month", params.months.as_deref())
        .into_iter()
        .filter(|m: &u32| {
            let valid = (1..=12).contains(m);
            if !valid {
                log::debug!("Skipping out-of-range month {m}");
            }
            valid
        })
        .collect();

    ObservationFilter {
        months,
        towns: parse_list("town", params.towns.as_deref()),
        crops: parse_list("crop", params.crops.as_deref()),
        diseases: parse_list("disease", params.diseases.as_deref()),
        bbox: params.bbox.as_deref().and_then(parse_bbox),
    }
}

fn parse_list<T: std::str::FromStr>(what: &str, s: Option<&str>) -> Vec<T> {
    s.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .filter_map(|c| {
                let parsed: Option<T> = c.parse().ok();
                if parsed.is_none() {
                    log::debug!("Skipping unknown {what} '{c}'");
                }
                parsed
            })
            .collect()
    })
    .unwrap_or_default()
}

/// Parses a bounding box string `"west,south,east,north"` into a
/// [`BoundingBox`].
fn parse_bbox(s: &str) -> Option<BoundingBox> {
    let parts: Vec<f64> = s.split(',').filter_map(|p| p.trim().parse().ok()).collect();
    if parts.len() == 4 {
        Some(BoundingBox::new(parts[0], parts[1], parts[2], parts[3]))
    } else {
        log::debug!("Ignoring malformed bbox '{s}'");
        None
    }
}
