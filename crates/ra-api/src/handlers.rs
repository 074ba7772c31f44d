//! # ra-api Handlers
//!
//! This module coordinates the flow between HTTP requests and `AdService`.
//! Handlers only translate wire formats; every rule lives in ra-core.

use actix_web::{web, HttpResponse};
use ra_core::error::AppError;
use ra_core::models::AdDraft;
use ra_core::query::{FieldSelection, ListQuery};
use ra_core::service::AdService;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub ads: AdService,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedAd {
    pub ad_id: Uuid,
}

/// Query-string pairs in arrival order. Keys arrive lowercased by the query
/// middleware, so `perPage` and `perpage` collapse into one key; a repeated
/// key keeps its first value.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Length of the hyphenated textual form, the only id form ever issued.
const HYPHENATED_ID_LEN: usize = 36;

/// `POST /ad`
pub async fn create_ad(
    data: web::Data<AppState>,
    body: web::Json<AdDraft>,
) -> Result<HttpResponse, ApiError> {
    let ad_id = data.ads.create_ad(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(CreatedAd { ad_id }))
}

/// `GET /ads/{ad_id}?fields=description,photolinks`
pub async fn get_ad(
    data: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<QueryPairs>,
) -> Result<HttpResponse, ApiError> {
    let raw_id = path.into_inner();
    let not_found = || ApiError(AppError::NotFound("ad".into(), raw_id.clone()));

    // Only hyphenated UUIDs are ever issued; simple, braced and urn forms
    // can never match
    if raw_id.len() != HYPHENATED_ID_LEN {
        return Err(not_found());
    }
    let id = Uuid::try_parse(&raw_id).map_err(|_| not_found())?;
    let fields = FieldSelection::parse(params.first("fields"));

    match data.ads.get_ad(id, fields).await? {
        Some(detail) => Ok(HttpResponse::Ok().json(detail)),
        None => Err(not_found()),
    }
}

/// `GET /ads?sortby=&sortdirection=&page=&perpage=`
pub async fn list_ads(
    data: web::Data<AppState>,
    params: web::Query<QueryPairs>,
) -> Result<HttpResponse, ApiError> {
    let query = ListQuery::from_params(
        params.first("sortby"),
        params.first("sortdirection"),
        params.first("page"),
        params.first("perpage"),
    );
    let ads = data.ads.list_ads(&query).await?;
    Ok(HttpResponse::Ok().json(ads))
}

/// Malformed JSON bodies (wrong types, out-of-range price, missing fields)
/// are reported in the same shape as validation failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ApiError(AppError::ValidationError(err.to_string())).into()
    })
}

/// Query strings that cannot be decoded at all are reported as JSON, like
/// every other error.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ApiError(AppError::ValidationError(err.to_string())).into()
    })
}
