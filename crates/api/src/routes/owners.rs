//! Owner pages: create, find, show and edit.

use std::sync::Arc;

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use common::EntityId;
use domain::{
    FlashContext, Model, ModelAndView, ModelValue, OwnerSearch, Target, ValidationOutcome,
    validate_owner,
};
use store::Owner;

use crate::error::ApiError;
use crate::state::{AppState, ClinicStore};

/// Submitted form or query fields, in submission order.
type Fields = Vec<(String, String)>;

fn field_pairs(fields: &Fields) -> impl Iterator<Item = (&str, &str)> {
    fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}

fn flash_headers(flash: &FlashContext) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    for (key, message) in flash.iter() {
        let name = HeaderName::try_from(format!("x-flash-{key}"))
            .map_err(|e| ApiError::Internal(format!("invalid flash key {key}: {e}")))?;
        let value = HeaderValue::from_str(message)
            .map_err(|e| ApiError::Internal(format!("invalid flash message: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Turns a handler outcome into a redirect or a rendered page.
///
/// Field errors and flash messages are exposed to the view as `errors`,
/// `message` and `error` attributes.
fn respond<S: ClinicStore>(
    state: &AppState<S>,
    mav: ModelAndView,
    outcome: &ValidationOutcome,
    flash: &FlashContext,
) -> Result<Response, ApiError> {
    let mut headers = flash_headers(flash)?;

    match mav.target {
        Target::Redirect(path) => {
            let location = HeaderValue::from_str(&path)
                .map_err(|e| ApiError::Internal(format!("invalid redirect {path}: {e}")))?;
            headers.insert(LOCATION, location);
            Ok((StatusCode::SEE_OTHER, headers).into_response())
        }
        Target::View(view_name) => {
            let mut model = mav.model;
            if outcome.has_errors() {
                model.add_attribute("errors", ModelValue::Errors(outcome.errors().to_vec()));
            }
            for (key, message) in flash.iter() {
                model.add_attribute(key, message);
            }
            let html = state.renderer.render(view_name, &model)?;
            Ok((StatusCode::OK, headers, Html(html)).into_response())
        }
    }
}

fn owner_form(target: Target, owner: Owner) -> ModelAndView {
    ModelAndView::with_model(target, Model::new().with("owner", owner))
}

/// GET /owners/new
#[tracing::instrument(skip(state))]
pub async fn init_creation_form<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Response, ApiError> {
    let mav = state.owners.init_creation_form();
    respond(&state, mav, &ValidationOutcome::new(), &FlashContext::new())
}

/// POST /owners/new
#[tracing::instrument(skip(state, fields))]
pub async fn process_creation_form<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Form(fields): Form<Fields>,
) -> Result<Response, ApiError> {
    let mut owner = state.owners.find_owner(None).await?;
    let mut outcome = ValidationOutcome::new();
    state
        .owner_binder()
        .bind(&mut owner, field_pairs(&fields), &mut outcome);
    validate_owner(&owner, &mut outcome);

    let result = state
        .owners
        .process_creation_form(owner.clone(), &outcome)
        .await?;
    respond(
        &state,
        owner_form(result.target, owner),
        &outcome,
        &result.flash,
    )
}

/// GET /owners/find
#[tracing::instrument(skip(state))]
pub async fn init_find_form<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Response, ApiError> {
    let target = state.owners.init_find_form();
    respond(
        &state,
        owner_form(target, Owner::new()),
        &ValidationOutcome::new(),
        &FlashContext::new(),
    )
}

/// GET /owners?page=N&lastName=...
///
/// `page` defaults to 1. Page 0 and non-numeric pages are a 400.
#[tracing::instrument(skip(state, query))]
pub async fn process_find_form<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<Fields>,
) -> Result<Response, ApiError> {
    let page = match query.iter().find(|(key, _)| key == "page") {
        Some((_, raw)) => raw
            .trim()
            .parse::<u32>()
            .map_err(|e| ApiError::BadRequest(format!("Invalid page number {raw:?}: {e}")))?,
        None => 1,
    };

    let mut search = OwnerSearch::default();
    let mut outcome = ValidationOutcome::new();
    state.owner_binder().bind(
        &mut search,
        field_pairs(&query).filter(|(key, _)| *key != "page"),
        &mut outcome,
    );

    let mut mav = state
        .owners
        .process_find_form(page, &search, &mut outcome)
        .await?;
    if !mav.model.contains_key("owner") {
        let criteria = Owner {
            last_name: search.last_name.unwrap_or_default(),
            ..Owner::new()
        };
        mav.model.add_attribute("owner", criteria);
    }
    respond(&state, mav, &outcome, &FlashContext::new())
}

/// GET /owners/{owner_id}
#[tracing::instrument(skip(state))]
pub async fn show_owner<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(owner_id): Path<EntityId>,
) -> Result<Response, ApiError> {
    let mav = state.owners.show_owner(owner_id).await?;
    respond(&state, mav, &ValidationOutcome::new(), &FlashContext::new())
}

/// GET /owners/{owner_id}/edit
#[tracing::instrument(skip(state))]
pub async fn init_update_owner_form<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(owner_id): Path<EntityId>,
) -> Result<Response, ApiError> {
    let owner = state.owners.find_owner(Some(owner_id)).await?;
    let target = state.owners.init_update_owner_form();
    respond(
        &state,
        owner_form(target, owner),
        &ValidationOutcome::new(),
        &FlashContext::new(),
    )
}

/// POST /owners/{owner_id}/edit
#[tracing::instrument(skip(state, fields))]
pub async fn process_update_owner_form<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(owner_id): Path<EntityId>,
    Form(fields): Form<Fields>,
) -> Result<Response, ApiError> {
    let mut owner = state.owners.find_owner(Some(owner_id)).await?;
    let mut outcome = ValidationOutcome::new();
    state
        .owner_binder()
        .bind(&mut owner, field_pairs(&fields), &mut outcome);
    validate_owner(&owner, &mut outcome);

    let result = state
        .owners
        .process_update_owner_form(owner.clone(), &mut outcome, owner_id)
        .await?;
    respond(
        &state,
        owner_form(result.target, owner),
        &outcome,
        &result.flash,
    )
}
