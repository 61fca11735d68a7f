use actix_web::{
    delete, error::JsonPayloadError, get, post, put, web, HttpRequest, HttpResponse,
};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::auth::{check_authorization, login};
use crate::config::AuthSettings;
use crate::error::ApiError;
use crate::exchange::settle;
use crate::ledger::Ledger;
use crate::schemas::{
    Credentials, Envelope, ExpenseId, GroupName, NewExpense, NewParticipant, ParticipantId,
};

/// Groups live in memory only and are lost on restart.
pub struct AppState {
    pub groups: Mutex<HashMap<String, Ledger>>,
    pub auth: AuthSettings,
}

impl AppState {
    pub fn new(auth: AuthSettings) -> Self {
        Self {
            groups: Mutex::new(HashMap::new()),
            auth,
        }
    }

    fn with_group<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Ledger) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut groups = self.groups.lock().map_err(|_| ApiError::Internal)?;
        let ledger = groups
            .get_mut(id)
            .ok_or_else(|| ApiError::GroupNotFound(id.to_string()))?;
        f(ledger)
    }
}

fn json_error(err: JsonPayloadError, request: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %request.path(), "rejected request body: {err}");
    ApiError::BadRequest(err.to_string()).into()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .service(user_login)
        .service(add_group)
        .service(get_group)
        .service(add_participant)
        .service(remove_participant)
        .service(add_expense)
        .service(remove_expense)
        .service(get_balance)
        .service(get_exchanges);
}

#[post("/user/login")]
async fn user_login(
    state: web::Data<AppState>,
    json: web::Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    let credentials = json.into_inner();
    let token = login(&credentials.username, &credentials.password, &state.auth).map_err(|err| {
        tracing::info!(username = %credentials.username, "login refused");
        err
    })?;
    Ok(HttpResponse::Ok().json(Envelope { value: token }))
}

#[put("/groups/{id}")]
async fn add_group(
    state: web::Data<AppState>,
    request: HttpRequest,
    id: web::Path<String>,
    json: web::Json<GroupName>,
) -> Result<HttpResponse, ApiError> {
    let user = check_authorization(&request, &state.auth)?;
    let id = id.into_inner();
    let mut groups = state.groups.lock().map_err(|_| ApiError::Internal)?;
    if groups.contains_key(&id) {
        return Err(ApiError::GroupExists(id));
    }
    let ledger = Ledger::new(json.into_inner().name);
    let snapshot = ledger.snapshot(&id);
    groups.insert(id.clone(), ledger);
    tracing::info!(group = %id, %user, "group created");
    Ok(HttpResponse::Created().json(snapshot))
}

#[get("/groups/{id}")]
async fn get_group(
    state: web::Data<AppState>,
    request: HttpRequest,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    check_authorization(&request, &state.auth)?;
    let id = id.into_inner();
    let snapshot = state.with_group(&id, |ledger| Ok(ledger.snapshot(&id)))?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[post("/groups/{id}/participants")]
async fn add_participant(
    state: web::Data<AppState>,
    request: HttpRequest,
    id: web::Path<String>,
    json: web::Json<NewParticipant>,
) -> Result<HttpResponse, ApiError> {
    check_authorization(&request, &state.auth)?;
    let participant = state.with_group(&id, |ledger| {
        Ok(ledger.add_participant(&json.name)?.clone())
    })?;
    Ok(HttpResponse::Created().json(participant))
}

#[delete("/groups/{id}/participants/{participant_id}")]
async fn remove_participant(
    state: web::Data<AppState>,
    request: HttpRequest,
    path: web::Path<(String, u64)>,
) -> Result<HttpResponse, ApiError> {
    check_authorization(&request, &state.auth)?;
    let (id, participant_id) = path.into_inner();
    let removed = state.with_group(&id, |ledger| {
        Ok(ledger.remove_participant(ParticipantId(participant_id))?)
    })?;
    Ok(HttpResponse::Ok().json(removed))
}

#[post("/groups/{id}/expenses")]
async fn add_expense(
    state: web::Data<AppState>,
    request: HttpRequest,
    id: web::Path<String>,
    expense: web::Json<NewExpense>,
) -> Result<HttpResponse, ApiError> {
    check_authorization(&request, &state.auth)?;
    let expense = state.with_group(&id, |ledger| {
        Ok(ledger.add_expense(expense.into_inner())?.clone())
    })?;
    Ok(HttpResponse::Created().json(expense))
}

#[delete("/groups/{id}/expenses/{expense_id}")]
async fn remove_expense(
    state: web::Data<AppState>,
    request: HttpRequest,
    path: web::Path<(String, u64)>,
) -> Result<HttpResponse, ApiError> {
    check_authorization(&request, &state.auth)?;
    let (id, expense_id) = path.into_inner();
    let removed = state.with_group(&id, |ledger| {
        Ok(ledger.remove_expense(ExpenseId(expense_id))?)
    })?;
    Ok(HttpResponse::Ok().json(removed))
}

#[get("/groups/{id}/balance")]
async fn get_balance(
    state: web::Data<AppState>,
    request: HttpRequest,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    check_authorization(&request, &state.auth)?;
    let report = state.with_group(&id, |ledger| Ok(ledger.report()))?;
    Ok(HttpResponse::Ok().json(report))
}

#[get("/groups/{id}/exchanges")]
async fn get_exchanges(
    state: web::Data<AppState>,
    request: HttpRequest,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    check_authorization(&request, &state.auth)?;
    let exchanges = state.with_group(&id, |ledger| Ok(settle(&ledger.report())))?;
    Ok(HttpResponse::Ok().json(exchanges))
}
