use axum::{Json, Router, routing::get};

use crate::domain::value_objects::plans::{PlanDto, plan_catalogue};

pub fn routes() -> Router {
    Router::new().route("/", get(list_plans))
}

pub async fn list_plans() -> Json<Vec<PlanDto>> {
    Json(plan_catalogue())
}
