use axum::{
    Router,
    routing::get,
};

pub mod bien_dong;
pub mod common;
pub mod ho_khau;
pub mod nhan_khau;
pub mod system;

/// Route table for every authenticated endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/api/whoami", get(system::whoami))
        .route(
            "/api/bien-dong",
            get(bien_dong::list_change_records).post(bien_dong::create_change_record),
        )
        .route(
            "/api/bien-dong/:id",
            get(bien_dong::get_change_record)
                .put(bien_dong::update_change_record)
                .delete(bien_dong::delete_change_record),
        )
        .route(
            "/api/ho-khau",
            get(ho_khau::list_households).post(ho_khau::create_household),
        )
        .route(
            "/api/ho-khau/:id",
            get(ho_khau::get_household)
                .put(ho_khau::update_household)
                .delete(ho_khau::delete_household),
        )
        .route("/api/ho-khau/:id/fee", get(ho_khau::get_household_fee))
        .route(
            "/api/nhan-khau",
            get(nhan_khau::list_citizens).post(nhan_khau::create_citizen),
        )
        .route(
            "/api/nhan-khau/:id",
            get(nhan_khau::get_citizen)
                .put(nhan_khau::update_citizen)
                .delete(nhan_khau::delete_citizen),
        )
}
