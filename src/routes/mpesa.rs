use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{c2b_handlers, mpesa_handlers};
use crate::state::AppState;

pub fn mpesa_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(mpesa_handlers::root_handler))

        // STK push
        .route("/stkpush", get(mpesa_handlers::initiate_stk_push))
        .route("/callback", post(mpesa_handlers::mpesa_callback))

        // C2B
        .route("/registerurl", get(c2b_handlers::register_url))
        .route("/confirmation", post(c2b_handlers::confirmation_callback))
        .route("/validation", post(c2b_handlers::validation_callback))
}
