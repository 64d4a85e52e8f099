//! HTTP gateway between a merchant application and the M-Pesa Daraja API:
//! STK push initiation, C2B URL registration and the callbacks Daraja sends
//! back.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
