pub mod c2b_handlers;
pub mod mpesa_handlers;
