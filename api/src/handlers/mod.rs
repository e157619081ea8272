pub mod error;

pub use error::{
    json_error_handler, otp_error_response, query_error_handler, status_for,
    validation_error_response,
};
