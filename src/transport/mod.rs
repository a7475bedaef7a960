//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod create_message;

pub use create_message::{
    decode_api_error_json, decode_message_json_response, encode_create_message_form,
};
