pub mod gateway_factory;
pub mod http_client;
pub mod image_library;
pub mod legacy_gateway;
pub mod multipart_gateway;
