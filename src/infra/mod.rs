pub mod http_client;
pub mod pdf_decoder;
