pub mod db;
pub mod tls;
