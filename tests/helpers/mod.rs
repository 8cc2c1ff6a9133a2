pub mod builders;
pub mod db;
pub mod http;
