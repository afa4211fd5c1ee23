pub mod api;
pub mod config;
pub mod db;
pub mod docs;
pub mod geofence;
pub mod ledger;
pub mod model;
pub mod query;
pub mod routes;
pub mod store;
