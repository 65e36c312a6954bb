pub mod allotments;
pub mod auth;
pub mod claims;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod users;
