pub mod climbs;
pub mod health;
