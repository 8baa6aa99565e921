pub mod composer;
pub mod discovery;
pub mod geo;
pub mod identity;
pub mod ingestion;
pub mod normalizer;
pub mod providers;
pub mod recommendations;
pub mod wishlist;
