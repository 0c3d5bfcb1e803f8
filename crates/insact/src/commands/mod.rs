pub mod chat;
pub mod domains;
pub mod explore;
pub mod list;
pub mod search;
pub mod show;
