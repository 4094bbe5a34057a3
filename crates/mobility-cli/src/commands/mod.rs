pub mod discover;
pub mod download;
pub mod extract;
pub mod run;
pub mod stream;
