pub mod complete;
pub mod info;
pub mod view;
