// src/core/mod.rs

pub mod html;
pub mod net;

pub use html::{DomTree, HtmlDocument};
pub use net::{HttpFetcher, PageFetcher};
