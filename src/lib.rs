//! Research-paper catalog: loads a static `papers.json`, groups papers by
//! publication year, searches titles and authors, and renders the result as
//! Markdown, JSON, or a static HTML page.

pub mod cli;
pub mod config;
pub mod entities;
pub mod error;
pub mod render;
pub mod sources;
pub mod transform;
pub mod view;
