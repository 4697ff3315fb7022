//! # Page Rendering
//!
//! Rendering is performed by an external collaborator behind the
//! `PageRenderer` trait. `StubRenderer` is a deterministic stand-in that
//! treats form feeds (`\x0c`) as page breaks.

use serde::{Deserialize, Serialize};

use super::errors::RenderError;

/// Output dimensions of a rendered page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSpec {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderSpec {
    fn default() -> Self {
        Self {
            width: 800,
            height: 1132,
        }
    }
}

/// Converts version content into page images
pub trait PageRenderer: Send + Sync + std::fmt::Debug {
    /// Number of pages in `content`
    fn page_count(&self, content: &[u8]) -> Result<u32, RenderError>;

    /// Render 1-based `page` of `content`
    fn render_page(&self, content: &[u8], page: u32, spec: &RenderSpec) -> Result<Vec<u8>, RenderError>;
}

const PAGE_BREAK: u8 = 0x0c;

/// Deterministic renderer for tests and headless deployments
#[derive(Debug, Default, Clone)]
pub struct StubRenderer;

impl StubRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl PageRenderer for StubRenderer {
    fn page_count(&self, content: &[u8]) -> Result<u32, RenderError> {
        let breaks = content.iter().filter(|b| **b == PAGE_BREAK).count();
        u32::try_from(breaks + 1).map_err(|_| RenderError("too many pages".into()))
    }

    fn render_page(&self, content: &[u8], page: u32, spec: &RenderSpec) -> Result<Vec<u8>, RenderError> {
        let text = content
            .split(|b| *b == PAGE_BREAK)
            .nth(page.saturating_sub(1) as usize)
            .filter(|_| page >= 1)
            .ok_or_else(|| RenderError(format!("page {} out of range", page)))?;

        let mut image = format!("STUB {}x{} page {}\n", spec.width, spec.height, page).into_bytes();
        image.extend_from_slice(text);
        Ok(image)
    }
}
