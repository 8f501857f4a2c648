use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::entities::paper::Paper;
use crate::error::PaperShelfError;
use crate::render::{PageContext, environment};
use crate::view::ViewState;

#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    pub title: String,
    pub generated_at: Option<String>,
}

/// Current UTC time for the page footer.
pub fn timestamp_now() -> Option<String> {
    OffsetDateTime::now_utc().format(&Rfc3339).ok()
}

/// Renders a self-contained HTML page for one view state.
///
/// In browse mode every year is emitted as a `<details name="years">` element
/// so browsers keep at most one year open; the expanded year starts open.
pub fn page_html(
    papers: &[Paper],
    state: &ViewState,
    options: &PageOptions,
) -> Result<String, PaperShelfError> {
    let mut ctx = PageContext::build(papers, state, &options.title, true);
    ctx.generated_at = options.generated_at.clone();
    let env = environment()?;
    Ok(env.get_template("page.html")?.render(&ctx)?)
}
