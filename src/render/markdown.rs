use crate::entities::paper::Paper;
use crate::error::PaperShelfError;
use crate::render::{PageContext, environment};
use crate::view::ViewState;

/// Terminal rendering of the catalog for one view state.
///
/// Browse mode lists every year and the cards of the expanded year only;
/// search mode lists the matching cards or a "no results" line.
pub fn catalog_markdown(
    papers: &[Paper],
    state: &ViewState,
    title: &str,
) -> Result<String, PaperShelfError> {
    let ctx = PageContext::build(papers, state, title, false);
    let env = environment()?;
    Ok(env.get_template("catalog.md")?.render(&ctx)?)
}
