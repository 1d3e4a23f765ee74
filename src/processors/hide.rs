use crate::search::SearchResult;

use super::{ProcessResult, Processor};

/// Suppresses display of the matched line.
///
/// The line still flows through the rest of the pipeline (later filters
/// and processors run normally) but is not forwarded unless another
/// processor forces it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HideProcessor;

impl Processor for HideProcessor {
    fn process(&mut self, _text: &str, _original: &str, _search: &SearchResult) -> ProcessResult {
        ProcessResult::Suppress
    }
}
