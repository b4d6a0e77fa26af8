//! UI components for Marksync
//!
//! This module contains the editor surfaces, the preview views and the
//! toolbar.

mod dialogs;
mod highlight;
mod preview_view;
mod ribbon;
mod rich_view;
mod source_view;

pub use dialogs::{UrlPrompt, UrlPromptResult};
pub use preview_view::{HtmlCopy, show_html_source, show_loading, show_rendered, LOADING_EDITOR};
pub use ribbon::{Ribbon, RibbonAction, RibbonState};
pub use rich_view::RichView;
pub use source_view::SourceView;
