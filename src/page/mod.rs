//! Page-level behaviour: deciding what a page is, adding the navigation
//! link to profiles, and building the tool's own view.

mod mode;
mod nav;
mod view;

pub use mode::{PROFILE_MARKER, PageMode, TOOL_SUFFIX, detect, username_from_path};
pub use nav::{NAV_ITEM_ID, NAV_LABEL, inject_nav_item, nav_item_html};
pub use view::{ToolView, ViewContent, escape_html};
