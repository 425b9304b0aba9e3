//! Transformation hooks applied to payloads before they are returned.

use crate::domain::{FormattedMenuItem, Menu, MenuSummary, SiteId};

/// Extension points for adjusting payloads.
///
/// Registered once at startup. Every method defaults to returning its
/// input unchanged.
///
/// `format_menu_item` runs while a payload is computed, so its output is
/// cached. `format_menus` and `format_menu` run on every response,
/// after the cache.
pub trait MenuHooks: Send + Sync {
    fn format_menus(&self, _site: SiteId, menus: Vec<MenuSummary>) -> Vec<MenuSummary> {
        menus
    }

    fn format_menu(&self, _site: SiteId, menu: Menu) -> Menu {
        menu
    }

    fn format_menu_item(&self, _site: SiteId, item: FormattedMenuItem) -> FormattedMenuItem {
        item
    }
}

/// Hooks that change nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl MenuHooks for NoopHooks {}
