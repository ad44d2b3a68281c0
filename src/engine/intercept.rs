//! Process-wide default replacer.
//!
//! Installing a replacer here makes [`crate::stringify`] use it whenever the
//! call does not pass its own callback. The slot is shared by the whole
//! process:
//!
//! - the last install wins; earlier replacers are dropped, not chained;
//! - there is no uninstall;
//! - two threads installing at the same time race, and whichever write lands
//!   second is the one that stays.

use crate::Replacer;
use parking_lot::RwLock;

static INSTALLED: RwLock<Option<Replacer>> = RwLock::new(None);

pub(crate) fn install(replacer: Replacer) {
    let previous = INSTALLED.write().replace(replacer);
    match previous {
        Some(previous) => {
            tracing::warn!(previous = ?previous, "replacing globally installed replacer");
        }
        None => tracing::debug!("installed global replacer"),
    }
}

pub(crate) fn installed() -> Option<Replacer> {
    INSTALLED.read().clone()
}

/// Whether a replacer has been installed as the process-wide default.
pub fn is_intercepting() -> bool {
    INSTALLED.read().is_some()
}
