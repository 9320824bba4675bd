//! Command implementations.

pub mod ask;
pub mod connect;
pub mod domains;
pub mod history;
pub mod import;
pub mod lists;
pub mod profile;
pub mod watch;

pub use self::ask::execute_ask;
pub use self::connect::{open_session, Session};
pub use self::domains::execute_domains;
pub use self::history::{execute_log, execute_versions, execute_worklogs};
pub use self::import::{execute_import, execute_template};
pub use self::lists::{
    execute_add, execute_create, execute_delete, execute_lists, execute_reset, execute_show,
    execute_update,
};
pub use self::profile::execute_profile;
pub use self::watch::execute_watch;

use crate::error::Result;
use std::io::{self, Write};

/// Ask a yes/no question on stdin; anything but "y" is a no.
pub(crate) fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().eq_ignore_ascii_case("y"))
}
