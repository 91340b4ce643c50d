use anyhow::Result;
use std::path::PathBuf;

use crate::server::{self, AppState};

pub fn handle(db_path: PathBuf, listen: &str, page_size: usize) -> Result<()> {
    // Fail before binding when there is nothing to serve.
    super::open_database(&db_path)?;

    let state = AppState::new(db_path, page_size);
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(server::serve(state, listen))
}
