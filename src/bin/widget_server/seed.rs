use std::path::Path as FsPath;

use status_widget::store::SeedFile;

use super::*;

/// Store contents at startup: the seed file if given, else the demo widget.
pub(super) fn load_store(seed: Option<&FsPath>) -> Result<ItemStore> {
    let Some(path) = seed else {
        return Ok(ItemStore::demo());
    };
    let bytes = std::fs::read(path).with_context(|| format!("read seed {}", path.display()))?;
    let seed: SeedFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse seed {}", path.display()))?;
    let store = ItemStore::from_seed(seed)
        .with_context(|| format!("validate seed {}", path.display()))?;
    Ok(store)
}
