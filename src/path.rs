//! Path resolution and manipulation utilities.

use log::debug;

use crate::directory::dir_lookup;
use crate::{BlockDevice, Error, Result, ROOT_INODE_ID};

/// Splits an absolute path into its non-empty components.
/// Returns `None` for relative paths and for paths without any component, like "/".
pub fn components(path: &str) -> Option<Vec<&str>> {
    let rest = path.strip_prefix('/')?;
    let parts: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    if parts.is_empty() { None } else { Some(parts) }
}

/// Walks every component but the last from the root.
/// Returns the inode id of the directory containing the last component, and that component unresolved.
pub fn resolve<'a>(device: &impl BlockDevice, path: &'a str) -> Result<(u32, &'a str)> {
    let Some(mut parts) = components(path) else {
        debug!("resolve {:?}: not an absolute path with components", path);
        return Err(Error::NotFound);
    };
    let Some(leaf) = parts.pop() else {
        return Err(Error::NotFound);
    };

    let mut current = ROOT_INODE_ID;
    for component in parts {
        current = match dir_lookup(device, current, component) {
            Ok((Some(inode_id), _)) => inode_id,
            Ok((None, _)) | Err(Error::NotDirectory) | Err(Error::NoDataBlock) => {
                debug!("resolve {:?}: {:?} does not exist", path, component);
                return Err(Error::NotFound);
            }
            Err(e) => return Err(e),
        };
    }

    Ok((current, leaf))
}
