//! Root filesystem chooser.

use bci_config::Board;
use tracing::debug;

use crate::{prelude::*, root::Root};

/// Finds the root filesystem image of a board on the rootfs repository.
pub struct RootfsChooser {
    root: Root,
}

impl RootfsChooser {
    pub fn new(root: Root) -> Self {
        Self { root }
    }

    pub fn from_url(url: &str) -> Result<Self> {
        Ok(Self::new(Root::parse(url)?))
    }

    /// Reference to the board rootfs, after checking that it exists.
    pub async fn choose(&self, board: &Board) -> Result<String> {
        let rootfs = self.root.reference(&board.rootfs);
        debug!("Checking rootfs {rootfs}");
        self.root
            .probe(&board.rootfs, "Rootfs")
            .await
            .map_err(|_| Error::RootfsUnavailable(rootfs.clone()))?;
        Ok(rootfs)
    }
}
