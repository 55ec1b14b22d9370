//! `std::fs` backed [`FileSystem`].

use std::fs;
use std::io;
use std::path::Path;

use crate::services::traits::FileSystem;

/// The local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_directory(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn delete_directory(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}
