// Named shared memory region backed by a memory-mapped file
use super::platform::session_path;
use crate::error::{MazeError, MazeResult};
use memmap2::{MmapMut, MmapOptions};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Memory-mapped session file shared between processes
#[derive(Debug)]
pub struct ShmRegion {
    mmap: MmapMut,
    size: usize,
    path: PathBuf,
    _file: File,
}

impl ShmRegion {
    /// Create a fresh, zero-filled region, replacing any stale file of the same name
    pub fn create(dir: &Path, name: &str, size: usize) -> MazeResult<Self> {
        if size == 0 {
            return Err("Cannot create an empty shared memory region".into());
        }

        std::fs::create_dir_all(dir)?;
        let path = session_path(dir, name);

        if path.exists() {
            log::warn!(
                "Removing stale shared memory region '{}' at {}",
                name,
                path.display()
            );
            std::fs::remove_file(&path)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        file.set_len(size as u64)?;

        let mut mmap = unsafe { MmapOptions::new().len(size).map_mut(&file)? };
        mmap.fill(0);

        log::debug!(
            "Created shared memory region '{}' ({} bytes) at {}",
            name,
            size,
            path.display()
        );

        Ok(Self {
            mmap,
            size,
            path,
            _file: file,
        })
    }

    /// Open an existing region (no creation)
    pub fn open(dir: &Path, name: &str) -> MazeResult<Self> {
        let path = session_path(dir, name);

        if !path.exists() {
            return Err(MazeError::SessionNotFound {
                name: name.to_string(),
                path,
            });
        }

        let file = OpenOptions::new().read(true).write(true).open(&path)?;
        let size = file.metadata()?.len() as usize;
        if size == 0 {
            return Err(MazeError::SessionInvalid {
                name: name.to_string(),
                reason: "region is empty".to_string(),
            });
        }

        let mmap = unsafe { MmapOptions::new().len(size).map_mut(&file)? };

        Ok(Self {
            mmap,
            size,
            path,
            _file: file,
        })
    }

    /// Remove the backing file. Existing mappings stay valid until dropped.
    pub fn unlink(&self) -> MazeResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.mmap.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.mmap.as_mut_ptr()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
