use super::snapshot::RegistrySnapshot;
use crate::config::MazeConfig;
use crate::error::{MazeError, MazeResult};
use crate::maze::{MazeGeometry, Position};
use crate::memory::{
    SessionHeader, SessionLayout, ShmMutex, ShmRegion, SlotEntry, LAYOUT_VERSION, SESSION_MAGIC,
};
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;

/// A maze session mapped into this process.
///
/// The coordinator creates it with [`SharedSession::create`]; runners join with
/// [`SharedSession::attach`]. Every mutation of shared state goes through the
/// session lock, except the one-time initialization done before the validity
/// tag is stored.
#[derive(Debug)]
pub struct SharedSession {
    region: ShmRegion,
    layout: SessionLayout,
    name: String,
    lock_timeout: Option<Duration>,
}

impl SharedSession {
    /// Publish a maze and one registry slot per start position.
    ///
    /// The validity tag is written last, so an attaching runner either sees a
    /// fully populated session or none at all.
    pub fn create(
        config: &MazeConfig,
        maze: &MazeGeometry,
        starts: &[Position],
    ) -> MazeResult<Self> {
        config.validate()?;
        if starts.is_empty() {
            return Err(MazeError::config("a session needs at least one start position"));
        }
        if let Some(bad) = starts.iter().find(|&&pos| maze.is_blocked(pos)) {
            return Err(MazeError::InvalidStart {
                col: bad.col,
                row: bad.row,
            });
        }

        let layout = SessionLayout::compute(maze.cols(), maze.rows(), starts.len())?;
        let mut region =
            ShmRegion::create(&config.shm_dir(), &config.session_name, layout.total_size)?;

        unsafe {
            let base = region.as_mut_ptr();
            let header = base as *mut SessionHeader;
            (*header).version = LAYOUT_VERSION;
            (*header).cols = layout.cols as u32;
            (*header).rows = layout.rows as u32;
            (*header).capacity = layout.capacity as u32;
            (*header).coordinator_pid = std::process::id();

            let cells =
                std::slice::from_raw_parts_mut(base.add(layout.cells_offset), layout.cell_count());
            maze.write_bytes(cells);

            let slots = base.add(layout.slots_offset) as *const SlotEntry;
            for (idx, start) in starts.iter().enumerate() {
                (*slots.add(idx)).store(*start);
            }
        }

        let session = Self {
            region,
            layout,
            name: config.session_name.clone(),
            lock_timeout: config.lock_timeout(),
        };
        session.header().magic.store(SESSION_MAGIC, Ordering::Release);

        log::info!(
            "Published session '{}': {}x{} maze, {} runner slot(s), {} bytes",
            session.name,
            layout.cols,
            layout.rows,
            layout.capacity,
            layout.total_size
        );
        Ok(session)
    }

    /// Attach to a published session
    pub fn attach(config: &MazeConfig) -> MazeResult<Self> {
        let name = config.session_name.clone();
        let region = ShmRegion::open(&config.shm_dir(), &name)?;
        let invalid = |reason: String| MazeError::SessionInvalid {
            name: name.clone(),
            reason,
        };

        if region.size() < std::mem::size_of::<SessionHeader>() {
            return Err(invalid(format!(
                "region holds {} bytes, smaller than the session header",
                region.size()
            )));
        }

        let layout = {
            let header = unsafe { &*(region.as_ptr() as *const SessionHeader) };
            if header.magic.load(Ordering::Acquire) != SESSION_MAGIC {
                return Err(invalid("validity tag is missing".to_string()));
            }
            if header.version != LAYOUT_VERSION {
                return Err(invalid(format!(
                    "layout version {} does not match {}",
                    header.version, LAYOUT_VERSION
                )));
            }
            SessionLayout::from_header(header).map_err(|e| invalid(e.to_string()))?
        };

        if region.size() < layout.total_size {
            return Err(invalid(format!(
                "region holds {} bytes, layout needs {}",
                region.size(),
                layout.total_size
            )));
        }

        log::debug!(
            "Attached to session '{}' at {} ({}x{}, {} slots)",
            name,
            region.path().display(),
            layout.cols,
            layout.rows,
            layout.capacity
        );

        Ok(Self {
            region,
            layout,
            name,
            lock_timeout: config.lock_timeout(),
        })
    }

    fn header(&self) -> &SessionHeader {
        unsafe { &*(self.region.as_ptr() as *const SessionHeader) }
    }

    fn slot_entry(&self, slot: usize) -> MazeResult<&SlotEntry> {
        if slot >= self.layout.capacity {
            return Err(MazeError::SlotOutOfRange {
                slot,
                capacity: self.layout.capacity,
            });
        }
        Ok(unsafe {
            let slots = self.region.as_ptr().add(self.layout.slots_offset) as *const SlotEntry;
            &*slots.add(slot)
        })
    }

    fn mutex(&self) -> ShmMutex<'_> {
        ShmMutex::new(&self.header().lock)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        self.region.path()
    }

    pub fn capacity(&self) -> usize {
        self.layout.capacity
    }

    pub fn coordinator_pid(&self) -> u32 {
        self.header().coordinator_pid
    }

    /// Slots claimed so far (unsynchronized read, may be stale)
    pub fn registered_count(&self) -> usize {
        self.header().registered.load(Ordering::Acquire) as usize
    }

    /// Whether the validity tag is still present
    pub fn is_valid(&self) -> bool {
        self.header().is_valid()
    }

    /// Private copy of the published maze
    pub fn geometry(&self) -> MazeResult<MazeGeometry> {
        let cells = unsafe {
            std::slice::from_raw_parts(
                self.region.as_ptr().add(self.layout.cells_offset),
                self.layout.cell_count(),
            )
        };
        MazeGeometry::from_bytes(self.layout.cols, self.layout.rows, cells)
    }

    /// Claim the next free slot.
    ///
    /// The read-increment of the registered counter happens under the session
    /// lock, which is what makes slot indices unique across processes.
    pub fn register(&self) -> MazeResult<usize> {
        let header = self.header();
        let guard = self.mutex().lock(self.lock_timeout)?;

        if !header.is_valid() {
            return Err(MazeError::SessionInvalid {
                name: self.name.clone(),
                reason: "session was retired".to_string(),
            });
        }

        let slot = header.registered.load(Ordering::Relaxed) as usize;
        if slot >= self.layout.capacity {
            return Err(MazeError::RegistryFull {
                capacity: self.layout.capacity,
            });
        }
        header.registered.store(slot as u32 + 1, Ordering::Relaxed);
        guard.unlock();

        log::debug!("Registered slot {} in session '{}'", slot, self.name);
        Ok(slot)
    }

    /// Position published in `slot`, read without the lock.
    ///
    /// Only meant for a runner reading its own slot.
    pub fn start_position(&self, slot: usize) -> MazeResult<Position> {
        Ok(self.slot_entry(slot)?.load())
    }

    /// Write a runner's position into its slot under the session lock
    pub fn publish(&self, slot: usize, pos: Position) -> MazeResult<()> {
        let entry = self.slot_entry(slot)?;
        let _guard = self.mutex().lock(self.lock_timeout)?;
        entry.store(pos);
        Ok(())
    }

    /// Consistent copy of the whole registry
    pub fn snapshot(&self) -> MazeResult<RegistrySnapshot> {
        let header = self.header();
        let _guard = self.mutex().lock(self.lock_timeout)?;

        let registered = header.registered.load(Ordering::Relaxed) as usize;
        let mut positions = Vec::with_capacity(self.layout.capacity);
        for slot in 0..self.layout.capacity {
            positions.push(self.slot_entry(slot)?.load());
        }
        Ok(RegistrySnapshot::new(registered, positions))
    }

    pub fn is_quit(&self) -> bool {
        self.header().quit.load(Ordering::Acquire) != 0
    }

    /// Raise the global quit flag.
    ///
    /// The flag is stored under the lock; if the lock cannot be taken the flag
    /// is still stored, since runners only ever read it.
    pub fn request_quit(&self) {
        let quit = &self.header().quit;
        match self.mutex().lock(self.lock_timeout) {
            Ok(_guard) => quit.store(1, Ordering::Release),
            Err(e) => {
                log::warn!(
                    "Setting quit on session '{}' without the lock: {}",
                    self.name,
                    e
                );
                quit.store(1, Ordering::Release);
            }
        }
    }

    /// Clear the validity tag so no further runner can attach
    pub(crate) fn invalidate(&self) {
        self.header().magic.store(0, Ordering::Release);
    }

    /// Remove the backing file; mappings held by runners stay readable
    pub(crate) fn unlink(&self) -> MazeResult<()> {
        self.region.unlink()
    }
}
