//! Byte layout of a session region.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  SessionHeader (64 bytes, cache-line aligned)│
//! │  ├─ magic: AtomicU32 (validity tag)          │
//! │  ├─ version: u32                             │
//! │  ├─ lock: AtomicU32                          │
//! │  ├─ quit: AtomicU32                          │
//! │  ├─ cols / rows / capacity: u32              │
//! │  ├─ registered: AtomicU32                    │
//! │  └─ coordinator_pid: u32                     │
//! ├──────────────────────────────────────────────┤
//! │  Cells: [u8; cols * rows], column-major      │
//! ├──────────────────────────────────────────────┤
//! │  Slots: [SlotEntry; capacity], 4-aligned     │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The coordinator fills every field, then stores `magic` last with release
//! ordering. Attaching processes load `magic` with acquire ordering before
//! touching anything else.

use crate::error::{MazeError, MazeResult};
use crate::maze::Position;
use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};

/// Validity tag for initialized sessions ("MZR1")
pub const SESSION_MAGIC: u32 = 0x4D5A_5231;

/// Bumped whenever the layout below changes
pub const LAYOUT_VERSION: u32 = 1;

/// Session header at offset zero of the region
#[repr(C, align(64))]
pub struct SessionHeader {
    /// Validity tag, `SESSION_MAGIC` once the session is fully published
    pub magic: AtomicU32,
    /// Layout version written by the coordinator
    pub version: u32,
    /// Process-shared lock word, see `ShmMutex`
    pub lock: AtomicU32,
    /// Global quit flag (non-zero = quit)
    pub quit: AtomicU32,
    pub cols: u32,
    pub rows: u32,
    /// Number of registry slots
    pub capacity: u32,
    /// Slots claimed so far
    pub registered: AtomicU32,
    /// Diagnostics only
    pub coordinator_pid: u32,
    _padding: [u8; 28],
}

impl SessionHeader {
    /// True once the coordinator has published a session with this layout
    pub fn is_valid(&self) -> bool {
        self.magic.load(Ordering::Acquire) == SESSION_MAGIC && self.version == LAYOUT_VERSION
    }
}

/// One registry slot: the owning runner's current position
#[repr(C)]
pub struct SlotEntry {
    col: AtomicI32,
    row: AtomicI32,
}

impl SlotEntry {
    pub fn load(&self) -> Position {
        Position::new(
            self.col.load(Ordering::Relaxed),
            self.row.load(Ordering::Relaxed),
        )
    }

    pub fn store(&self, pos: Position) {
        self.col.store(pos.col, Ordering::Relaxed);
        self.row.store(pos.row, Ordering::Relaxed);
    }
}

/// Offsets of every section for a given maze size and runner capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLayout {
    pub cols: usize,
    pub rows: usize,
    pub capacity: usize,
    pub cells_offset: usize,
    pub slots_offset: usize,
    pub total_size: usize,
}

impl SessionLayout {
    /// Compute the layout, rejecting sizes that overflow the header fields
    pub fn compute(cols: usize, rows: usize, capacity: usize) -> MazeResult<Self> {
        if cols == 0 || rows == 0 {
            return Err(MazeError::InvalidMaze(format!(
                "maze must have at least one cell (got {}x{})",
                cols, rows
            )));
        }
        if capacity == 0 {
            return Err(MazeError::config("session needs at least one runner slot"));
        }
        for (label, value) in [("cols", cols), ("rows", rows), ("capacity", capacity)] {
            if value > i32::MAX as usize {
                return Err(MazeError::config(format!("{} {} is too large", label, value)));
            }
        }

        let header_size = std::mem::size_of::<SessionHeader>();
        let cell_count = cols
            .checked_mul(rows)
            .ok_or("Integer overflow calculating cell count")?;

        let cells_offset = header_size;
        let slot_align = std::mem::align_of::<SlotEntry>();
        let slots_offset = (cells_offset + cell_count).div_ceil(slot_align) * slot_align;
        let slots_size = capacity
            .checked_mul(std::mem::size_of::<SlotEntry>())
            .ok_or("Integer overflow calculating slot table size")?;
        let total_size = slots_offset
            .checked_add(slots_size)
            .ok_or("Integer overflow calculating total size")?;

        Ok(Self {
            cols,
            rows,
            capacity,
            cells_offset,
            slots_offset,
            total_size,
        })
    }

    /// Rebuild the layout from a published header
    pub fn from_header(header: &SessionHeader) -> MazeResult<Self> {
        Self::compute(
            header.cols as usize,
            header.rows as usize,
            header.capacity as usize,
        )
    }

    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }
}
