#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use std::hint::black_box;

pub const BLOCK_SIZE: usize = 1024 * 1024;
pub const PAGE_STRIDE: usize = 4096;

// Non-zero so the write can't be folded into the zeroed allocation.
const TOUCH_BYTE: u8 = 0xA5;

/// One mebibyte whose pages have all been written at least once.
pub struct MemoryBlock {
    buf: Box<[u8]>,
}

impl MemoryBlock {
    pub fn touched() -> Self {
        let mut buf = vec![0u8; BLOCK_SIZE].into_boxed_slice();
        for i in (0..buf.len()).step_by(PAGE_STRIDE) {
            buf[i] = TOUCH_BYTE;
        }
        Self {
            buf: black_box(buf),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

/// Memory held for the lifetime of one burn. Dropping it releases every block.
///
/// An allocation the host cannot satisfy aborts the process; there is no
/// recoverable error path here.
#[derive(Default)]
pub struct MemoryPressure {
    blocks: Vec<MemoryBlock>,
}

impl MemoryPressure {
    pub fn allocate(mem_mb: usize) -> Self {
        let mut blocks = Vec::new();
        for _ in 0..mem_mb {
            blocks.push(MemoryBlock::touched());
        }
        Self { blocks }
    }

    pub fn blocks(&self) -> &[MemoryBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.blocks.iter().map(|b| b.as_bytes().len()).sum()
    }
}
