//! Aligned `f32` storage shared between the harness and FFT backends.
//!
//! SIMD backends load and store whole vectors, so every buffer handed across
//! the [`FftBackend`](crate::backend::FftBackend) boundary starts on an
//! [`ALIGNMENT`]-byte boundary. The storage is a vector of over-aligned blocks
//! viewed as a flat `f32` slice.

use core::fmt;
use core::ops::{Deref, DerefMut};

/// Byte alignment of every [`AlignedBuffer`]. Covers AVX-512 loads.
pub const ALIGNMENT: usize = 64;

/// Number of `f32` lanes per aligned block.
const LANES: usize = ALIGNMENT / core::mem::size_of::<f32>();

#[derive(Clone, Copy)]
#[repr(C, align(64))]
struct Block([f32; LANES]);

const ZERO_BLOCK: Block = Block([0.0; LANES]);

/// Heap buffer of `f32` whose first element is [`ALIGNMENT`]-byte aligned.
#[derive(Clone)]
pub struct AlignedBuffer {
    blocks: Vec<Block>,
    len: usize,
}

impl AlignedBuffer {
    /// Allocate `len` zeroed floats.
    pub fn zeroed(len: usize) -> Self {
        let blocks = vec![ZERO_BLOCK; len.div_ceil(LANES)];
        Self { blocks, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[f32] {
        // SAFETY: `Block` is `repr(C)` around `[f32; LANES]` and its size is
        // exactly `LANES * 4` bytes, so the block vector is a contiguous run of
        // `blocks.len() * LANES >= len` initialized floats.
        unsafe { core::slice::from_raw_parts(self.blocks.as_ptr() as *const f32, self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        // SAFETY: see `as_slice`; the exclusive borrow of `self` makes the
        // returned slice the only live view.
        unsafe {
            core::slice::from_raw_parts_mut(self.blocks.as_mut_ptr() as *mut f32, self.len)
        }
    }

    /// Whether the first element satisfies [`ALIGNMENT`].
    ///
    /// Empty buffers are considered aligned because no memory access occurs.
    pub fn is_aligned(&self) -> bool {
        self.len == 0 || (self.blocks.as_ptr() as usize) % ALIGNMENT == 0
    }
}

impl Deref for AlignedBuffer {
    type Target = [f32];
    fn deref(&self) -> &[f32] {
        self.as_slice()
    }
}

impl DerefMut for AlignedBuffer {
    fn deref_mut(&mut self) -> &mut [f32] {
        self.as_mut_slice()
    }
}

impl fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .finish()
    }
}
