//! Linear byte allocator for per-frame uniform data.
//!
//! Every frame the [`ByteAllocator`] is cleared and refilled with fixed-layout
//! records (see [`crate::data_structures::uniform`]). Each record starts at an
//! offset that is a multiple of the device's uniform offset alignment, so any
//! record can be bound on its own as a dynamic-offset uniform range. The whole
//! buffer is then uploaded to the GPU with a single `write_buffer`.

use std::cell::OnceCell;

use wgpu::BufferAddress;

/// Something that knows the minimal offset alignment for uniform bindings.
///
/// Implemented for [`wgpu::Device`] (queried from its limits) and for plain
/// `u32` values so the allocator can be used without a GPU.
pub trait AlignmentSource {
    fn uniform_offset_alignment(&self) -> u32;
}

impl AlignmentSource for wgpu::Device {
    fn uniform_offset_alignment(&self) -> u32 {
        self.limits().min_uniform_buffer_offset_alignment
    }
}

impl AlignmentSource for u32 {
    fn uniform_offset_alignment(&self) -> u32 {
        *self
    }
}

/// Bump allocator over a growable byte buffer.
///
/// Records are appended with [`push`](Self::push) and the buffer is reset
/// wholesale with [`clear`](Self::clear), which keeps the capacity around for
/// the next frame. Offsets handed out are only valid until the next `clear`.
pub struct ByteAllocator {
    bytes: Vec<u8>,
    alignment: OnceCell<BufferAddress>,
    source: Box<dyn AlignmentSource>,
}

impl ByteAllocator {
    pub fn new(source: impl AlignmentSource + 'static) -> Self {
        Self {
            bytes: Vec::new(),
            alignment: OnceCell::new(),
            source: Box::new(source),
        }
    }

    /// The cached alignment. The first call asks the alignment source, every
    /// later call returns the same value.
    pub fn alignment(&self) -> BufferAddress {
        *self.alignment.get_or_init(|| {
            let alignment = BufferAddress::from(self.source.uniform_offset_alignment()).max(1);
            log::info!("Uniform offset alignment: {} bytes", alignment);
            alignment
        })
    }

    /// Appends `record` and returns the offset it was written at.
    ///
    /// Zero bytes are appended afterwards until the buffer length is a multiple
    /// of [`alignment`](Self::alignment), so the next record starts aligned.
    pub fn push<T: bytemuck::Pod>(&mut self, record: &T) -> BufferAddress {
        let alignment = self.alignment();
        let offset = self.bytes.len() as BufferAddress;
        self.bytes.extend_from_slice(bytemuck::bytes_of(record));

        let len = self.bytes.len() as BufferAddress;
        let padding = (alignment - (len % alignment)) % alignment;
        self.bytes.resize((len + padding) as usize, 0);
        offset
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    pub fn data(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> BufferAddress {
        self.bytes.len() as BufferAddress
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes reserved by the backing storage. Survives [`clear`](Self::clear).
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }
}

impl std::fmt::Debug for ByteAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteAllocator")
            .field("size", &self.bytes.len())
            .field("capacity", &self.bytes.capacity())
            .field("alignment", &self.alignment.get())
            .finish()
    }
}
