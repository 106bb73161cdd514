use prism_core::device::{Buffer, BufferDescriptor, BufferUsage};
use prism_core::{Device, PrismError, PrismResult};

/// Byte range of one element inside a [`SharedUniformBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformBufferSlot {
    pub offset: u64,
    pub size: u64,
}

/// `element_size` rounded up to a multiple of `alignment`.
pub fn aligned_stride(element_size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    element_size.div_ceil(alignment) * alignment
}

/// Slot arithmetic of a fixed-capacity uniform arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotLayout {
    pub element_size: u64,
    pub stride: u64,
    pub element_count: u32,
}

impl SlotLayout {
    pub fn new(element_size: u64, alignment: u64, element_count: u32) -> Self {
        Self {
            element_size,
            stride: aligned_stride(element_size, alignment),
            element_count,
        }
    }

    pub fn total_size(&self) -> u64 {
        self.stride * self.element_count as u64
    }

    /// Not bounds-checked in release builds.
    pub fn slot(&self, index: u32) -> UniformBufferSlot {
        debug_assert!(
            index < self.element_count,
            "uniform slot {} out of range ({} slots)",
            index,
            self.element_count
        );
        UniformBufferSlot {
            offset: index as u64 * self.stride,
            size: self.element_size,
        }
    }
}

/// One host-coherent buffer multiplexing many equally sized uniform blocks.
pub struct SharedUniformBuffer<D: Device> {
    buffer: D::Buffer,
    layout: SlotLayout,
}

impl<D: Device> SharedUniformBuffer<D> {
    pub fn new(device: &D, element_size: u64, element_count: u32) -> PrismResult<Self> {
        if element_size == 0 || element_count == 0 {
            return Err(PrismError::InvalidArgument(format!(
                "shared uniform buffer needs non-zero size and count, got {} x {}",
                element_size, element_count
            )));
        }

        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let layout = SlotLayout::new(element_size, alignment, element_count);
        let buffer = device.create_buffer(BufferDescriptor {
            size: layout.total_size(),
            usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
            mapped_at_creation: true,
        })?;

        log::debug!(
            "Shared uniform buffer: {} slots of {} bytes, stride {} (alignment {})",
            element_count,
            element_size,
            layout.stride,
            alignment
        );

        Ok(Self { buffer, layout })
    }

    pub fn layout(&self) -> SlotLayout {
        self.layout
    }

    pub fn stride(&self) -> u64 {
        self.layout.stride
    }

    pub fn capacity(&self) -> u32 {
        self.layout.element_count
    }

    pub fn slot(&self, index: u32) -> UniformBufferSlot {
        self.layout.slot(index)
    }

    pub fn buffer(&self) -> &D::Buffer {
        &self.buffer
    }

    pub fn write(&self, index: u32, data: &[u8]) -> PrismResult<()> {
        let slot = self.slot(index);
        if data.len() as u64 > slot.size {
            return Err(PrismError::InvalidArgument(format!(
                "{} bytes do not fit a {} byte uniform slot",
                data.len(),
                slot.size
            )));
        }
        self.buffer.write_data(slot.offset, data)
    }

    pub fn write_pod<T: bytemuck::Pod>(&self, index: u32, value: &T) -> PrismResult<()> {
        self.write(index, bytemuck::bytes_of(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_example_layout() {
        let layout = SlotLayout::new(80, 256, 4);
        let slots: Vec<_> = (0..4).map(|i| layout.slot(i)).collect();
        assert_eq!(
            slots,
            vec![
                UniformBufferSlot { offset: 0, size: 80 },
                UniformBufferSlot { offset: 256, size: 80 },
                UniformBufferSlot { offset: 512, size: 80 },
                UniformBufferSlot { offset: 768, size: 80 },
            ]
        );
        assert_eq!(layout.total_size(), 1024);
    }

    #[rstest]
    #[case(80, 256, 4)]
    #[case(96, 64, 10)]
    #[case(64, 64, 3)]
    #[case(1, 16, 7)]
    #[case(300, 256, 5)]
    #[case(12, 48, 6)]
    fn test_slots_are_aligned_and_disjoint(
        #[case] element_size: u64,
        #[case] alignment: u64,
        #[case] count: u32,
    ) {
        let layout = SlotLayout::new(element_size, alignment, count);
        assert!(layout.stride >= element_size);
        for i in 0..count {
            let slot = layout.slot(i);
            assert_eq!(slot.offset % alignment, 0);
            assert_eq!(slot.size, element_size);
            assert!(slot.offset + slot.size <= layout.total_size());
            if i + 1 < count {
                assert!(slot.offset + element_size <= layout.slot(i + 1).offset);
            }
        }
    }

    #[test]
    fn test_zero_alignment_is_tightly_packed() {
        assert_eq!(aligned_stride(80, 0), 80);
        assert_eq!(aligned_stride(80, 1), 80);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(257, 256), 512);
    }
}
