/// An opaque region of device memory.
pub trait Buffer {
    fn size(&self) -> usize;
}
