//! Test utilities and mock backends for Tessella development.
//!
//! Provides a recording [`MockBackend`] implementation of
//! [`SurfaceBackend`] plus placement checks in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::Arc;

use tessella_core::{LayerCopy, SurfaceBackend, SurfaceDesc, SurfaceError};

pub use fixtures::{assert_no_overlap, init_tracing, Placement};

/// Surface handle produced by [`MockBackend`].
///
/// Identified by a backend-assigned id; carries the descriptor it was
/// created from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockSurface {
    id: u64,
    desc: Arc<SurfaceDesc>,
}

impl MockSurface {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn desc(&self) -> &SurfaceDesc {
        &self.desc
    }
}

/// One `copy_layer` call as seen by [`MockBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordedCopy {
    pub src: u64,
    pub dst: u64,
    pub copy: LayerCopy,
}

/// Recording implementation of [`SurfaceBackend`].
///
/// Every created surface and every copy is kept for later inspection.
/// Arm [`fail_next_create`](Self::fail_next_create) to make the next
/// creation fail.
#[derive(Debug, Default)]
pub struct MockBackend {
    next_id: u64,
    created: Vec<MockSurface>,
    copies: Vec<RecordedCopy>,
    fail_next: Option<String>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_surface` call fail with `reason`.
    pub fn fail_next_create(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }

    /// Every surface created so far, oldest first.
    pub fn created(&self) -> &[MockSurface] {
        &self.created
    }

    /// Every copy issued so far, in call order.
    pub fn copies(&self) -> &[RecordedCopy] {
        &self.copies
    }

    /// Copies whose destination is `dst`.
    pub fn copies_into(&self, dst: &MockSurface) -> Vec<LayerCopy> {
        self.copies
            .iter()
            .filter(|c| c.dst == dst.id)
            .map(|c| c.copy)
            .collect()
    }
}

impl SurfaceBackend for MockBackend {
    type Surface = MockSurface;

    fn create_surface(&mut self, desc: &SurfaceDesc) -> Result<MockSurface, SurfaceError> {
        if let Some(reason) = self.fail_next.take() {
            return Err(SurfaceError::CreationFailed { reason });
        }
        let surface = MockSurface {
            id: self.next_id,
            desc: Arc::new(desc.clone()),
        };
        self.next_id += 1;
        self.created.push(surface.clone());
        Ok(surface)
    }

    fn copy_layer(&mut self, src: &MockSurface, dst: &MockSurface, copy: LayerCopy) {
        assert!(
            copy.src_layer < src.desc.array_size && copy.dst_layer < dst.desc.array_size,
            "copy {copy:?} out of range ({} -> {} layers)",
            src.desc.array_size,
            dst.desc.array_size
        );
        assert!(
            copy.src_mip < src.desc.mip_count() && copy.dst_mip < dst.desc.mip_count(),
            "copy {copy:?} names a missing mip level"
        );
        self.copies.push(RecordedCopy {
            src: src.id,
            dst: dst.id,
            copy,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessella_core::TexelFormat;

    fn desc(layers: u32) -> SurfaceDesc {
        SurfaceDesc::new("mock", TexelFormat::R8Unorm, 8, 8).with_array_size(layers)
    }

    #[test]
    fn ids_are_sequential() {
        let mut backend = MockBackend::new();
        let a = backend.create_surface(&desc(1)).unwrap();
        let b = backend.create_surface(&desc(2)).unwrap();
        assert_eq!((a.id(), b.id()), (0, 1));
        assert_eq!(b.desc().array_size, 2);
        assert_eq!(backend.created().len(), 2);
    }

    #[test]
    fn armed_failure_fires_once() {
        let mut backend = MockBackend::new();
        backend.fail_next_create("boom");
        assert!(backend.create_surface(&desc(1)).is_err());
        assert!(backend.create_surface(&desc(1)).is_ok());
        assert_eq!(backend.created().len(), 1);
    }

    #[test]
    fn copies_are_recorded() {
        let mut backend = MockBackend::new();
        let a = backend.create_surface(&desc(1)).unwrap();
        let b = backend.create_surface(&desc(2)).unwrap();
        backend.copy_layer(&a, &b, LayerCopy::same_location(0, 0));
        assert_eq!(backend.copies_into(&b), vec![LayerCopy::same_location(0, 0)]);
        assert!(backend.copies_into(&a).is_empty());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_copy_panics() {
        let mut backend = MockBackend::new();
        let a = backend.create_surface(&desc(1)).unwrap();
        let b = backend.create_surface(&desc(1)).unwrap();
        backend.copy_layer(&a, &b, LayerCopy::same_location(1, 0));
    }
}
