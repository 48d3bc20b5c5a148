use alloc::string::String;
use core::fmt::Write;

use thiserror::Error;

/// Reason a triangle could not contribute to the tangent space.
///
/// Degenerate triangles are skipped and counted; they never abort a
/// calculation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Error)]
pub enum Degeneracy {
    /// The triangle has zero area in texture space.
    #[error("broken texture coordinates")]
    BrokenTextureCoordinates,
    /// Two corners of the triangle refer to the same position and normal.
    #[error("vertices sharing coordinates")]
    VerticesSharingCoordinates,
    /// The triangle has zero area in object space.
    #[error("all vertices on the same vector")]
    AllVerticesOnTheSameVector,
}

impl Degeneracy {
    pub(crate) const ALL: [Degeneracy; 3] = [
        Degeneracy::BrokenTextureCoordinates,
        Degeneracy::VerticesSharingCoordinates,
        Degeneracy::AllVerticesOnTheSameVector,
    ];

    const fn slot(self) -> usize {
        match self {
            Degeneracy::BrokenTextureCoordinates => 0,
            Degeneracy::VerticesSharingCoordinates => 1,
            Degeneracy::AllVerticesOnTheSameVector => 2,
        }
    }
}

/// Overall outcome of a calculation.
///
/// Variants are ordered by severity, so the worst of several codes is their
/// [`max`](Ord::max).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum ErrorCode {
    #[default]
    NoErrors,
    BrokenTextureCoordinates,
    VerticesSharingCoordinates,
    AllVerticesOnTheSameVector,
    MemoryAllocationFailed,
}

impl From<Degeneracy> for ErrorCode {
    fn from(value: Degeneracy) -> Self {
        match value {
            Degeneracy::BrokenTextureCoordinates => ErrorCode::BrokenTextureCoordinates,
            Degeneracy::VerticesSharingCoordinates => ErrorCode::VerticesSharingCoordinates,
            Degeneracy::AllVerticesOnTheSameVector => ErrorCode::AllVerticesOnTheSameVector,
        }
    }
}

impl From<&CalculateTangentSpaceError> for ErrorCode {
    fn from(value: &CalculateTangentSpaceError) -> Self {
        match value {
            CalculateTangentSpaceError::MemoryAllocationFailed => ErrorCode::MemoryAllocationFailed,
        }
    }
}

/// Error returned when a tangent space calculation cannot complete.
#[derive(Clone, PartialEq, Debug, Error)]
#[non_exhaustive]
pub enum CalculateTangentSpaceError {
    /// Storage for the bases or triangle assignments could not be allocated.
    #[error("memory allocation failed while calculating tangent space")]
    MemoryAllocationFailed,
}

impl From<alloc::collections::TryReserveError> for CalculateTangentSpaceError {
    fn from(_: alloc::collections::TryReserveError) -> Self {
        CalculateTangentSpaceError::MemoryAllocationFailed
    }
}

impl From<hashbrown::TryReserveError> for CalculateTangentSpaceError {
    fn from(_: hashbrown::TryReserveError) -> Self {
        CalculateTangentSpaceError::MemoryAllocationFailed
    }
}

/// Error returned when an [`IndexedMesh`](crate::IndexedMesh) is built from
/// inconsistent buffers.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum IndexedMeshError {
    #[error("index buffers differ in length: {position} position, {normal} normal, {uv} uv")]
    MismatchedIndexCounts {
        position: usize,
        normal: usize,
        uv: usize,
    },
    #[error("index buffer length {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
    #[error("triangle {triangle} refers to {stream} index {index}, but the stream has {len} entries")]
    IndexOutOfRange {
        triangle: usize,
        stream: &'static str,
        index: u32,
        len: usize,
    },
}

/// Summary of the soft failures encountered during a calculation.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Diagnostics {
    counts: [usize; 3],
    first_triangle: [Option<usize>; 3],
    fallback_bases: usize,
    triangles: usize,
    code: ErrorCode,
    message: String,
}

impl Diagnostics {
    pub(crate) fn new(triangles: usize) -> Self {
        Self {
            triangles,
            ..Self::default()
        }
    }

    /// Records a skipped triangle.
    /// The returned [`ErrorCode`] is only raised when `escalate` is set.
    pub(crate) fn record(&mut self, triangle: usize, degeneracy: Degeneracy, escalate: bool) {
        let slot = degeneracy.slot();
        self.counts[slot] += 1;
        self.first_triangle[slot].get_or_insert(triangle);

        if escalate {
            self.code = self.code.max(degeneracy.into());
        }

        log::debug!("skipping triangle {triangle}: {degeneracy}");
    }

    pub(crate) fn record_fallback_base(&mut self) {
        self.fallback_bases += 1;
    }

    pub(crate) fn finish(&mut self) {
        self.message = self.build_message();

        if self.code != ErrorCode::NoErrors {
            log::warn!(
                "tangent space calculated with {:?}: {}",
                self.code,
                self.message.trim_end()
            );
        }
    }

    fn build_message(&self) -> String {
        let mut message = String::new();

        for degeneracy in Degeneracy::ALL {
            let slot = degeneracy.slot();
            if let Some(first) = self.first_triangle[slot] {
                // writing into a `String` cannot fail
                let _ = writeln!(
                    message,
                    "{} triangle(s) with {degeneracy} (first: triangle {first})",
                    self.counts[slot],
                );
            }
        }

        if self.triangles > 0 && self.skipped() == self.triangles {
            let _ = writeln!(message, "no triangle produced a usable tangent");
        }

        if self.fallback_bases > 0 {
            let _ = writeln!(
                message,
                "{} base(s) use a fallback tangent",
                self.fallback_bases
            );
        }

        message
    }

    /// Returns the worst condition encountered.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Returns `true` if nothing was skipped and no fallback was needed.
    pub fn is_clean(&self) -> bool {
        self.skipped() == 0 && self.fallback_bases == 0
    }

    /// Returns a human-readable description of every condition encountered,
    /// one per line.
    /// Empty for a clean run.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns how many triangles were skipped for `degeneracy`.
    pub fn count(&self, degeneracy: Degeneracy) -> usize {
        self.counts[degeneracy.slot()]
    }

    /// Returns the first triangle skipped for `degeneracy`, if any.
    pub fn first_triangle(&self, degeneracy: Degeneracy) -> Option<usize> {
        self.first_triangle[degeneracy.slot()]
    }

    /// Returns the total number of skipped triangles.
    pub fn skipped(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Returns how many bases had no usable tangent contribution and were
    /// given an arbitrary tangent perpendicular to their normal.
    pub fn fallback_bases(&self) -> usize {
        self.fallback_bases
    }
}
