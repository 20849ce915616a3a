//! Flat storage for N-dimensional scalar data.
//!
//! Elements are laid out row-major with the first axis varying fastest:
//! for a 3-D volume of shape `[nx, ny, nz]` the element at `(x, y, z)` lives
//! at `x + y * nx + z * nx * ny`. The same convention is used for the 2-D
//! lookup texture (`[width, height]`).

use bytemuck::Pod;

use crate::error::{Result, VolrenError};

/// A dense N-dimensional buffer of plain-old-data elements.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarBuffer<T: Pod> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T: Pod> ScalarBuffer<T> {
    /// Creates a buffer of the given shape filled with `value`.
    pub fn filled(shape: &[usize], value: T) -> Self {
        let len = shape.iter().product();
        Self {
            shape: shape.to_vec(),
            data: vec![value; len],
        }
    }

    /// Creates a zero-initialized buffer of the given shape.
    pub fn zeroed(shape: &[usize]) -> Self {
        Self::filled(shape, T::zeroed())
    }

    /// Wraps existing data, checking that its length matches the shape.
    pub fn from_vec(shape: &[usize], data: Vec<T>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(VolrenError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    /// Returns the extent along each axis.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flattens a multi-index into a linear offset, or `None` if out of range.
    #[must_use]
    pub fn flatten_index(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        let mut stride = 1;
        for (&i, &extent) in index.iter().zip(&self.shape) {
            if i >= extent {
                return None;
            }
            offset += i * stride;
            stride *= extent;
        }
        Some(offset)
    }

    /// Converts a linear offset back into a multi-index.
    #[must_use]
    pub fn unflatten_index(&self, mut offset: usize) -> Option<Vec<usize>> {
        if offset >= self.data.len() {
            return None;
        }
        let mut index = Vec::with_capacity(self.shape.len());
        for &extent in &self.shape {
            index.push(offset % extent);
            offset /= extent;
        }
        Some(index)
    }

    /// Returns the element at a multi-index.
    #[must_use]
    pub fn get(&self, index: &[usize]) -> Option<T> {
        self.flatten_index(index).map(|i| self.data[i])
    }

    /// Sets the element at a multi-index. Returns false if out of range.
    pub fn set(&mut self, index: &[usize], value: T) -> bool {
        match self.flatten_index(index) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    /// Returns the flat element slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the contiguous run of elements whose last-axis index is `i`.
    ///
    /// For a volume this is one z-slice, for the lookup texture one row.
    #[must_use]
    pub fn outer_slice(&self, i: usize) -> Option<&[T]> {
        let (&outer, inner) = self.shape.split_last()?;
        if i >= outer {
            return None;
        }
        let stride: usize = inner.iter().product();
        Some(&self.data[i * stride..(i + 1) * stride])
    }

    /// Mutable variant of [`Self::outer_slice`].
    pub fn outer_slice_mut(&mut self, i: usize) -> Option<&mut [T]> {
        let (&outer, inner) = self.shape.split_last()?;
        if i >= outer {
            return None;
        }
        let stride: usize = inner.iter().product();
        Some(&mut self.data[i * stride..(i + 1) * stride])
    }

    /// Returns the raw bytes of the buffer, as uploaded to the GPU.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}
