//! Stride-1, valid-mode sliding windows over an N-dimensional image.
//!
//! Only windows that fit entirely inside the image are produced. Patches are
//! ordered by their minimum-index anchor in row-major order: the first axis
//! varies slowest and the last axis fastest. Map assembly relies on this
//! order to put every feature vector back at its spatial position.

#[cfg(test)]
mod tests;

use ndarray::{ArrayViewD, Slice};

use crate::error::{Error, Result};

/// All valid window positions of one image.
#[derive(Debug, Clone)]
pub struct PatchGrid<'a, A> {
    image: ArrayViewD<'a, A>,
    window: Vec<usize>,
    grid_shape: Vec<usize>,
}

impl<'a, A> PatchGrid<'a, A> {
    /// Fails with `ShapeMismatch` when the window rank differs from the image
    /// rank, or when any window extent is zero or larger than the image.
    pub fn new(image: ArrayViewD<'a, A>, window: &[usize]) -> Result<Self> {
        let image_shape = image.shape();
        let fits = image_shape.len() == window.len()
            && window
                .iter()
                .zip(image_shape)
                .all(|(&w, &extent)| w > 0 && w <= extent);
        if !fits {
            return Err(Error::ShapeMismatch {
                image_shape: image_shape.to_vec(),
                window_shape: window.to_vec(),
            });
        }

        let grid_shape = image_shape
            .iter()
            .zip(window)
            .map(|(&extent, &w)| extent - w + 1)
            .collect();

        Ok(Self {
            image,
            window: window.to_vec(),
            grid_shape,
        })
    }

    /// Number of window positions along each axis.
    #[inline]
    pub fn grid_shape(&self) -> &[usize] {
        &self.grid_shape
    }

    #[inline]
    pub fn window(&self) -> &[usize] {
        &self.window
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.grid_shape.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Anchor (minimum-index corner) of the `index`-th patch.
    pub fn anchor(&self, index: usize) -> Vec<usize> {
        debug_assert!(index < self.len());
        let mut anchor = vec![0; self.grid_shape.len()];
        let mut rest = index;
        for (axis, &n) in self.grid_shape.iter().enumerate().rev() {
            anchor[axis] = rest % n;
            rest /= n;
        }
        anchor
    }

    /// Read-only view of the window whose minimum corner is `anchor`.
    pub fn patch_at(&self, anchor: &[usize]) -> ArrayViewD<'a, A> {
        let mut view = self.image.clone();
        view.slice_each_axis_inplace(|desc| {
            let axis = desc.axis.index();
            let start = anchor[axis];
            Slice::from(start..start + self.window[axis])
        });
        view
    }

    /// Every patch, in row-major anchor order.
    pub fn patches(&self) -> Vec<ArrayViewD<'a, A>> {
        (0..self.len())
            .map(|index| self.patch_at(&self.anchor(index)))
            .collect()
    }
}

/// Extracts every valid `window`-shaped patch of `image` in row-major anchor
/// order. The result holds `prod(image_extent - window_extent + 1)` views.
pub fn extract_patches<'a, A>(
    image: ArrayViewD<'a, A>,
    window: &[usize],
) -> Result<Vec<ArrayViewD<'a, A>>> {
    Ok(PatchGrid::new(image, window)?.patches())
}
