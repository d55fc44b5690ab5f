//! Erased component columns.
//!
//! A [`Column`] is a packed, growable array of component values with a fixed
//! element byte size, one per component id of a table's kind. Columns with
//! element size zero (tags, relation ids) carry no buffer at all; every
//! mutation on them is a no-op and the table's entity column remains the
//! authority for row count.
//!
//! Values are moved with untyped byte copies and are never dropped; rows
//! appended by [`push_uninit`](Column::push_uninit) and friends are
//! uninitialized until the caller writes them.

use std::{mem, ptr, slice};

use crate::storage::{
    mem::{ErasedBuffer, GrowthStrategy},
    row::Row,
};

/// A packed column of erased component values.
pub struct Column {
    /// Element byte size. Zero means tag: no buffer, no length.
    size: usize,

    /// Number of initialized-by-contract rows.
    len: usize,

    /// The backing allocation. `None` exactly when `size == 0`.
    buf: Option<ErasedBuffer>,
}

impl Column {
    /// Create an empty column for elements of `size` bytes. A size of zero
    /// creates a tag column with no buffer.
    pub fn new(size: usize, growth: GrowthStrategy) -> Self {
        Self {
            size,
            len: 0,
            buf: (size > 0).then(|| ErasedBuffer::new(size, growth)),
        }
    }

    /// Element byte size.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of rows. Always zero for tag columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the column holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated capacity in rows. Zero for tag columns.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.as_ref().map(ErasedBuffer::capacity).unwrap_or(0)
    }

    /// Whether this column stores component data.
    #[inline]
    pub fn is_tag(&self) -> bool {
        self.size == 0
    }

    /// Pointer to the start of the column's data, or `None` for tag columns
    /// and columns whose buffer has been freed.
    #[inline]
    pub fn data_ptr(&self) -> Option<ptr::NonNull<u8>> {
        self.buf
            .as_ref()
            .filter(|buf| buf.is_allocated())
            // SAFETY: an allocated buffer's pointer is non-null.
            .map(|buf| unsafe { ptr::NonNull::new_unchecked(buf.as_ptr()) })
    }

    /// Append one uninitialized row. Returns `true` if the buffer
    /// reallocated, invalidating cached pointers into this column.
    pub(crate) fn push_uninit(&mut self) -> bool {
        let Some(buf) = self.buf.as_mut() else {
            return false;
        };
        let moved = buf.ensure(self.len + 1);
        self.len += 1;
        moved
    }

    /// Append `count` uninitialized rows. Returns `true` if the buffer
    /// reallocated.
    pub(crate) fn grow_uninit(&mut self, count: usize) -> bool {
        let Some(buf) = self.buf.as_mut() else {
            return false;
        };
        let moved = buf.ensure(self.len + count);
        self.len += count;
        moved
    }

    /// Reserve capacity for exactly `count` rows without changing the length.
    pub(crate) fn set_size(&mut self, count: usize) {
        match self.buf.as_mut() {
            Some(buf) => {
                buf.ensure_exact(count);
            }
            None => debug_assert_eq!(self.size, 0),
        }
    }

    /// Remove `row` by overwriting it with the last row, then truncating.
    /// Removing the last row is a plain truncation.
    pub(crate) fn swap_remove(&mut self, row: Row) {
        let Some(buf) = self.buf.as_mut() else {
            return;
        };
        debug_assert!(row.index() < self.len, "row index out of bounds");
        let last = self.len - 1;
        if row.index() != last {
            // SAFETY: both rows are in bounds and distinct.
            unsafe {
                ptr::copy_nonoverlapping(
                    buf.ptr_at(last).as_ptr(),
                    buf.ptr_at(row.index()).as_ptr(),
                    self.size,
                );
            }
        }
        self.len = last;
    }

    /// Exchange the contents of two rows. No-op for equal rows.
    pub(crate) fn swap(&mut self, a: Row, b: Row) {
        if a == b {
            return;
        }
        let Some(buf) = self.buf.as_mut() else {
            return;
        };
        debug_assert!(a.index() < self.len && b.index() < self.len, "row index out of bounds");
        // SAFETY: rows are in bounds and distinct.
        unsafe {
            ptr::swap_nonoverlapping(
                buf.ptr_at(a.index()).as_ptr(),
                buf.ptr_at(b.index()).as_ptr(),
                self.size,
            );
        }
    }

    /// Rotate the window of `count` rows starting at `row` leftward by one:
    /// the row at `row - 1` moves to `row + count - 1` and the window shifts
    /// down to fill the gap.
    pub(crate) fn rotate_back(&mut self, row: usize, count: usize) {
        let Some(buf) = self.buf.as_mut() else {
            return;
        };
        debug_assert!(row >= 1, "rotation window starts before the column");
        debug_assert!(row + count <= self.len, "rotation window out of bounds");

        let mut saved = vec![0u8; self.size];
        // SAFETY: the window [row - 1, row + count) is in bounds; the shift
        // copy overlaps by one element and uses the overlap-safe copy.
        unsafe {
            ptr::copy_nonoverlapping(buf.ptr_at(row - 1).as_ptr(), saved.as_mut_ptr(), self.size);
            ptr::copy(
                buf.ptr_at(row).as_ptr(),
                buf.ptr_at(row - 1).as_ptr(),
                self.size * count,
            );
            ptr::copy_nonoverlapping(
                saved.as_ptr(),
                buf.ptr_at(row + count - 1).as_ptr(),
                self.size,
            );
        }
    }

    /// Merge `src` into this column, emptying `src`.
    ///
    /// When this column has no rows the source allocation is transplanted
    /// wholesale with zero copies; otherwise the source bytes are copied onto
    /// the tail and the source buffer is freed.
    pub(crate) fn merge_from(&mut self, src: &mut Column) {
        debug_assert_eq!(self.size, src.size, "merging columns of different element sizes");
        if self.size == 0 {
            return;
        }
        if self.len == 0 {
            if let (Some(dst_buf), Some(src_buf)) = (self.buf.as_mut(), src.buf.as_mut()) {
                mem::swap(dst_buf, src_buf);
            }
            self.len = src.len;
            src.clear();
        } else {
            if src.len > 0 {
                let total = self.len + src.len;
                if let (Some(dst_buf), Some(src_buf)) = (self.buf.as_mut(), src.buf.as_ref()) {
                    dst_buf.ensure_exact(total);
                    // SAFETY: source rows are in bounds; destination tail was
                    // just reserved; the buffers are distinct allocations.
                    unsafe {
                        ptr::copy_nonoverlapping(
                            src_buf.ptr_at(0).as_ptr(),
                            dst_buf.ptr_at(self.len).as_ptr(),
                            self.size * src.len,
                        );
                    }
                }
                self.len = total;
            }
            src.clear();
        }
    }

    /// Free the column's buffer and forget all rows.
    pub(crate) fn clear(&mut self) {
        if let Some(buf) = self.buf.as_mut() {
            buf.release();
        }
        self.len = 0;
    }

    /// The bytes of one row.
    ///
    /// # Panics
    /// Panics if called on a tag column.
    ///
    /// # Safety
    /// The caller must ensure `row` is in bounds and has been written since
    /// it was appended.
    pub unsafe fn bytes(&self, row: Row) -> &[u8] {
        assert!(self.size > 0, "tag columns carry no data");
        debug_assert!(row.index() < self.len, "row index out of bounds");
        let buf = self.buf.as_ref().expect("data-bearing column has a buffer");
        // SAFETY: row is in bounds per the caller contract.
        unsafe { slice::from_raw_parts(buf.ptr_at(row.index()).as_ptr(), self.size) }
    }

    /// The bytes of one row, mutably.
    ///
    /// # Panics
    /// Panics if called on a tag column.
    ///
    /// # Safety
    /// The caller must ensure `row` is in bounds; reading the slice requires
    /// that the row has been written since it was appended.
    pub unsafe fn bytes_mut(&mut self, row: Row) -> &mut [u8] {
        assert!(self.size > 0, "tag columns carry no data");
        debug_assert!(row.index() < self.len, "row index out of bounds");
        let buf = self.buf.as_mut().expect("data-bearing column has a buffer");
        // SAFETY: row is in bounds per the caller contract.
        unsafe { slice::from_raw_parts_mut(buf.ptr_at(row.index()).as_ptr(), self.size) }
    }

    /// Copy `bytes` into `row`.
    ///
    /// # Panics
    /// Panics if called on a tag column or if `bytes` is not exactly one
    /// element wide.
    ///
    /// # Safety
    /// The caller must ensure `row` is in bounds.
    pub unsafe fn write(&mut self, row: Row, bytes: &[u8]) {
        assert_eq!(bytes.len(), self.size, "value width does not match the column");
        // SAFETY: forwarded caller contract.
        unsafe { self.bytes_mut(row) }.copy_from_slice(bytes);
    }
}
