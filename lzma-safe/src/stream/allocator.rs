//! Infrastructure for providing custom allocators to liblzma.

use std::os::raw::c_void;
use std::sync::Arc;

/// Trait for custom memory allocators compatible with liblzma.
pub trait Allocator: Send + Sync + 'static {
    /// Allocate a block of memory for `nmemb` elements of `size` bytes each.
    ///
    /// Returns a pointer to the allocated memory, or null on failure or overflow.
    fn alloc(&self, nmemb: usize, size: usize) -> *mut c_void;

    /// Free a previously allocated memory block.
    ///
    /// # Safety
    ///
    /// The pointer must have been returned by `alloc` and not already freed.
    unsafe fn free(&self, ptr: *mut c_void);
}

/// Standard allocator using `libc::malloc`/`free`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdAllocator;

impl Allocator for StdAllocator {
    fn alloc(&self, nmemb: usize, size: usize) -> *mut c_void {
        // Return null if multiplication overflows or allocation fails.
        match nmemb.checked_mul(size) {
            Some(total) if total > 0 => unsafe { libc::malloc(total) },
            _ => std::ptr::null_mut(),
        }
    }

    unsafe fn free(&self, ptr: *mut c_void) {
        // Free only non-null pointers, as required by C standard.
        if !ptr.is_null() {
            libc::free(ptr);
        }
    }
}

/// RAII wrapper for a liblzma-compatible allocator.
pub struct LzmaAllocator {
    /// The C allocator structure passed to liblzma.
    inner: liblzma_sys::lzma_allocator,
    /// Keep the allocator alive. None for default allocator.
    _allocator_box: Option<Box<Arc<dyn Allocator>>>,
}

impl Default for LzmaAllocator {
    fn default() -> Self {
        Self {
            inner: liblzma_sys::lzma_allocator {
                alloc: None, // Use liblzma's default malloc
                free: None,  // Use liblzma's default free
                opaque: std::ptr::null_mut(),
            },
            _allocator_box: None,
        }
    }
}

impl LzmaAllocator {
    /// Construct a new `LzmaAllocator` from a custom Rust allocator.
    ///
    /// The allocator will be boxed and kept alive for the lifetime of this wrapper.
    /// The returned structure can be passed to liblzma.
    pub fn from_allocator(allocator: Arc<dyn Allocator>) -> Self {
        // Box the Arc to keep it alive and get a stable pointer
        let boxed_allocator = Box::new(allocator);
        let opaque_ptr =
            std::ptr::from_ref::<Arc<dyn Allocator>>(Box::as_ref(&boxed_allocator)) as *mut c_void;

        Self {
            inner: liblzma_sys::lzma_allocator {
                alloc: Some(c_alloc_wrapper),
                free: Some(c_free_wrapper),
                opaque: opaque_ptr,
            },
            _allocator_box: Some(boxed_allocator),
        }
    }

    /// Return a const pointer to the wrapped allocator.
    pub fn as_ptr(&self) -> *const liblzma_sys::lzma_allocator {
        std::ptr::from_ref(&self.inner)
    }

    /// Return a mutable pointer to the wrapped allocator.
    pub fn as_mut_ptr(&mut self) -> *mut liblzma_sys::lzma_allocator {
        std::ptr::from_mut(&mut self.inner)
    }
}

impl Clone for LzmaAllocator {
    fn clone(&self) -> Self {
        match &self._allocator_box {
            None => {
                // Default allocator - just create a new one
                Self::default()
            }
            Some(boxed_arc) => {
                // Clone the Arc to share the allocator
                let allocator_arc = Arc::clone(boxed_arc.as_ref());
                Self::from_allocator(allocator_arc)
            }
        }
    }
}

impl Drop for LzmaAllocator {
    fn drop(&mut self) {
        // The Box<Arc<dyn Allocator>> will be dropped automatically,
        // which is safe since we control the lifetime
    }
}

/// C-compatible allocation wrapper for liblzma.
extern "C" fn c_alloc_wrapper(opaque: *mut c_void, nmemb: usize, size: usize) -> *mut c_void {
    if opaque.is_null() {
        return std::ptr::null_mut();
    }

    // Safety: opaque is a valid pointer to a Box<Arc<dyn Allocator>>
    // The Box is kept alive by LzmaAllocator, so this is safe to dereference.
    let allocator_arc = unsafe { &*(opaque as *const Arc<dyn Allocator>) };
    allocator_arc.alloc(nmemb, size)
}

/// C-compatible free wrapper for liblzma.
extern "C" fn c_free_wrapper(opaque: *mut c_void, ptr: *mut c_void) {
    if opaque.is_null() {
        return;
    }

    // Safety: opaque is a valid pointer to a Box<Arc<dyn Allocator>>
    // The Box is kept alive by LzmaAllocator, so this is safe to dereference.
    let allocator_arc = unsafe { &*(opaque as *const Arc<dyn Allocator>) };
    unsafe { allocator_arc.free(ptr) };
}
