//! High-level, safe Rust wrapper for liblzma's XZ Index decoder.

use crate::stream::LzmaAllocator;
use crate::{Action, Index, Result, Stream};

/// Safe wrapper around liblzma's index decoder.
///
/// This decoder extracts index metadata from XZ Index blocks without decompressing the actual data.
/// It can be used to get information about streams, blocks, compression ratios, etc.
pub struct IndexDecoder {
    /// The underlying stream
    stream: Option<Stream>,
    /// Pointer to the index being decoded (owned by liblzma until decoding completes)
    index_ptr: *mut liblzma_sys::lzma_index,
    /// The extracted index (available only after decoding completes)
    index: Option<Index>,
    /// Allocator from the stream, kept for cleanup
    allocator: Option<LzmaAllocator>,
}

impl IndexDecoder {
    /// Create a new index decoder.
    ///
    /// # Parameters
    ///
    /// * `memlimit` - Maximum memory usage for the decoder
    /// * `stream` - The underlying stream
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MemError`] if memory allocation fails.
    /// Returns [`crate::Error::ProgError`] if the decoder is misused.
    pub fn new(memlimit: u64, mut stream: Stream) -> Result<Self> {
        let mut index_ptr: *mut liblzma_sys::lzma_index = std::ptr::null_mut();
        let allocator = stream.allocator();
        crate::ffi::lzma_index_decoder(&mut stream, std::ptr::from_mut(&mut index_ptr), memlimit)?;
        Ok(Self {
            stream: Some(stream),
            index_ptr,
            index: None,
            allocator,
        })
    }

    /// Process input data and extract file information.
    ///
    /// # Parameters
    ///
    /// * `input` - Input data buffer
    /// * `action` - Action to perform (Run or Finish)
    ///
    /// # Returns
    ///
    /// Returns the number of bytes consumed from input.
    ///
    /// # Errors
    ///
    /// Returns various errors depending on the input data and decoder state.
    pub fn process(&mut self, input: &[u8], action: Action) -> Result<usize> {
        // Take ownership of the stream for this operation.
        let Some(mut stream) = self.stream.take() else {
            // Stream is already finished or dropped; this is a logic error.
            return Err(crate::Error::ProgError);
        };

        if !input.is_empty() {
            stream.set_next_input(input);
        }

        let input_before = stream.avail_in();

        // Call lzma_code with proper mutable reference
        let result = crate::ffi::lzma_code(&mut stream, action);
        let bytes_read = input_before - stream.avail_in();

        // Handle special case for Action::Finish with empty input where liblzma
        // may require an additional call to signal LZMA_STREAM_END properly.
        let result =
            if action == Action::Finish && result.is_ok() && input_before == 0 && bytes_read == 0 {
                // For empty inputs liblzma may require one additional call before
                // signalling `LZMA_STREAM_END`. Invoke it here so callers don't
                // need to loop in trivial cases.
                let second_result = crate::ffi::lzma_code(&mut stream, action);
                let second_bytes_read = input_before - stream.avail_in();

                if (second_result.is_ok() || matches!(second_result, Err(crate::Error::BufError)))
                    && second_bytes_read == 0
                {
                    // Force stream end when no progress is made on the second call
                    Err(crate::Error::StreamEnd)
                } else {
                    second_result
                }
            } else {
                result
            };

        match result {
            Ok(()) => {
                // Decoding continues; put the stream back for further use.
                self.stream = Some(stream);
                Ok(bytes_read)
            }
            Err(crate::Error::StreamEnd) => {
                // Decoding is finished; extract the index if it's valid.
                if !self.index_ptr.is_null() {
                    // SAFETY: index_ptr is valid and was populated by liblzma
                    // Pass the stream's allocator to the index
                    let allocator = stream.allocator();
                    self.index = unsafe { Index::from_raw(self.index_ptr, allocator) };
                    // Clear the pointer since we've taken ownership
                    self.index_ptr = std::ptr::null_mut();
                }
                stream.finish();
                Ok(bytes_read)
            }
            Err(err) => {
                // On error, retain the stream for possible recovery or inspection.
                self.stream = Some(stream);
                Err(err)
            }
        }
    }

    /// Get the seek position if the decoder needs to seek.
    ///
    /// This should be called when `process` returns `Action::Run` and the
    /// decoder needs to seek to a specific position in the input file.
    pub fn seek_pos(&mut self) -> u64 {
        self.stream.as_mut().map_or(0, |s| s.lzma_stream().seek_pos)
    }

    /// Returns whether the decoding has finished and the index is available.
    pub fn is_finished(&self) -> bool {
        self.stream.is_none()
    }

    /// Get the total number of input bytes processed.
    pub fn total_in(&self) -> u64 {
        self.stream.as_ref().map_or(0, Stream::total_in)
    }

    /// Returns a reference to the extracted index if decoding completed successfully.
    ///
    /// Returns `None` if decoding has not finished yet.
    pub fn index(&self) -> Option<&Index> {
        if !self.is_finished() {
            return None;
        }
        self.index.as_ref()
    }
}

impl Drop for IndexDecoder {
    fn drop(&mut self) {
        // Free the index if it wasn't wrapped in Index yet
        if !self.index_ptr.is_null() {
            crate::ffi::lzma_index_end(self.index_ptr, self.allocator.as_ref());
        }

        // Finalize the stream
        if let Some(stream) = self.stream.take() {
            stream.finish();
        }
    }
}
