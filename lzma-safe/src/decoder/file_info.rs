//! High-level, safe Rust wrapper for liblzma's file info decoder.

use crate::stream::LzmaAllocator;
use crate::{Action, Error, Index, Result, Stream};

/// Safe wrapper around liblzma's file info decoder.
///
/// This decoder extracts index metadata from a complete XZ file by reading
/// Stream Headers, Stream Footers, Index blocks, and Stream Padding.
/// It can seek within the file to efficiently extract metadata without
/// decompressing the actual data.
pub struct FileInfoDecoder {
    /// The underlying stream
    stream: Option<Stream>,
    /// Boxed pointer to ensure stable address for liblzma to write to
    index_ptr_box: Box<*mut liblzma_sys::lzma_index>,
    /// The extracted index (available only after decoding completes)
    index: Option<Index>,
    /// Size of the input file (required by liblzma)
    file_size: u64,
    /// Allocator from the stream, kept for cleanup
    allocator: Option<LzmaAllocator>,
}

impl FileInfoDecoder {
    /// Create a new file info decoder.
    ///
    /// # Parameters
    ///
    /// * `memlimit` - Maximum memory usage for the decoder
    /// * `file_size` - Total size of the input XZ file in bytes
    /// * `stream` - The underlying stream
    ///
    /// # Errors
    ///
    /// Returns [`Error::MemError`] if memory allocation fails.
    /// Returns [`Error::ProgError`] if the decoder is misused.
    pub fn new(memlimit: u64, file_size: u64, mut stream: Stream) -> Result<Self> {
        let mut index_ptr_box = Box::new(std::ptr::null_mut());
        let allocator = stream.allocator();
        crate::ffi::lzma_file_info_decoder(
            &mut stream,
            std::ptr::from_mut(&mut *index_ptr_box),
            memlimit,
            file_size,
        )?;
        Ok(Self {
            stream: Some(stream),
            index_ptr_box,
            index: None,
            file_size,
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
    /// Returns [`Error::SeekNeeded`] if the decoder needs the application to seek
    /// to a different position in the file. Use [`seek_pos()`](Self::seek_pos) to get the target position.
    /// Returns various other errors depending on the input data and decoder state.
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
            Err(Error::SeekNeeded) => {
                // Decoder needs seeking; put the stream back and return the error.
                self.stream = Some(stream);
                Err(Error::SeekNeeded)
            }
            Err(crate::Error::StreamEnd) => {
                // Decoding is finished; extract the index if it's valid.
                if !(*self.index_ptr_box).is_null() {
                    // SAFETY: index_ptr is valid and was populated by liblzma
                    // Pass the stream's allocator to the index
                    let allocator = stream.allocator();
                    self.index = unsafe { Index::from_raw(*self.index_ptr_box, allocator) };
                    // Clear the pointer since we've taken ownership
                    *self.index_ptr_box = std::ptr::null_mut();
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
    /// This should be called when `process` returns [`Error::SeekNeeded`].
    /// The application should then seek to this position in the input file
    /// and provide data starting from this position.
    pub fn seek_pos(&self) -> u64 {
        self.stream.as_ref().map_or(0, Stream::seek_pos)
    }

    /// Returns whether the decoding has finished and the index is available.
    pub fn is_finished(&self) -> bool {
        self.stream.is_none()
    }

    /// Get the total number of input bytes processed.
    pub fn total_in(&self) -> u64 {
        self.stream.as_ref().map_or(0, Stream::total_in)
    }

    /// Get the size of the input file.
    pub fn file_size(&self) -> u64 {
        self.file_size
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

impl Drop for FileInfoDecoder {
    fn drop(&mut self) {
        // Free the index if it wasn't wrapped in Index yet
        if !(*self.index_ptr_box).is_null() {
            crate::ffi::lzma_index_end(*self.index_ptr_box, self.allocator.as_ref());
        }

        // Finalize the stream
        if let Some(stream) = self.stream.take() {
            stream.finish();
        }
    }
}
