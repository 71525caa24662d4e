//! The buffer/engine resource pool shared by every file of a batch.
//!
//! [`ResourcePool`] owns one input buffer, one output buffer and one engine
//! handle.  They are allocated once, before the first file, at the sizes the
//! backend guarantees to be sufficient for forward progress, and released
//! once after the last file.  Between files only the engine's frame state is
//! reset (see [`ResourcePool::begin_frame`]); nothing is reallocated.
//!
//! The pool is an ordinary value: the caller creates it, lends it by `&mut`
//! to each per-file call, and destroys it.  Dropping it on an early-exit path
//! releases everything just the same.

use crate::engine::{Backend, StreamEngine};
use crate::io::error::{ErrorKind, SessionError};
use crate::io::prefs::{display_level, Prefs, KB};

// ---------------------------------------------------------------------------
// ResourcePool
// ---------------------------------------------------------------------------

/// Reusable compression resources for a batch of files.
pub struct ResourcePool<H: StreamEngine> {
    /// Input buffer; chunks of the source are read into a prefix of it.
    src_buffer: Vec<u8>,
    /// Output buffer; drained to the destination after every engine call.
    dst_buffer: Vec<u8>,
    /// Streaming compression handle.
    engine: H,
    /// Backend name, for diagnostics.
    backend_name: &'static str,
    /// Number of frames started with this pool.
    frames_started: u64,
}

/// Allocates a zero-filled buffer of exactly `size` bytes, reporting
/// allocation failure instead of aborting.
fn alloc_buffer(size: usize, what: &str) -> Result<Vec<u8>, SessionError> {
    if size == 0 {
        return Err(SessionError::new(
            ErrorKind::ResourceExhausted,
            format!("{} buffer size is zero", what),
        ));
    }
    let mut buf = Vec::new();
    buf.try_reserve_exact(size).map_err(|e| {
        SessionError::new(
            ErrorKind::ResourceExhausted,
            format!("cannot allocate {} buffer of {} bytes: {}", what, size, e),
        )
    })?;
    buf.resize(size, 0);
    Ok(buf)
}

impl<H: StreamEngine> ResourcePool<H> {
    /// Allocates both buffers at the backend's recommended sizes and creates
    /// one engine handle.
    ///
    /// Fails with [`ErrorKind::ResourceExhausted`] when a buffer cannot be
    /// allocated or the handle cannot be created.
    pub fn create<B>(backend: &B) -> Result<Self, SessionError>
    where
        B: Backend<Handle = H>,
    {
        Self::with_input_capacity(backend, backend.recommended_input_size())
    }

    /// Like [`ResourcePool::create`], with an explicit input buffer capacity.
    ///
    /// A capacity below the backend's recommendation is allowed: engine hints
    /// are clamped to it, which costs efficiency but not correctness.  The
    /// output buffer always uses the recommended size.
    pub fn with_input_capacity<B>(backend: &B, input_capacity: usize) -> Result<Self, SessionError>
    where
        B: Backend<Handle = H>,
    {
        let output_capacity = backend.recommended_output_size();
        let src_buffer = alloc_buffer(input_capacity, "input")?;
        let dst_buffer = alloc_buffer(output_capacity, "output")?;

        let engine = backend.create_handle().map_err(|e| {
            SessionError::new(
                ErrorKind::ResourceExhausted,
                format!("cannot create {} compression handle: {}", backend.name(), e),
            )
        })?;

        display_level(
            4,
            &format!(
                "{} resources: input buffer {} KB, output buffer {} KB \n",
                backend.name(),
                input_capacity / KB,
                output_capacity / KB
            ),
        );

        Ok(ResourcePool {
            src_buffer,
            dst_buffer,
            engine,
            backend_name: backend.name(),
            frames_started: 0,
        })
    }

    /// Builds a pool honouring `prefs.input_buffer_size`.
    pub fn from_prefs<B>(backend: &B, prefs: &Prefs) -> Result<Self, SessionError>
    where
        B: Backend<Handle = H>,
    {
        match prefs.input_buffer_size {
            Some(size) => Self::with_input_capacity(backend, size),
            None => Self::create(backend),
        }
    }

    /// Capacity of the input buffer in bytes.
    pub fn input_capacity(&self) -> usize {
        self.src_buffer.len()
    }

    /// Capacity of the output buffer in bytes.
    pub fn output_capacity(&self) -> usize {
        self.dst_buffer.len()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend_name
    }

    /// Number of frames started with this pool so far.
    pub fn frames_started(&self) -> u64 {
        self.frames_started
    }

    /// Resets the engine for a new, independent frame at `level`.
    pub fn begin_frame(&mut self, level: i32) -> Result<(), SessionError> {
        self.engine
            .init_frame(level)
            .map_err(|e| SessionError::engine(ErrorKind::EngineInitFailed, &e))?;
        self.frames_started += 1;
        Ok(())
    }

    /// Splits the pool into its input buffer, output buffer and engine so the
    /// driver can borrow all three at once.
    pub(crate) fn split_mut(&mut self) -> (&mut [u8], &mut [u8], &mut H) {
        (&mut self.src_buffer, &mut self.dst_buffer, &mut self.engine)
    }

    /// Consumes the pool, releasing the engine handle and both buffers.
    pub fn destroy(self) {
        display_level(
            4,
            &format!(
                "{} resources released after {} frame(s) \n",
                self.backend_name, self.frames_started
            ),
        );
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
