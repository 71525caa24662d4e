//! Zstandard backend built on the `zstd` crate's raw streaming encoder.
//!
//! Buffer recommendations come straight from libzstd
//! (`ZSTD_CStreamInSize` / `ZSTD_CStreamOutSize`): an input buffer of that
//! size can always be consumed as one full block, and an output buffer of
//! that size can always receive one fully flushed block.

use ::zstd::stream::raw::{CParameter, Encoder, InBuffer, Operation, OutBuffer};
use ::zstd::zstd_safe;

use crate::config::ZSTD_EXTENSION;
use crate::engine::{Backend, EngineError, InCursor, OutCursor, StreamEngine};

/// The Zstandard backend.
///
/// `content_checksum` appends a 32-bit checksum of the uncompressed content
/// to every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zstd {
    pub content_checksum: bool,
}

impl Zstd {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_checksum(content_checksum: bool) -> Self {
        Zstd { content_checksum }
    }
}

impl Backend for Zstd {
    type Handle = ZstdHandle;

    fn name(&self) -> &'static str {
        "zstd"
    }

    fn extension(&self) -> &'static str {
        ZSTD_EXTENSION
    }

    fn recommended_input_size(&self) -> usize {
        zstd_safe::CCtx::in_size()
    }

    fn recommended_output_size(&self) -> usize {
        zstd_safe::CCtx::out_size()
    }

    fn create_handle(&self) -> Result<ZstdHandle, EngineError> {
        let encoder = Encoder::new(::zstd::DEFAULT_COMPRESSION_LEVEL)
            .map_err(|e| EngineError::new(format!("cannot create compression stream: {}", e)))?;
        Ok(ZstdHandle {
            encoder,
            content_checksum: self.content_checksum,
        })
    }
}

/// A libzstd compression stream (`ZSTD_CStream`).
pub struct ZstdHandle {
    encoder: Encoder<'static>,
    content_checksum: bool,
}

impl StreamEngine for ZstdHandle {
    fn init_frame(&mut self, level: i32) -> Result<(), EngineError> {
        // Session-only reset: parameters survive, frame state does not.
        self.encoder.reinit()?;
        self.encoder.set_parameter(CParameter::CompressionLevel(level))?;
        self.encoder
            .set_parameter(CParameter::ChecksumFlag(self.content_checksum))?;
        Ok(())
    }

    fn compress_step(
        &mut self,
        input: &mut InCursor<'_>,
        output: &mut OutCursor<'_>,
    ) -> Result<usize, EngineError> {
        let mut zin = InBuffer::around(input.filled());
        zin.pos = input.pos();
        let (hint, produced) = {
            let (dst, start) = output.buffer_mut();
            let mut zout = OutBuffer::around_pos(dst, start);
            let hint = self.encoder.run(&mut zin, &mut zout)?;
            (hint, zout.pos())
        };
        input.set_pos(zin.pos);
        output.set_pos(produced);
        Ok(hint)
    }

    fn end_frame(&mut self, output: &mut OutCursor<'_>) -> Result<usize, EngineError> {
        let (remaining, produced) = {
            let (dst, start) = output.buffer_mut();
            let mut zout = OutBuffer::around_pos(dst, start);
            let remaining = self.encoder.finish(&mut zout, true)?;
            (remaining, zout.pos())
        };
        output.set_pos(produced);
        Ok(remaining)
    }
}
