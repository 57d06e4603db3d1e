//! Range negotiation.
//!
//! Turns an optional `Range` header and the asset size into a [`DeliveryPlan`].
//! This runs before the asset is read and does no I/O, so every parsing or
//! bounds problem is settled here and the client always gets one well-formed
//! status line.
//!
//! Supported forms:
//! - `bytes=500-999`
//! - `bytes=500-` (to the end of the asset)
//!
//! The suffix form `bytes=-500` and multi-range requests are rejected as
//! malformed and answered with 416.

use axum::http::StatusCode;

/// Why a range header could not be honoured.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// The header does not match `bytes=<start>-[<end>]`.
    #[error("malformed range header: {0}")]
    Malformed(String),

    /// The first requested byte lies past the end of the asset.
    #[error("range start {start} is beyond asset size {total_size}")]
    OutOfBounds { start: u64, total_size: u64 },

    /// The requested end is before the start.
    #[error("range end {end} is before start {start}")]
    Inverted { start: u64, end: u64 },
}

/// A parsed but not yet size-checked range request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: u64,
    /// `None` means "to the end of the asset".
    pub end: Option<u64>,
}

/// An inclusive, resolved byte range: `start <= end < total_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes in the range; never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

impl RangeSpec {
    /// Resolve against the asset size, clamping an end past the last byte.
    pub fn resolve(self, total_size: u64) -> Result<ByteRange, RangeError> {
        if self.start >= total_size {
            return Err(RangeError::OutOfBounds {
                start: self.start,
                total_size,
            });
        }

        let last = total_size - 1;
        let end = self.end.map_or(last, |end| end.min(last));

        if self.start > end {
            return Err(RangeError::Inverted {
                start: self.start,
                end,
            });
        }

        Ok(ByteRange {
            start: self.start,
            end,
        })
    }
}

/// Parse a `Range` header value.
pub fn parse_range(raw: &str) -> Result<RangeSpec, RangeError> {
    let raw = raw.trim();

    let (unit, spec) = raw
        .split_once('=')
        .ok_or_else(|| RangeError::Malformed(raw.to_string()))?;

    if unit.trim() != "bytes" {
        return Err(RangeError::Malformed(format!("unsupported unit {:?}", unit.trim())));
    }

    if spec.contains(',') {
        return Err(RangeError::Malformed("multiple ranges are not supported".into()));
    }

    let (start, end) = spec
        .split_once('-')
        .ok_or_else(|| RangeError::Malformed(raw.to_string()))?;

    let (start, end) = (start.trim(), end.trim());

    if start.is_empty() {
        return Err(RangeError::Malformed("suffix ranges are not supported".into()));
    }

    let start = parse_position(start)?;
    let end = if end.is_empty() {
        None
    } else {
        Some(parse_position(end)?)
    };

    Ok(RangeSpec { start, end })
}

fn parse_position(s: &str) -> Result<u64, RangeError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RangeError::Malformed(format!("invalid byte position {:?}", s)));
    }
    s.parse()
        .map_err(|_| RangeError::Malformed(format!("byte position {:?} is too large", s)))
}

/// The negotiated response for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryPlan {
    /// No range requested: the whole asset with 200.
    Full { total_size: u64 },

    /// A single satisfiable range with 206.
    Partial { range: ByteRange, total_size: u64 },

    /// The range cannot be served: 416, no body, no read.
    Unsatisfiable { total_size: u64, reason: RangeError },
}

impl DeliveryPlan {
    pub fn total_size(&self) -> u64 {
        match *self {
            Self::Full { total_size }
            | Self::Partial { total_size, .. }
            | Self::Unsatisfiable { total_size, .. } => total_size,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Full { .. } => StatusCode::OK,
            Self::Partial { .. } => StatusCode::PARTIAL_CONTENT,
            Self::Unsatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
        }
    }

    /// First byte to be sent, if anything is sent at all.
    pub fn start(&self) -> Option<u64> {
        match self {
            Self::Full { .. } => Some(0),
            Self::Partial { range, .. } => Some(range.start),
            Self::Unsatisfiable { .. } => None,
        }
    }

    /// Body length for `Content-Length`.
    pub fn content_length(&self) -> u64 {
        match self {
            Self::Full { total_size } => *total_size,
            Self::Partial { range, .. } => range.len(),
            Self::Unsatisfiable { .. } => 0,
        }
    }

    /// `Content-Range` value, if this plan carries one.
    pub fn content_range(&self) -> Option<String> {
        match self {
            Self::Full { .. } => None,
            Self::Partial { range, total_size } => {
                Some(format!("bytes {}-{}/{}", range.start, range.end, total_size))
            }
            Self::Unsatisfiable { total_size, .. } => Some(format!("bytes */{}", total_size)),
        }
    }

    /// Offset and length of the window to stream, `None` when nothing is streamed.
    pub fn span(&self) -> Option<(u64, u64)> {
        match self {
            Self::Full { total_size } => Some((0, *total_size)),
            Self::Partial { range, .. } => Some((range.start, range.len())),
            Self::Unsatisfiable { .. } => None,
        }
    }

    pub fn is_satisfiable(&self) -> bool {
        !matches!(self, Self::Unsatisfiable { .. })
    }
}

/// Decide how to answer a request for an asset of `total_size` bytes.
pub fn negotiate(raw_range_header: Option<&str>, total_size: u64) -> DeliveryPlan {
    let Some(raw) = raw_range_header else {
        return DeliveryPlan::Full { total_size };
    };

    match parse_range(raw).and_then(|spec| spec.resolve(total_size)) {
        Ok(range) => DeliveryPlan::Partial { range, total_size },
        Err(reason) => DeliveryPlan::Unsatisfiable { total_size, reason },
    }
}
