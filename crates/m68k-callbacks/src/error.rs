use std::io;

use thiserror::Error;

/// Failure of a host service, reported to emulated code as an errno.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("host file access is not permitted")]
    NotPermitted,

    #[error("{len} bytes at {addr:#010X} are not readable user data")]
    BadAddress { addr: u32, len: u32 },

    #[error("path is empty or not NUL-terminated")]
    InvalidPath,

    #[error("no heap pages for {len} bytes")]
    OutOfMemory { len: usize },

    #[error("read {actual} of {expected} bytes")]
    ShortRead { expected: u64, actual: u64 },

    #[error("file is larger than the address space")]
    TooLarge,

    #[error("vector {vector} at {addr:#010X} could not be written")]
    VectorTable { vector: u8, addr: u32 },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl HostError {
    /// Value stored in D1 for emulated code.
    #[must_use]
    pub fn errno(&self) -> i32 {
        match self {
            Self::NotPermitted => libc::EPERM,
            Self::BadAddress { .. } | Self::VectorTable { .. } => libc::EFAULT,
            Self::InvalidPath => libc::EINVAL,
            Self::OutOfMemory { .. } | Self::TooLarge => libc::ENOMEM,
            Self::ShortRead { .. } => libc::EIO,
            Self::Io(err) => err.raw_os_error().unwrap_or(libc::EIO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_keep_their_os_code() {
        let err = HostError::from(io::Error::from_raw_os_error(libc::ENOENT));
        assert_eq!(err.errno(), libc::ENOENT);
        let err = HostError::from(io::Error::other("synthetic"));
        assert_eq!(err.errno(), libc::EIO);
    }
}
