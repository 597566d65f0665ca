//! The load call: read a host file into fresh heap pages.
//!
//! In: A0 path address, D0 path length including the trailing NUL.
//! Out: A0 address of the data (0 on failure), D0 byte count, D1 errno on
//! failure.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use motorola_680x0::{Access, FunctionCode, ProcessorState, RTS};
use tracing::debug;

use crate::config::HostConfig;
use crate::error::HostError;

pub(crate) fn load(state: &mut ProcessorState<'_>, config: &HostConfig) -> Option<u16> {
    let path_addr = state.regs.a[0];
    let path_len = state.regs.d[0];
    state.regs.a[0] = 0;
    match load_file(state, config, path_addr, path_len) {
        Ok((addr, len)) => {
            state.regs.a[0] = addr;
            state.regs.d[0] = len;
        }
        Err(err) => {
            debug!(%err, "load failed");
            state.regs.d[1] = err.errno() as u32;
        }
    }
    Some(RTS)
}

/// Copy the path out of user data space. The range must end in NUL; the
/// path is everything before the first NUL and must not be empty.
fn read_path(state: &mut ProcessorState<'_>, addr: u32, len: u32) -> Result<Vec<u8>, HostError> {
    let bytes = state
        .mem
        .translate(addr, len, FunctionCode::UserData, Access::Read)
        .ok_or(HostError::BadAddress { addr, len })?;
    if bytes.last() != Some(&0) {
        return Err(HostError::InvalidPath);
    }
    match bytes.iter().position(|&b| b == 0) {
        Some(0) | None => Err(HostError::InvalidPath),
        Some(end) => Ok(bytes[..end].to_vec()),
    }
}

#[cfg(unix)]
fn host_path(bytes: Vec<u8>) -> PathBuf {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn host_path(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}

fn load_file(
    state: &mut ProcessorState<'_>,
    config: &HostConfig,
    path_addr: u32,
    path_len: u32,
) -> Result<(u32, u32), HostError> {
    if !config.allow_file_access {
        return Err(HostError::NotPermitted);
    }
    let path = host_path(read_path(state, path_addr, path_len)?);

    let mut file = File::open(&path)?;
    let size = file.metadata()?.len();
    let len = u32::try_from(size).map_err(|_| HostError::TooLarge)?;

    let addr = state
        .mem
        .allocator()
        .and_then(|heap| heap.allocate(len))
        .ok_or(HostError::OutOfMemory { len: len as usize })?;
    if let Err(err) = fill(state, &mut file, addr, len) {
        if let Some(heap) = state.mem.allocator() {
            heap.deallocate(addr);
        }
        return Err(err);
    }
    debug!(path = %path.display(), addr, len, "file loaded");
    Ok((addr, len))
}

/// Read exactly `len` bytes of `file` into freshly allocated pages at `addr`.
fn fill(state: &mut ProcessorState<'_>, file: &mut File, addr: u32, len: u32) -> Result<(), HostError> {
    let buffer = state
        .mem
        .translate(addr, len, FunctionCode::SupervisorData, Access::Write)
        .ok_or(HostError::BadAddress { addr, len })?;
    let mut read = 0;
    while read < buffer.len() {
        match file.read(&mut buffer[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err.into()),
        }
    }
    if read != buffer.len() {
        return Err(HostError::ShortRead {
            expected: u64::from(len),
            actual: read as u64,
        });
    }
    Ok(())
}
