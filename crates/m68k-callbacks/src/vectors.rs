use motorola_680x0::{FunctionCode, Memory};
use tracing::debug;

use crate::HostCall;
use crate::error::HostError;

/// Exception vectors 4-11 and the host calls that handle them.
const DEFAULT_VECTORS: [(u8, HostCall); 8] = [
    (4, HostCall::IllegalInstruction),
    (5, HostCall::DivisionByZero),
    (6, HostCall::ChkRange),
    (7, HostCall::TrapvOverflow),
    (8, HostCall::PrivilegeViolation),
    (9, HostCall::TraceException),
    (10, HostCall::LineAEmulator),
    (11, HostCall::LineFEmulator),
];

/// Point vectors 4-11 of the table at `vbr` to the terminal handlers, so an
/// exception no emulated handler claims ends the session with a
/// diagnostic.
pub fn install_default_vectors(mem: &mut dyn Memory, vbr: u32) -> Result<(), HostError> {
    for (vector, call) in DEFAULT_VECTORS {
        let addr = vbr.wrapping_add(u32::from(vector) * 4);
        mem.put_long(addr, call.address(), FunctionCode::SupervisorData)
            .ok_or(HostError::VectorTable { vector, addr })?;
    }
    debug!(vbr, "default exception vectors installed");
    Ok(())
}
