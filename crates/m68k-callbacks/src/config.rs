/// Host-side policy for the default callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostConfig {
    /// Let emulated code read host files through the load call. When false
    /// the call fails with EPERM.
    pub allow_file_access: bool,
}

impl HostConfig {
    /// Everything allowed.
    #[must_use]
    pub fn trusted() -> Self {
        Self {
            allow_file_access: true,
        }
    }
}
