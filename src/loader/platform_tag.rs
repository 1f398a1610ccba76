// ── Platform identification ───────────────────────────────────────────────────
//
// Maps raw host strings to the canonical `{os}-{arch}` tag that names the
// pre-built artifact.  Pure; every input maps to some tag.

use std::fmt;

/// Operating-system family of a pre-built artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Windows,
    MacOs,
    Linux,
}

impl Os {
    /// Case-insensitive substring match on the raw OS name.
    /// Anything unrecognised is treated as Linux.
    pub fn from_raw(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        // "darwin" contains "win": test for macOS first.
        if name.contains("mac") || name.contains("darwin") {
            Self::MacOs
        } else if name.contains("win") {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    /// Directory-name form used in resource and filesystem paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
        }
    }
}

/// CPU architecture of a pre-built artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    Aarch64,
}

impl Arch {
    /// Anything that is not recognisably 64-bit ARM is treated as x86_64.
    pub fn from_raw(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name.contains("aarch64") || name.contains("arm64") {
            Self::Aarch64
        } else {
            Self::X86_64
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
        }
    }
}

/// The `(OS, architecture)` pair identifying which artifact is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformTag {
    pub os: Os,
    pub arch: Arch,
}

impl PlatformTag {
    /// Build a tag from raw OS and architecture strings.
    pub fn from_raw(os: &str, arch: &str) -> Self {
        Self {
            os: Os::from_raw(os),
            arch: Arch::from_raw(arch),
        }
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}

/// Tag of the running host, from the OS and architecture the process was
/// built for.
pub fn identify() -> PlatformTag {
    PlatformTag::from_raw(std::env::consts::OS, std::env::consts::ARCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_names() {
        assert_eq!(Os::from_raw("Windows 11"), Os::Windows);
        assert_eq!(Os::from_raw("windows"), Os::Windows);
    }

    #[test]
    fn mac_names() {
        assert_eq!(Os::from_raw("Mac OS X"), Os::MacOs);
        assert_eq!(Os::from_raw("macos"), Os::MacOs);
        assert_eq!(Os::from_raw("Darwin"), Os::MacOs);
        assert_eq!(Os::from_raw("darwin23.4.0"), Os::MacOs);
    }

    #[test]
    fn unknown_os_defaults_to_linux() {
        assert_eq!(Os::from_raw("SolarOS 9"), Os::Linux);
        assert_eq!(Os::from_raw(""), Os::Linux);
        assert_eq!(Os::from_raw("linux"), Os::Linux);
    }

    #[test]
    fn arm_names() {
        assert_eq!(Arch::from_raw("aarch64"), Arch::Aarch64);
        assert_eq!(Arch::from_raw("ARM64"), Arch::Aarch64);
    }

    #[test]
    fn unknown_arch_defaults_to_x86_64() {
        assert_eq!(Arch::from_raw("riscv64"), Arch::X86_64);
        assert_eq!(Arch::from_raw("amd64"), Arch::X86_64);
        assert_eq!(Arch::from_raw("x86_64"), Arch::X86_64);
    }

    #[test]
    fn display_joins_os_and_arch() {
        let tag = PlatformTag::from_raw("Darwin", "arm64");
        assert_eq!(tag.to_string(), "macos-aarch64");
    }

    #[test]
    fn host_tag_matches_consts() {
        let tag = identify();
        if cfg!(target_os = "windows") {
            assert_eq!(tag.os, Os::Windows);
        } else if cfg!(target_os = "macos") {
            assert_eq!(tag.os, Os::MacOs);
        }
        if cfg!(target_arch = "aarch64") {
            assert_eq!(tag.arch, Arch::Aarch64);
        }
    }
}
