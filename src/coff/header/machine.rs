use strum::{Display, FromRepr};

/// The target architecture of a COFF file.
///
/// The numeric values are those of the PE format's
/// [machine types](https://learn.microsoft.com/windows/win32/debug/pe-format#machine-types).
/// Use [`Machine::from_repr`] on [`CoffHeader::machine`](super::CoffHeader::machine); values not
/// listed here are still valid in a header.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u16)]
pub enum Machine {
    /// Applicable to any machine type.
    Unknown = 0x0000,
    /// Intel 386 or later processors and compatible processors.
    I386 = 0x014C,
    /// MIPS little endian.
    R4000 = 0x0166,
    /// MIPS little-endian WCE v2.
    WceMipsV2 = 0x0169,
    /// Hitachi SH3.
    Sh3 = 0x01A2,
    /// Hitachi SH3 DSP.
    Sh3Dsp = 0x01A3,
    /// Hitachi SH4.
    Sh4 = 0x01A6,
    /// Hitachi SH5.
    Sh5 = 0x01A8,
    /// ARM little endian.
    Arm = 0x01C0,
    /// ARM or Thumb ("interworking").
    Thumb = 0x01C2,
    /// ARMv7 (or higher) Thumb mode only.
    ArmNt = 0x01C4,
    /// Matsushita AM33.
    Am33 = 0x01D3,
    /// Power PC little endian.
    PowerPc = 0x01F0,
    /// Power PC with floating point support.
    PowerPcFp = 0x01F1,
    /// Intel Itanium processor family.
    Ia64 = 0x0200,
    Mips16 = 0x0266,
    /// MIPS with FPU.
    MipsFpu = 0x0366,
    /// MIPS16 with FPU.
    MipsFpu16 = 0x0466,
    /// EFI byte code.
    Ebc = 0x0EBC,
    /// x86 compiled hybrid portable executable.
    ChpeX86 = 0x3A64,
    RiscV32 = 0x5032,
    RiscV64 = 0x5064,
    RiscV128 = 0x5128,
    LoongArch32 = 0x6232,
    LoongArch64 = 0x6264,
    /// x64.
    Amd64 = 0x8664,
    /// Mitsubishi M32R little endian.
    M32R = 0x9041,
    /// ARM64 code that interoperates with x64 ("emulation compatible").
    Arm64Ec = 0xA641,
    /// Mixed ARM64 and ARM64EC.
    Arm64X = 0xA64E,
    /// ARMv8 in 64-bit mode.
    Arm64 = 0xAA64,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::Machine;

    #[rstest]
    #[case::unknown(0x0000, Machine::Unknown)]
    #[case::i386(0x014C, Machine::I386)]
    #[case::am33(0x01D3, Machine::Am33)]
    #[case::amd64(0x8664, Machine::Amd64)]
    #[case::arm_nt(0x01C4, Machine::ArmNt)]
    #[case::arm64(0xAA64, Machine::Arm64)]
    #[case::wce_mips_v2(0x0169, Machine::WceMipsV2)]
    fn from_repr(#[case] raw: u16, #[case] expected: Machine) {
        assert_eq!(Machine::from_repr(raw), Some(expected));
        assert_eq!(expected as u16, raw);
    }

    #[test]
    fn unlisted_machine() {
        assert_eq!(Machine::from_repr(0x1234), None);
    }

    #[test]
    fn display() {
        assert_eq!(Machine::Amd64.to_string(), "AMD64");
        assert_eq!(Machine::PowerPcFp.to_string(), "POWER_PC_FP");
    }
}
