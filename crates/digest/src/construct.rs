use crate::Digest;
use crate::error::{Error, ErrorKind};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

impl FromStr for Digest {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "crc32" | "crc-32" | "crc" => Ok(Digest::Crc32),
            "md5" => Ok(Digest::Md5),
            "sha256" | "sha-256" | "sha2-256" => Ok(Digest::Sha256),
            "sha512" | "sha-512" | "sha2-512" => Ok(Digest::Sha512),
            "sha3-256" | "sha3_256" | "sha3" => Ok(Digest::Sha3_256),
            "blake3" | "b3" => Ok(Digest::Blake3),
            _ => exn::bail!(ErrorKind::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &'static str {
        self.as_str()
    }
}

impl Digest {
    /// Returns the short name for configuration (for displaying to user).
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Digest::Crc32 => "crc32",
            Digest::Md5 => "md5",
            Digest::Sha256 => "sha256",
            Digest::Sha512 => "sha512",
            Digest::Sha3_256 => "sha3-256",
            Digest::Blake3 => "blake3",
        }
    }

    /// Returns the column title used for this algorithm in inventory
    /// manifests and packaging manifests.
    #[inline]
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Digest::Crc32 => "CRC32",
            Digest::Md5 => "MD5_Sum",
            Digest::Sha256 => "SHA2_256",
            Digest::Sha512 => "SHA2_512",
            Digest::Sha3_256 => "SHA3_256",
            Digest::Blake3 => "BLAKE3",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Digest;
    use rstest::rstest;

    #[rstest]
    #[case("crc32", Digest::Crc32)]
    #[case("CRC-32", Digest::Crc32)]
    #[case("md5", Digest::Md5)]
    #[case("MD5", Digest::Md5)]
    #[case("sha256", Digest::Sha256)]
    #[case("sha2-256", Digest::Sha256)]
    #[case("sha512", Digest::Sha512)]
    #[case("sha-512", Digest::Sha512)]
    #[case("sha3-256", Digest::Sha3_256)]
    #[case("sha3", Digest::Sha3_256)]
    #[case("blake3", Digest::Blake3)]
    #[case("b3", Digest::Blake3)]
    fn test_from_str(#[case] test: &str, #[case] expected: Digest) {
        assert_eq!(test.parse::<Digest>().unwrap(), expected);
    }

    #[rstest]
    #[case("whirlpool")]
    #[case("definitely not valid")]
    #[case(" ")]
    fn test_from_str_invalid(#[case] test: &str) {
        assert!(test.parse::<Digest>().is_err());
    }

    #[rstest]
    #[case(Digest::Md5, "MD5_Sum")]
    #[case(Digest::Sha3_256, "SHA3_256")]
    #[case(Digest::Sha512, "SHA2_512")]
    fn test_title(#[case] algorithm: Digest, #[case] expected: &str) {
        assert_eq!(algorithm.title(), expected);
    }
}
