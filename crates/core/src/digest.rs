use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use sha2::Digest;

/// An incremental digest primitive fed by a [`crate::HashAction`].
///
/// A state is unusable until [`HashState::init`] is called. Reading the digest
/// with [`HashState::get`] consumes it: afterwards the state reports itself
/// invalid and ignores further input until it is initialized again.
pub trait HashState {
    fn init(&mut self);

    /// Returns `false` (and drops `data`) if the state is invalid.
    fn feed(&mut self, data: &[u8]) -> bool;

    fn is_valid(&self) -> bool;

    fn get(&mut self) -> Option<DigestValue>;
}

impl<H: HashState + ?Sized> HashState for Box<H> {
    fn init(&mut self) {
        (**self).init()
    }

    fn feed(&mut self, data: &[u8]) -> bool {
        (**self).feed(data)
    }

    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }

    fn get(&mut self) -> Option<DigestValue> {
        (**self).get()
    }
}

/// [`HashState`] backed by any RustCrypto hasher.
pub struct DigestState<D> {
    hasher: Option<D>,
}

impl<D: Digest> DigestState<D> {
    pub fn new() -> Self {
        Self { hasher: None }
    }
}

impl<D: Digest> Default for DigestState<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest> HashState for DigestState<D> {
    fn init(&mut self) {
        self.hasher = Some(D::new());
    }

    fn feed(&mut self, data: &[u8]) -> bool {
        match self.hasher.as_mut() {
            Some(hasher) => {
                hasher.update(data);
                true
            }
            None => false,
        }
    }

    fn is_valid(&self) -> bool {
        self.hasher.is_some()
    }

    fn get(&mut self) -> Option<DigestValue> {
        self.hasher
            .take()
            .map(|hasher| DigestValue::new(hasher.finalize().to_vec()))
    }
}

/// Finished digest bytes. Displayed and serialized as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DigestValue(Vec<u8>);

impl DigestValue {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for DigestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for DigestValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 3] = [Self::Md5, Self::Sha1, Self::Sha256];

    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }

    /// Results field a hash action for this algorithm writes to by default.
    pub fn field_name(self) -> &'static str {
        self.name()
    }

    /// Fresh, not yet initialized state for this algorithm.
    pub fn new_state(self) -> Box<dyn HashState> {
        match self {
            Self::Md5 => Box::new(DigestState::<md5::Md5>::new()),
            Self::Sha1 => Box::new(DigestState::<sha1::Sha1>::new()),
            Self::Sha256 => Box::new(DigestState::<sha2::Sha256>::new()),
        }
    }

    pub fn digest_bytes(self, content: &[u8]) -> DigestValue {
        let bytes = match self {
            Self::Md5 => md5::Md5::digest(content).to_vec(),
            Self::Sha1 => sha1::Sha1::digest(content).to_vec(),
            Self::Sha256 => sha2::Sha256::digest(content).to_vec(),
        };
        DigestValue::new(bytes)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown hash algorithm: {s}"))
    }
}
